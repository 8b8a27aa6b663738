//! Shared base types for the culler workspace.
//!
//! Everything above this crate moves frames and model I/O around as
//! [`Tensor`] values, and logs through the loggers defined here.

pub mod logging;
pub mod tensor;

pub use logging::{init_file_logger, init_stdout_logger, FileLogger, StdoutLogger};
pub use tensor::{Tensor, TensorError};

// Re-export log so downstream crates can use culler_base::log::*
pub use log;
