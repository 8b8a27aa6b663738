//! Accelerator offload seam.
//!
//! The agent never talks to inference hardware directly: it loads a model
//! through an [`Accelerator`], runs it through the returned [`Session`],
//! and interprets results through [`Classifier`]. The one real backend is
//! ONNX Runtime ([`OnnxAccelerator`]); tests substitute their own
//! `Accelerator`/`Session` impls.

pub mod accelerator;
pub mod backends;
pub mod classifier;
pub mod device;
pub mod error;
pub mod labels;
pub mod modelsource;
pub mod session;

pub use accelerator::Accelerator;
pub use backends::onnx::OnnxAccelerator;
pub use classifier::{Classifier, Verdict};
pub use device::Device;
pub use error::AccelError;
pub use labels::Labels;
pub use modelsource::ModelSource;
pub use session::Session;
