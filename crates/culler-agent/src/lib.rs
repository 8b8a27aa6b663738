//! The culler control loop.
//!
//! Ties the camera, the accelerator classifier, and the reject actuator
//! together: capture a frame, classify it, fire the actuator when the
//! configured anomaly class crosses its probability threshold, publish a
//! telemetry frame, repeat. Operator commands (pause/resume/threshold)
//! arrive over the command channel and are applied between frames.

pub mod actuator;
pub mod agent;
pub mod config;
pub mod error;
pub mod messages;

pub use actuator::{Actuator, GpioActuator, LogActuator};
pub use agent::Agent;
pub use config::{AgentConfig, RejectRule};
pub use error::AgentError;
pub use messages::{Command, Telemetry};
