//! Camera seam for the culler agent.
//!
//! The [`Camera`] trait delivers decoded frames as HWC `Tensor<u8>`.
//! `V4l2Camera` (feature `v4l2`) captures from real hardware;
//! [`StillCamera`] cycles image files from a directory so the agent and
//! its tests run on hosts without capture devices.

pub mod config;
pub mod convert;
pub mod error;
pub mod still;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use error::CameraError;
pub use still::StillCamera;
pub use traits::Camera;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
