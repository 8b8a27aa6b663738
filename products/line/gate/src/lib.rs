//! Wiring helpers for the gate binary: config-driven selection of the
//! frame source and the reject mechanism.

use culler_agent::{Actuator, AgentConfig, AgentError, GpioActuator, LogActuator};
use culler_base::{log, Tensor};
use culler_camera::{Camera, CameraError, StillCamera};
use std::time::Duration;

#[cfg(feature = "v4l2")]
use culler_camera::{CameraConfig, V4l2Camera};

/// The frame source picked by the config.
pub enum FrameSource {
    #[cfg(feature = "v4l2")]
    V4l2(V4l2Camera),
    Still(StillCamera),
}

impl Camera for FrameSource {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        match self {
            #[cfg(feature = "v4l2")]
            FrameSource::V4l2(camera) => camera.recv().await,
            FrameSource::Still(camera) => camera.recv().await,
        }
    }
}

/// Build the frame source from the camera section.
///
/// A configured V4L2 device wins when the build carries the `v4l2`
/// feature; otherwise the still-image directory is used.
pub fn build_camera(config: &AgentConfig) -> Result<FrameSource, AgentError> {
    #[cfg(feature = "v4l2")]
    if let Some(device) = &config.camera.device {
        let camera_config = CameraConfig::default()
            .with_device(device.clone())
            .with_width(config.camera.width)
            .with_height(config.camera.height)
            .with_fps(config.camera.fps);
        return Ok(FrameSource::V4l2(V4l2Camera::new(camera_config)?));
    }

    #[cfg(not(feature = "v4l2"))]
    if config.camera.device.is_some() {
        log::warn!("camera.device set but this build has no v4l2 support; ignoring");
    }

    match &config.camera.still_dir {
        Some(dir) => Ok(FrameSource::Still(StillCamera::open(
            dir,
            config.camera.fps,
        )?)),
        None => Err(AgentError::Config(
            "no frame source: set camera.device (v4l2 build) or camera.still_dir".to_string(),
        )),
    }
}

/// The reject mechanism picked by the config.
pub enum RejectGate {
    Gpio(GpioActuator),
    Log(LogActuator),
}

impl Actuator for RejectGate {
    async fn fire(&mut self) -> Result<(), AgentError> {
        match self {
            RejectGate::Gpio(actuator) => actuator.fire().await,
            RejectGate::Log(actuator) => actuator.fire().await,
        }
    }
}

pub fn build_actuator(config: &AgentConfig) -> RejectGate {
    match &config.actuator.gpio_value_path {
        Some(path) => RejectGate::Gpio(GpioActuator::new(
            path,
            Duration::from_millis(config.actuator.pulse_ms),
        )),
        None => {
            log::info!("no actuator.gpio_value_path configured, rejects will only be logged");
            RejectGate::Log(LogActuator::default())
        }
    }
}
