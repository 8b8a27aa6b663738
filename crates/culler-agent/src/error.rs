use std::fmt;

#[derive(Debug)]
pub enum AgentError {
    Config(String),
    Camera(culler_camera::CameraError),
    Accel(culler_accel::AccelError),
    Com(culler_com::ComError),
    Actuator(String),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Config(msg) => write!(f, "config error: {msg}"),
            AgentError::Camera(err) => write!(f, "camera error: {err}"),
            AgentError::Accel(err) => write!(f, "accelerator error: {err}"),
            AgentError::Com(err) => write!(f, "com error: {err}"),
            AgentError::Actuator(msg) => write!(f, "actuator error: {msg}"),
        }
    }
}

impl std::error::Error for AgentError {}

impl From<culler_camera::CameraError> for AgentError {
    fn from(err: culler_camera::CameraError) -> Self {
        AgentError::Camera(err)
    }
}

impl From<culler_accel::AccelError> for AgentError {
    fn from(err: culler_accel::AccelError) -> Self {
        AgentError::Accel(err)
    }
}

impl From<culler_com::ComError> for AgentError {
    fn from(err: culler_com::ComError) -> Self {
        AgentError::Com(err)
    }
}
