use crate::Device;
use std::fmt;

#[derive(Debug)]
pub enum AccelError {
    Runtime(String),
    ModelLoad(String),
    Shape(String),
    Io(String),
    UnsupportedDevice(Device),
    InvalidInput {
        name: String,
        expected_names: Vec<String>,
    },
}

impl fmt::Display for AccelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccelError::Runtime(msg) => write!(f, "runtime error: {msg}"),
            AccelError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            AccelError::Shape(msg) => write!(f, "shape error: {msg}"),
            AccelError::Io(msg) => write!(f, "io error: {msg}"),
            AccelError::UnsupportedDevice(device) => {
                write!(f, "device not supported in this build: {device:?}")
            }
            AccelError::InvalidInput {
                name,
                expected_names,
            } => write!(
                f,
                "model has no input named '{name}' (model inputs: {expected_names:?})"
            ),
        }
    }
}

impl std::error::Error for AccelError {}

impl From<std::io::Error> for AccelError {
    fn from(err: std::io::Error) -> Self {
        AccelError::Io(err.to_string())
    }
}
