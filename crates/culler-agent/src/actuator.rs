use crate::AgentError;
use std::path::PathBuf;
use std::time::Duration;

/// The reject mechanism seam.
///
/// `fire` delivers one reject pulse. Rate limiting lives in the agent
/// loop (cooldown), not here.
#[allow(async_fn_in_trait)]
pub trait Actuator {
    async fn fire(&mut self) -> Result<(), AgentError>;
}

/// Drives a solenoid/diverter through a sysfs GPIO value file:
/// write `1`, hold for the pulse width, write `0`.
pub struct GpioActuator {
    value_path: PathBuf,
    pulse: Duration,
}

impl GpioActuator {
    pub fn new(value_path: impl Into<PathBuf>, pulse: Duration) -> Self {
        Self {
            value_path: value_path.into(),
            pulse,
        }
    }

    fn write(&self, level: u8) -> Result<(), AgentError> {
        std::fs::write(&self.value_path, if level == 0 { "0" } else { "1" }).map_err(|e| {
            AgentError::Actuator(format!("write {} failed: {e}", self.value_path.display()))
        })
    }
}

impl Actuator for GpioActuator {
    async fn fire(&mut self) -> Result<(), AgentError> {
        self.write(1)?;
        tokio::time::sleep(self.pulse).await;
        self.write(0)
    }
}

/// No-hardware actuator: logs each reject. The default when the config
/// names no GPIO path.
#[derive(Default)]
pub struct LogActuator {
    fired: u64,
}

impl LogActuator {
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl Actuator for LogActuator {
    async fn fire(&mut self) -> Result<(), AgentError> {
        self.fired += 1;
        log::info!("reject actuator fired ({} total)", self.fired);
        Ok(())
    }
}
