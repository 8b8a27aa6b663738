use crate::AgentError;
use culler_accel::Verdict;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The reject decision, made configurable.
///
/// Fires when the verdict is exactly `class_id` with probability strictly
/// above `min_probability`, and suppresses re-firing for `cooldown_ms` so
/// one object sitting in front of the camera triggers the actuator once.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RejectRule {
    #[serde(default = "default_class_id")]
    pub class_id: u32,
    #[serde(default = "default_min_probability")]
    pub min_probability: f32,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

fn default_class_id() -> u32 {
    1
}

fn default_min_probability() -> f32 {
    0.9
}

fn default_cooldown_ms() -> u64 {
    500
}

impl Default for RejectRule {
    fn default() -> Self {
        Self {
            class_id: default_class_id(),
            min_probability: default_min_probability(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl RejectRule {
    pub fn matches(&self, verdict: &Verdict) -> bool {
        verdict.class_id == self.class_id && verdict.probability > self.min_probability
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CameraSection {
    /// V4L2 device path. Ignored unless built with the `v4l2` feature.
    #[serde(default)]
    pub device: Option<String>,
    /// Directory of still images; the fallback frame source.
    #[serde(default)]
    pub still_dir: Option<PathBuf>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_fps() -> u32 {
    30
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            device: None,
            still_dir: None,
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ModelSection {
    pub path: PathBuf,
    #[serde(default = "default_input_side")]
    pub input_width: usize,
    #[serde(default = "default_input_side")]
    pub input_height: usize,
    #[serde(default)]
    pub labels: Option<PathBuf>,
    /// CUDA device id; absent means CPU.
    #[serde(default)]
    pub cuda_device: Option<i32>,
}

fn default_input_side() -> usize {
    224
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model.onnx"),
            input_width: default_input_side(),
            input_height: default_input_side(),
            labels: None,
            cuda_device: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ActuatorSection {
    /// sysfs GPIO value file, e.g. /sys/class/gpio/gpio17/value.
    /// Absent means the actuator only logs.
    #[serde(default)]
    pub gpio_value_path: Option<PathBuf>,
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,
}

fn default_pulse_ms() -> u64 {
    50
}

impl Default for ActuatorSection {
    fn default() -> Self {
        Self {
            gpio_value_path: None,
            pulse_ms: default_pulse_ms(),
        }
    }
}

/// Agent configuration, loaded from a JSON file.
#[derive(Clone, Debug, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub camera: CameraSection,
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub reject: RejectRule,
    #[serde(default)]
    pub actuator: ActuatorSection,
    #[serde(default = "default_telemetry_addr")]
    pub telemetry_addr: String,
    #[serde(default = "default_command_addr")]
    pub command_addr: String,
}

fn default_telemetry_addr() -> String {
    "0.0.0.0:5110".to_string()
}

fn default_command_addr() -> String {
    "0.0.0.0:5111".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            camera: CameraSection::default(),
            model: ModelSection::default(),
            reject: RejectRule::default(),
            actuator: ActuatorSection::default(),
            telemetry_addr: default_telemetry_addr(),
            command_addr: default_command_addr(),
        }
    }
}

impl AgentConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AgentError::Config(format!("{}: {e}", path.display())))?;
        let config: AgentConfig = serde_json::from_str(&text)
            .map_err(|e| AgentError::Config(format!("{}: {e}", path.display())))?;

        if !(0.0..=1.0).contains(&config.reject.min_probability) {
            return Err(AgentError::Config(format!(
                "reject.min_probability must be in [0, 1], got {}",
                config.reject.min_probability
            )));
        }

        Ok(config)
    }
}
