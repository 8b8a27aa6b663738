/// Execution target for a loaded model.
///
/// `Cuda` is only usable when the crate is built with the `cuda` feature;
/// otherwise loading a model on it fails with
/// [`crate::AccelError::UnsupportedDevice`].
#[derive(Clone, Debug, PartialEq)]
pub enum Device {
    Cpu,
    Cuda { device_id: i32 },
}

impl Default for Device {
    fn default() -> Self {
        Device::Cpu
    }
}
