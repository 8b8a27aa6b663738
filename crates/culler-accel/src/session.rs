use crate::AccelError;
use culler_base::Tensor;
use std::collections::HashMap;

/// A loaded model, ready to run.
///
/// `Send` so the [`crate::Classifier`] can move runs onto a blocking
/// thread while the capture loop keeps going.
pub trait Session: Send {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, AccelError>;
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];
}
