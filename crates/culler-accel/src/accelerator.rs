use crate::{AccelError, ModelSource, Session};

/// A backend that can turn model bytes into a runnable [`Session`].
pub trait Accelerator {
    fn name(&self) -> &str;
    fn load_model(&self, model: ModelSource) -> Result<Box<dyn Session>, AccelError>;
}
