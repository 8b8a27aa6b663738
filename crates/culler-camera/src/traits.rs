use crate::CameraError;
use culler_base::Tensor;

/// Async frame source.
///
/// `recv` resolves with the next decoded frame as a `Tensor<u8>` in HWC
/// layout `[height, width, channels]`, RGB for color backends. The camera
/// paces the caller: `recv` does not return early when no frame is ready.
#[allow(async_fn_in_trait)]
pub trait Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError>;
}
