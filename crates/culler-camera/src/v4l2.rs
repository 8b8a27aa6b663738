use crate::{convert, Camera, CameraConfig, CameraError};
use culler_base::Tensor;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Tensor<u8>, CameraError>;

/// V4L2 capture backend.
///
/// Capture runs on a dedicated thread (the v4l mmap stream is blocking);
/// decoded frames cross into async land over a bounded channel sized to
/// the buffer count, so a slow consumer backpressures the stream instead
/// of piling up frames.
pub struct V4l2Camera {
    config: CameraConfig,
    format: FourCC,
    capture_size: (usize, usize),
    device: Option<Device>,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("running", &self.receiver.is_some())
            .finish()
    }
}

impl V4l2Camera {
    /// Open the device and negotiate a capture format.
    ///
    /// MJPEG at the configured resolution is tried first; if the device
    /// refuses it, YUYV is tried as a fallback. Any other format the
    /// device insists on is an error.
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(config.device())?;

        let mjpg = FourCC::new(b"MJPG");
        let yuyv = FourCC::new(b"YUYV");

        let requested = Format::new(config.width(), config.height(), mjpg);
        let mut negotiated = Capture::set_format(&device, &requested)?;

        if negotiated.fourcc != mjpg {
            negotiated = Capture::set_format(
                &device,
                &Format::new(config.width(), config.height(), yuyv),
            )?;
            if negotiated.fourcc != yuyv {
                return Err(CameraError::Device(format!(
                    "device offers neither MJPG nor YUYV (got {})",
                    negotiated.fourcc
                )));
            }
        }

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        log::info!(
            "v4l2 {}: {}x{} @ {} fps, {}",
            config.device(),
            negotiated.width,
            negotiated.height,
            config.fps(),
            negotiated.fourcc
        );

        Ok(Self {
            config,
            format: negotiated.fourcc,
            capture_size: (negotiated.width as usize, negotiated.height as usize),
            device: Some(device),
            receiver: None,
            thread_handle: None,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Spawn the capture thread on first use.
    fn ensure_started(&mut self) -> Result<(), CameraError> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::Device("capture device already consumed".to_string()))?;

        let buffer_count = self.config.buffer_count().max(1) as usize;
        let (tx, rx) = mpsc::channel(buffer_count);

        let format = self.format;
        // The device may have adjusted the requested size during negotiation.
        let (width, height) = self.capture_size;
        let handle = thread::spawn(move || {
            if let Err(e) = capture_loop(device, format, width, height, tx, buffer_count) {
                log::error!("capture thread exited: {e}");
            }
        });

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);
        Ok(())
    }
}

impl Camera for V4l2Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        self.ensure_started()?;

        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("receiver missing".to_string()))?;

        receiver
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("capture thread gone".to_string()))?
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // Closing the receiver makes the thread's next send fail, which
        // ends its loop; then wait for it.
        drop(self.receiver.take());
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

fn capture_loop(
    device: Device,
    format: FourCC,
    width: usize,
    height: usize,
    tx: mpsc::Sender<FrameResult>,
    buffer_count: usize,
) -> Result<(), CameraError> {
    let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count as u32)?;

    loop {
        let (buffer, _meta) = CaptureStream::next(&mut stream)?;

        // The mmap buffer is only valid until the next dequeue.
        let frame = if format == FourCC::new(b"MJPG") {
            convert::decode_rgb(buffer)
        } else {
            convert::yuyv_to_rgb(width, height, buffer)
        };

        if tx.blocking_send(frame).is_err() {
            // Camera dropped on the async side.
            return Ok(());
        }
    }
}
