use crate::{convert, Camera, CameraError};
use culler_base::Tensor;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Camera backend that cycles through image files in a directory.
///
/// Frames are decoded once on first use and replayed round-robin at the
/// configured rate. Intended for hosts without capture hardware and for
/// integration tests; the decode path is the same one `V4l2Camera` uses
/// for MJPEG buffers.
#[derive(Debug)]
pub struct StillCamera {
    paths: Vec<PathBuf>,
    frames: Vec<Option<Tensor<u8>>>,
    next: usize,
    interval: Duration,
}

impl StillCamera {
    /// Scan `dir` for image files, sorted by name.
    ///
    /// The first file is decoded here so a directory of undecodable
    /// files fails at open rather than frame by frame. Returns
    /// `CameraError::Device` if the directory cannot be read, contains
    /// no files with a recognized image extension, or its first file
    /// does not decode.
    pub fn open(dir: impl Into<PathBuf>, fps: u32) -> Result<Self, CameraError> {
        let dir = dir.into();
        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("jpg") | Some("jpeg") | Some("png") | Some("bmp")
                )
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(CameraError::Device(format!(
                "no image files in {}",
                dir.display()
            )));
        }

        let bytes = fs::read(&paths[0])?;
        let first = convert::decode_rgb(&bytes).map_err(|e| {
            CameraError::Device(format!("cannot decode {}: {e}", paths[0].display()))
        })?;

        let mut frames = vec![None; paths.len()];
        frames[0] = Some(first);
        let fps = fps.max(1);

        Ok(Self {
            paths,
            frames,
            next: 0,
            interval: Duration::from_secs_f64(1.0 / fps as f64),
        })
    }

    /// Number of distinct frames in the cycle.
    pub fn frame_count(&self) -> usize {
        self.paths.len()
    }
}

impl Camera for StillCamera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        tokio::time::sleep(self.interval).await;

        let index = self.next;
        self.next = (self.next + 1) % self.paths.len();

        match &self.frames[index] {
            Some(frame) => Ok(frame.clone()),
            None => {
                let bytes = fs::read(&self.paths[index])?;
                let frame = convert::decode_rgb(&bytes)?;
                self.frames[index] = Some(frame.clone());
                Ok(frame)
            }
        }
    }
}
