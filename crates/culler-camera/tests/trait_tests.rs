use culler_base::Tensor;
use culler_camera::{Camera, CameraError};

struct MockCamera {
    frames: usize,
}

impl Camera for MockCamera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        self.frames += 1;
        Tensor::new(vec![2, 2, 3], vec![0u8; 12]).map_err(|e| CameraError::Stream(e.to_string()))
    }
}

#[tokio::test]
async fn mock_camera_counts_frames() {
    let mut cam = MockCamera { frames: 0 };

    let frame = cam.recv().await.unwrap();
    assert_eq!(frame.shape, vec![2, 2, 3]);

    cam.recv().await.unwrap();
    assert_eq!(cam.frames, 2);
}

#[tokio::test]
async fn camera_trait_is_usable_generically() {
    async fn drain(camera: &mut impl Camera, count: usize) -> Result<usize, CameraError> {
        let mut total = 0;
        for _ in 0..count {
            total += camera.recv().await?.len();
        }
        Ok(total)
    }

    let mut cam = MockCamera { frames: 0 };
    assert_eq!(drain(&mut cam, 3).await.unwrap(), 36);
}
