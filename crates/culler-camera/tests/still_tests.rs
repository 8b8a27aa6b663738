use culler_camera::{Camera, CameraError, StillCamera};
use std::fs;
use std::path::PathBuf;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("culler-still-{tag}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &PathBuf, r: u8) {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([r, 0, 0]));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

#[tokio::test]
async fn cycles_through_directory_in_name_order() {
    let dir = temp_dir("cycle");
    write_png(&dir.join("a.png"), 10);
    write_png(&dir.join("b.png"), 20);

    let mut cam = StillCamera::open(&dir, 1000).unwrap();
    assert_eq!(cam.frame_count(), 2);

    let f1 = cam.recv().await.unwrap();
    let f2 = cam.recv().await.unwrap();
    let f3 = cam.recv().await.unwrap();

    assert_eq!(f1.shape, vec![4, 4, 3]);
    assert_eq!(f1.data[0], 10);
    assert_eq!(f2.data[0], 20);
    // Wraps back to the first file.
    assert_eq!(f3.data[0], 10);

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn ignores_non_image_files() {
    let dir = temp_dir("mixed");
    write_png(&dir.join("frame.png"), 33);
    fs::write(dir.join("notes.txt"), "not a frame").unwrap();

    let cam = StillCamera::open(&dir, 30).unwrap();
    assert_eq!(cam.frame_count(), 1);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn empty_directory_is_a_device_error() {
    let dir = temp_dir("empty");

    match StillCamera::open(&dir, 30) {
        Err(CameraError::Device(_)) => {}
        other => panic!("expected Device error, got {other:?}"),
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn undecodable_first_file_fails_at_open() {
    let dir = temp_dir("corrupt");
    fs::write(dir.join("frame.png"), b"not actually a png").unwrap();

    match StillCamera::open(&dir, 30) {
        Err(CameraError::Device(msg)) => assert!(msg.contains("frame.png")),
        other => panic!("expected Device error, got {other:?}"),
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_directory_is_a_device_error() {
    match StillCamera::open("/nonexistent/culler-frames", 30) {
        Err(CameraError::Device(_)) => {}
        other => panic!("expected Device error, got {other:?}"),
    }
}
