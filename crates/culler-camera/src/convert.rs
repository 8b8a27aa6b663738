use crate::CameraError;
use culler_base::Tensor;

/// Convert packed YUYV (YUV 4:2:2) bytes to an HWC RGB8 tensor.
///
/// YUYV packs pixel pairs as `[Y0, U, Y1, V]`; both pixels of a pair share
/// the U and V samples. Uses BT.601 full-range coefficients.
pub fn yuyv_to_rgb(width: usize, height: usize, data: &[u8]) -> Result<Tensor<u8>, CameraError> {
    if width % 2 != 0 {
        return Err(CameraError::Decode(format!(
            "yuyv width must be even, got {width}"
        )));
    }
    let expected = width * height * 2;
    if data.len() != expected {
        return Err(CameraError::Decode(format!(
            "yuyv buffer is {} bytes, {}x{} needs {expected}",
            data.len(),
            width,
            height
        )));
    }

    let mut rgb = Vec::with_capacity(width * height * 3);
    for quad in data.chunks_exact(4) {
        let (y0, u, y1, v) = (quad[0], quad[1], quad[2], quad[3]);
        push_rgb(&mut rgb, y0, u, v);
        push_rgb(&mut rgb, y1, u, v);
    }

    Tensor::new(vec![height, width, 3], rgb)
        .map_err(|e| CameraError::Decode(e.to_string()))
}

fn push_rgb(out: &mut Vec<u8>, y: u8, u: u8, v: u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = y + 1.402 * v;
    let g = y - 0.344136 * u - 0.714136 * v;
    let b = y + 1.772 * u;

    out.push(r.clamp(0.0, 255.0) as u8);
    out.push(g.clamp(0.0, 255.0) as u8);
    out.push(b.clamp(0.0, 255.0) as u8);
}

/// Decode a compressed image (JPEG/PNG/BMP) into an HWC RGB8 tensor.
pub fn decode_rgb(data: &[u8]) -> Result<Tensor<u8>, CameraError> {
    let img = image::load_from_memory(data)?.into_rgb8();
    let (width, height) = img.dimensions();
    Tensor::new(vec![height as usize, width as usize, 3], img.into_raw())
        .map_err(|e| CameraError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuyv_grey_pixels() {
        // Y=128, U=V=128 is mid grey for both pixels of the pair.
        let t = yuyv_to_rgb(2, 1, &[128, 128, 128, 128]).unwrap();
        assert_eq!(t.shape, vec![1, 2, 3]);
        assert_eq!(t.data, vec![128, 128, 128, 128, 128, 128]);
    }

    #[test]
    fn yuyv_rejects_odd_width() {
        assert!(yuyv_to_rgb(3, 1, &[0u8; 6]).is_err());
    }

    #[test]
    fn yuyv_rejects_short_buffer() {
        assert!(yuyv_to_rgb(4, 2, &[0u8; 10]).is_err());
    }

    #[test]
    fn decode_rgb_round_trips_png() {
        let img = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let mut png = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageFormat::Png,
        )
        .unwrap();

        let t = decode_rgb(&png).unwrap();
        assert_eq!(t.shape, vec![2, 3, 3]);
        assert_eq!(&t.data[..3], &[10, 20, 30]);
    }
}
