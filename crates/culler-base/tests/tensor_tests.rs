use culler_base::{Tensor, TensorError};

#[test]
fn new_validates_shape_product() {
    let t = Tensor::new(vec![2, 3], vec![0u8; 6]).unwrap();
    assert_eq!(t.shape, vec![2, 3]);
    assert_eq!(t.len(), 6);
    assert_eq!(t.ndim(), 2);
}

#[test]
fn new_rejects_mismatched_data() {
    let err = Tensor::new(vec![2, 3], vec![0u8; 5]).unwrap_err();
    assert_eq!(err, TensorError::ShapeMismatch { expected: 6, got: 5 });
}

#[test]
fn new_rejects_overflowing_shape() {
    let err = Tensor::new(vec![usize::MAX, 2], Vec::<u8>::new()).unwrap_err();
    assert_eq!(err, TensorError::ShapeOverflow);
}

#[test]
fn zeros_fills_default() {
    let t: Tensor<f32> = Tensor::zeros(vec![4, 4, 3]).unwrap();
    assert_eq!(t.len(), 48);
    assert!(t.data.iter().all(|&v| v == 0.0));
}

#[test]
fn scalar_has_empty_shape() {
    let t = Tensor::from_scalar(7i32);
    assert_eq!(t.ndim(), 0);
    assert_eq!(t.data, vec![7]);
}

#[test]
fn map_converts_dtype_keeping_shape() {
    let t = Tensor::new(vec![2, 2], vec![0u8, 128, 255, 64]).unwrap();
    let f = t.map(|&v| v as f32 / 255.0);
    assert_eq!(f.shape, vec![2, 2]);
    assert!((f.data[1] - 128.0 / 255.0).abs() < 1e-6);
    assert_eq!(f.data[2], 1.0);
}

#[test]
fn empty_tensor() {
    let t = Tensor::new(vec![0, 3], Vec::<u8>::new()).unwrap();
    assert!(t.is_empty());
}
