use deli_base::{Tensor, TensorError};

#[test]
fn test_tensor_new_valid() {
    let tensor = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(tensor.shape, vec![2, 3]);
    assert_eq!(tensor.len(), 6);
    assert_eq!(tensor.ndim(), 2);
}

#[test]
fn test_tensor_new_shape_mismatch() {
    let result = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0]);
    assert_eq!(
        result.unwrap_err(),
        TensorError::ShapeMismatch {
            expected: 6,
            got: 3
        }
    );
}

#[test]
fn test_tensor_new_overflow() {
    let result = Tensor::<u8>::new(vec![usize::MAX, 2], vec![]);
    assert!(matches!(result, Err(TensorError::ShapeOverflow)));
}

#[test]
fn test_tensor_zeros() {
    let tensor = Tensor::<f32>::zeros(vec![4, 2, 3]).unwrap();
    assert_eq!(tensor.shape, vec![4, 2, 3]);
    assert!(tensor.data.iter().all(|&v| v == 0.0));
}

#[test]
fn test_tensor_hwc() {
    let frame = Tensor::new(vec![2, 5, 3], vec![0u8; 30]).unwrap();
    assert_eq!(frame.hwc(), Some((2, 5, 3)));

    let flat = Tensor::new(vec![30], vec![0u8; 30]).unwrap();
    assert_eq!(flat.hwc(), None);
}

#[test]
fn test_tensor_map_keeps_shape() {
    let frame = Tensor::new(vec![1, 2, 1], vec![0u8, 255]).unwrap();
    let scaled = frame.map(|&v| v as f32 / 255.0);
    assert_eq!(scaled.shape, vec![1, 2, 1]);
    assert_eq!(scaled.data, vec![0.0, 1.0]);
}

#[test]
fn test_tensor_is_empty() {
    assert!(Tensor::<f32>::new(vec![0, 4, 3], vec![]).unwrap().is_empty());
    assert!(!Tensor::new(vec![2], vec![1.0, 2.0]).unwrap().is_empty());
}

#[test]
fn test_tensor_debug_truncates_data() {
    let tensor = Tensor::new(vec![100], vec![7u8; 100]).unwrap();
    let debug_str = format!("{:?}", tensor);
    assert!(debug_str.contains("Tensor"));
    assert!(debug_str.contains("len: 100"));
    assert!(debug_str.contains("head"));
}
