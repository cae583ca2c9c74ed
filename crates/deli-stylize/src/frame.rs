use crate::StylizeError;
use deli_base::Tensor;

/// Raw RGB frame, HWC `[height, width, 3]`.
pub type Frame = Tensor<u8>;

/// Stylized frame, HWC `[height, width, 3]`, display range, not re-quantized.
pub type StylizedFrame = Tensor<f32>;

/// Checks one frame up front so malformed input fails fast with its index.
pub fn validate_frame(index: usize, frame: &Frame) -> Result<(usize, usize), StylizeError> {
    let (h, w, c) = frame.hwc().ok_or_else(|| {
        StylizeError::Shape(format!(
            "frame {index}: expected [H, W, 3], got {:?}",
            frame.shape
        ))
    })?;
    if c != 3 {
        return Err(StylizeError::Shape(format!(
            "frame {index}: expected 3 channels, got {c}"
        )));
    }
    if h == 0 || w == 0 {
        return Err(StylizeError::Shape(format!(
            "frame {index}: empty {h}x{w} frame"
        )));
    }
    if frame.data.len() != h * w * c {
        return Err(StylizeError::Shape(format!(
            "frame {index}: {} bytes for a {h}x{w}x{c} frame",
            frame.data.len()
        )));
    }
    Ok((h, w))
}

/// Rejects empty batches and malformed frames.
pub fn validate_batch(frames: &[Frame]) -> Result<(), StylizeError> {
    if frames.is_empty() {
        return Err(StylizeError::Shape("empty frame batch".to_string()));
    }
    for (index, frame) in frames.iter().enumerate() {
        validate_frame(index, frame)?;
    }
    Ok(())
}
