use crate::ImageError;
use deli_base::Tensor;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb};

/// Output `(height, width)` for fitting a `height x width` image to `size`.
///
/// Portrait images (height/width > 1) get `height = size`; everything else,
/// squares included, gets `width = size`. The other side follows the aspect
/// ratio, rounded to the nearest pixel and never below one pixel.
pub fn target_dims(height: usize, width: usize, size: usize) -> Result<(usize, usize), ImageError> {
    if height == 0 || width == 0 {
        return Err(ImageError::Shape(format!(
            "cannot resize an empty {height}x{width} image"
        )));
    }
    if size == 0 {
        return Err(ImageError::Shape("target size must be non-zero".to_string()));
    }

    let ratio = height as f64 / width as f64;
    let size_f = size as f64;
    if ratio > 1.0 {
        Ok((size, ((size_f / ratio).round() as usize).max(1)))
    } else {
        Ok((((size_f * ratio).round() as usize).max(1), size))
    }
}

/// Resizes one RGB frame with bilinear filtering. Never mutates the input.
pub fn resize_frame(frame: &Tensor<u8>, size: usize) -> Result<Tensor<u8>, ImageError> {
    let (h, w, c) = frame
        .hwc()
        .ok_or_else(|| ImageError::Shape(format!("expected [H, W, 3], got {:?}", frame.shape)))?;
    if c != 3 {
        return Err(ImageError::Shape(format!("expected 3 channels, got {c}")));
    }

    let (new_h, new_w) = target_dims(h, w, size)?;
    if (new_h, new_w) == (h, w) {
        return Ok(frame.clone());
    }

    let source: ImageBuffer<Rgb<u8>, &[u8]> =
        ImageBuffer::from_raw(w as u32, h as u32, frame.data.as_slice()).ok_or_else(|| {
            ImageError::Shape(format!(
                "buffer of {} bytes does not hold a {h}x{w} RGB frame",
                frame.data.len()
            ))
        })?;
    let resized = imageops::resize(&source, new_w as u32, new_h as u32, FilterType::Triangle);

    Ok(Tensor::new(vec![new_h, new_w, 3], resized.into_raw())?)
}

/// Resizes every frame to `size`, preserving order.
pub fn resize_frames(frames: &[Tensor<u8>], size: usize) -> Result<Vec<Tensor<u8>>, ImageError> {
    frames.iter().map(|frame| resize_frame(frame, size)).collect()
}
