//! Frame I/O and geometry for the deli stylization pipeline.
//!
//! Wraps the `image` crate to decode files into `Tensor<u8>` frames, resize
//! frames while keeping their aspect ratio, and write stylized output back out.
//!
//! All frames use HWC layout: `[height, width, channels]`.

pub mod encode;
pub mod error;
pub mod resize;

pub use encode::{encode_png, quantize};
pub use error::ImageError;
pub use resize::{resize_frame, resize_frames, target_dims};

use deli_base::Tensor;

/// Decodes an image from raw bytes straight into an RGB8 frame `[h, w, 3]`.
///
/// The format is auto-detected. Grayscale, alpha and high bit-depth inputs
/// are converted, so every frame of a batch ends up with the same channel depth.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub fn decode_frame(data: &[u8]) -> Result<Tensor<u8>, ImageError> {
    let rgb = image::load_from_memory(data)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    Ok(Tensor::new(vec![h as usize, w as usize, 3], rgb.into_raw())?)
}
