use crate::ImageError;
use deli_base::Tensor;
use image::{ExtendedColorType, ImageEncoder};

/// Clamps a display-range `[0, 255]` float frame and rounds it to u8.
pub fn quantize(frame: &Tensor<f32>) -> Tensor<u8> {
    frame.map(|&v| v.clamp(0.0, 255.0).round() as u8)
}

/// Encodes an HWC u8 frame (1, 3 or 4 channels) as PNG.
pub fn encode_png(frame: &Tensor<u8>) -> Result<Vec<u8>, ImageError> {
    let (h, w, c) = frame
        .hwc()
        .ok_or_else(|| ImageError::Encode(format!("expected [H, W, C], got {:?}", frame.shape)))?;
    let color_type = match c {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        _ => {
            return Err(ImageError::Encode(format!("unsupported channel count: {c}")));
        }
    };

    let mut buffer = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(&frame.data, w as u32, h as u32, color_type)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}
