use crate::frame::{validate_batch, validate_frame, Frame, StylizedFrame};
use crate::session::run_single;
use crate::{Backend, Device, ModelSource, Session, StylizeError};
use deli_base::{log, Tensor};
use std::borrow::Cow;
use std::sync::Mutex;

/// Frames stacked into one inference call.
pub const COMIX_BATCH_SIZE: usize = 2;

/// `[0, 255]` -> `[-1, 1]`
pub fn normalize(value: u8) -> f32 {
    value as f32 / 255.0 * 2.0 - 1.0
}

/// Model output -> display range. The 1.25 divisor matches the generator's
/// trained output distribution and is kept as is.
pub fn denormalize(output: f32) -> f32 {
    255.0 * (output + 1.0) / 1.25
}

/// Batch-parallel stylizer. Runs an NHWC generator on groups of
/// [`COMIX_BATCH_SIZE`] frames.
///
/// The model is loaded once and never swapped.
pub struct ComixStylizer {
    session: Mutex<Box<dyn Session>>,
    max_frame_size: usize,
}

impl ComixStylizer {
    pub fn new(session: Box<dyn Session>, max_frame_size: usize) -> Self {
        Self {
            session: Mutex::new(session),
            max_frame_size,
        }
    }

    pub fn load(
        backend: &dyn Backend,
        model: ModelSource,
        device: &Device,
        max_frame_size: usize,
    ) -> Result<Self, StylizeError> {
        log::info!("loading comix model from {model} on {device} ({})", backend.name());
        let session = backend.load_model(model, device)?;
        Ok(Self::new(session, max_frame_size))
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Stylizes `frames`, output `i` matching input `i`.
    ///
    /// If the first frame's longer side exceeds the ceiling, the whole batch is
    /// resized to it first. All frames must share one shape since groups are stacked.
    pub fn stylize(&self, frames: &[Frame]) -> Result<Vec<StylizedFrame>, StylizeError> {
        validate_batch(frames)?;

        let (h, w) = validate_frame(0, &frames[0])?;
        let frames: Cow<'_, [Frame]> = if h.max(w) > self.max_frame_size {
            log::debug!(
                "resizing {} frames from {h}x{w} to fit {}",
                frames.len(),
                self.max_frame_size
            );
            Cow::Owned(deli_image::resize_frames(frames, self.max_frame_size)?)
        } else {
            Cow::Borrowed(frames)
        };

        let shape = &frames[0].shape;
        if let Some(index) = frames.iter().position(|f| &f.shape != shape) {
            return Err(StylizeError::Shape(format!(
                "frame {index} has shape {:?}, batch shape is {shape:?}",
                frames[index].shape
            )));
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| StylizeError::Backend("comix session lock poisoned".to_string()))?;

        let mut stylized = Vec::with_capacity(frames.len());
        for group in frames.chunks(COMIX_BATCH_SIZE) {
            stylized.extend(run_group(session.as_mut(), group)?);
        }
        Ok(stylized)
    }
}

fn run_group(
    session: &mut dyn Session,
    group: &[Frame],
) -> Result<Vec<StylizedFrame>, StylizeError> {
    let n = group.len();
    let mut shape = Vec::with_capacity(4);
    shape.push(n);
    shape.extend_from_slice(&group[0].shape);

    let data: Vec<f32> = group
        .iter()
        .flat_map(|frame| frame.data.iter().map(|&v| normalize(v)))
        .collect();
    let output = run_single(session, Tensor::new(shape, data)?)?;

    if output.ndim() < 2 || output.shape[0] != n || output.is_empty() {
        return Err(StylizeError::Shape(format!(
            "comix model returned {:?} for a group of {n}",
            output.shape
        )));
    }
    let frame_shape = output.shape[1..].to_vec();
    let per_frame = output.len() / n;

    output
        .data
        .chunks(per_frame)
        .map(|chunk| {
            let pixels = chunk.iter().map(|&o| denormalize(o)).collect();
            Ok(Tensor::new(frame_shape.clone(), pixels)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize(0), -1.0);
        assert_eq!(normalize(255), 1.0);
        assert!(normalize(128).abs() < 0.01);
    }

    #[test]
    fn test_denormalize_keeps_1_25_divisor() {
        assert_eq!(denormalize(-1.0), 0.0);
        assert_eq!(denormalize(0.0), 204.0);
        assert_eq!(denormalize(1.0), 408.0);
        assert_eq!(denormalize(0.25), 255.0);
    }
}
