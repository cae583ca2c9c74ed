use crate::cache::ModelCache;
use crate::frame::{validate_batch, validate_frame, Frame, StylizedFrame};
use crate::session::run_single;
use crate::{Backend, Device, ModelSource, Session, StylizeError};
use candle_core::{DType, Tensor as CanTensor};
use deli_base::{log, Tensor};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Bounding size frames are resized to before per-frame inference.
pub const CARTOON_TARGET_SIZE: usize = 450;

/// Pretrained generator styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartoonStyle {
    Hayao,
    Hosoda,
}

impl CartoonStyle {
    pub const ALL: [CartoonStyle; 2] = [CartoonStyle::Hayao, CartoonStyle::Hosoda];

    pub fn from_name(name: &str) -> Result<Self, StylizeError> {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == name)
            .ok_or_else(|| StylizeError::Config(format!("No such model: {name}")))
    }

    pub fn name(&self) -> &'static str {
        match self {
            CartoonStyle::Hayao => "Hayao",
            CartoonStyle::Hosoda => "Hosoda",
        }
    }

    pub fn cache_key(&self) -> &'static str {
        match self {
            CartoonStyle::Hayao => "model_cache_hayao",
            CartoonStyle::Hosoda => "model_cache_hosoda",
        }
    }

    pub fn weights_file(&self) -> String {
        format!("{}_net_G_float.onnx", self.name())
    }
}

impl fmt::Display for CartoonStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A loaded generator for one style, bound to the device it was created on.
pub struct CartoonModel {
    style: CartoonStyle,
    device: Device,
    session: Mutex<Box<dyn Session>>,
}

impl CartoonModel {
    pub fn new(style: CartoonStyle, device: Device, session: Box<dyn Session>) -> Self {
        Self {
            style,
            device,
            session: Mutex::new(session),
        }
    }

    pub fn style(&self) -> CartoonStyle {
        self.style
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

/// Per-frame stylizer. Generators are loaded lazily per style through a
/// shared [`ModelCache`] and kept for the life of the cache.
pub struct CartoonStylizer {
    backend: Arc<dyn Backend>,
    weights_dir: PathBuf,
    cache: Arc<ModelCache<CartoonModel>>,
}

impl CartoonStylizer {
    pub fn new(
        backend: Arc<dyn Backend>,
        weights_dir: impl Into<PathBuf>,
        cache: Arc<ModelCache<CartoonModel>>,
    ) -> Self {
        Self {
            backend,
            weights_dir: weights_dir.into(),
            cache,
        }
    }

    pub fn weights_dir(&self) -> &Path {
        &self.weights_dir
    }

    pub fn weights_path(&self, style: CartoonStyle) -> PathBuf {
        self.weights_dir.join(style.weights_file())
    }

    pub fn cache(&self) -> &Arc<ModelCache<CartoonModel>> {
        &self.cache
    }

    /// Returns the cached generator for `style`, loading it on first use.
    ///
    /// `device` only applies to that first load; a cached handle keeps its own.
    pub fn model(
        &self,
        style: CartoonStyle,
        device: &Device,
    ) -> Result<Arc<CartoonModel>, StylizeError> {
        let model = self.cache.get_or_load(style.cache_key(), || {
            // fail before loading anything if tensors cannot live on the device
            device.to_candle()?;
            let path = self.weights_path(style);
            log::info!("loading {style} generator from {} on {device}", path.display());
            let session = self.backend.load_model(ModelSource::File(path), device)?;
            Ok(CartoonModel::new(style, device.clone(), session))
        })?;

        if model.device() != device {
            log::warn!(
                "{style} generator is bound to {}, ignoring requested {device}",
                model.device()
            );
        }
        Ok(model)
    }

    /// Resizes to [`CARTOON_TARGET_SIZE`] and stylizes each frame in order.
    pub fn stylize(
        &self,
        frames: &[Frame],
        style: CartoonStyle,
        device: &Device,
    ) -> Result<Vec<StylizedFrame>, StylizeError> {
        validate_batch(frames)?;
        let model = self.model(style, device)?;
        let candle_device = model.device().to_candle()?;

        let frames = deli_image::resize_frames(frames, CARTOON_TARGET_SIZE)?;

        let mut session = model
            .session
            .lock()
            .map_err(|_| StylizeError::Backend(format!("{style} session lock poisoned")))?;

        frames
            .iter()
            .enumerate()
            .map(|(index, frame)| stylize_frame(session.as_mut(), &candle_device, index, frame))
            .collect()
    }
}

/// `[0, 1]` -> `[-1, 1]`
pub(crate) fn to_model_range(t: &CanTensor) -> candle_core::Result<CanTensor> {
    t.affine(2.0, -1.0)
}

/// `[-1, 1]` -> `[0, 1]`
pub(crate) fn from_model_range(t: &CanTensor) -> candle_core::Result<CanTensor> {
    t.affine(0.5, 0.5)
}

fn to_host(t: &CanTensor) -> Result<Tensor<f32>, StylizeError> {
    let shape = t.dims().to_vec();
    let data = t.contiguous()?.flatten_all()?.to_vec1::<f32>()?;
    Ok(Tensor::new(shape, data)?)
}

fn stylize_frame(
    session: &mut dyn Session,
    device: &candle_core::Device,
    index: usize,
    frame: &Frame,
) -> Result<StylizedFrame, StylizeError> {
    let (h, w) = validate_frame(index, frame)?;

    // HWC u8 -> NCHW f32 in [-1, 1]
    let input = CanTensor::from_vec(frame.data.clone(), (h, w, 3), device)?
        .to_dtype(DType::F32)?
        .permute((2, 0, 1))?
        .affine(1.0 / 255.0, 0.0)?;
    let input = to_model_range(&input)?.unsqueeze(0)?;

    let output = run_single(session, to_host(&input)?)?;
    if output.ndim() != 4 || output.shape[0] == 0 {
        return Err(StylizeError::Shape(format!(
            "frame {index}: generator returned {:?}, expected [1, C, H, W]",
            output.shape
        )));
    }

    // first image of the batch, back to HWC display range
    let output = CanTensor::from_vec(output.data, output.shape.as_slice(), device)?.get(0)?;
    let output = from_model_range(&output)?
        .permute((1, 2, 0))?
        .affine(255.0, 0.0)?;
    to_host(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_range_roundtrip_on_boundaries() {
        let x = CanTensor::new(&[0.0f32, 0.5, 1.0], &candle_core::Device::Cpu).unwrap();
        let y = to_model_range(&x).unwrap();
        assert_eq!(y.to_vec1::<f32>().unwrap(), vec![-1.0, 0.0, 1.0]);

        let back = from_model_range(&y).unwrap();
        assert_eq!(back.to_vec1::<f32>().unwrap(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_style_names() {
        assert_eq!(CartoonStyle::from_name("Hayao").unwrap(), CartoonStyle::Hayao);
        assert_eq!(CartoonStyle::from_name("Hosoda").unwrap(), CartoonStyle::Hosoda);
        assert_eq!(CartoonStyle::Hosoda.to_string(), "Hosoda");
    }

    #[test]
    fn test_unknown_style_is_config_error() {
        let err = CartoonStyle::from_name("Shinkai").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("No such model"));

        // names are case sensitive
        assert!(CartoonStyle::from_name("hayao").is_err());
    }

    #[test]
    fn test_cache_keys_and_weights_files() {
        assert_eq!(CartoonStyle::Hayao.cache_key(), "model_cache_hayao");
        assert_eq!(CartoonStyle::Hosoda.cache_key(), "model_cache_hosoda");
        assert_eq!(CartoonStyle::Hayao.weights_file(), "Hayao_net_G_float.onnx");
    }
}
