use crate::cache::ModelCache;
use crate::cartoon::{CartoonStyle, CartoonStylizer};
use crate::comix::ComixStylizer;
use crate::frame::{validate_batch, Frame, StylizedFrame};
use crate::{Backend, Device, ModelSource, StylizeConfig, StylizeError};
use deli_base::log;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Which backend (and style) a call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleMode {
    Comix,
    Cartoon(CartoonStyle),
}

impl StyleMode {
    /// Integer tag used by callers: 0 comix, 1 Hayao, 2 Hosoda.
    pub fn tag(&self) -> i64 {
        match self {
            StyleMode::Comix => 0,
            StyleMode::Cartoon(CartoonStyle::Hayao) => 1,
            StyleMode::Cartoon(CartoonStyle::Hosoda) => 2,
        }
    }
}

impl TryFrom<i64> for StyleMode {
    type Error = StylizeError;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(StyleMode::Comix),
            1 => Ok(StyleMode::Cartoon(CartoonStyle::Hayao)),
            2 => Ok(StyleMode::Cartoon(CartoonStyle::Hosoda)),
            _ => Err(StylizeError::Config(format!("unknown style transfer mode {tag}"))),
        }
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleMode::Comix => write!(f, "comix"),
            StyleMode::Cartoon(style) => write!(f, "cartoon/{style}"),
        }
    }
}

/// Entry point: routes a frame batch to exactly one backend.
pub struct StyleDispatcher {
    comix: ComixStylizer,
    cartoon: CartoonStylizer,
}

impl StyleDispatcher {
    pub fn new(comix: ComixStylizer, cartoon: CartoonStylizer) -> Self {
        Self { comix, cartoon }
    }

    /// Loads the comix model now; cartoon generators load on first use.
    pub fn from_config(
        config: &StylizeConfig,
        backend: Arc<dyn Backend>,
    ) -> Result<Self, StylizeError> {
        config.validate()?;
        let comix = ComixStylizer::load(
            backend.as_ref(),
            ModelSource::File(config.comix_model.clone()),
            &config.device(),
            config.max_frame_size,
        )?;
        let cartoon = CartoonStylizer::new(
            backend,
            config.cartoon_weights_dir.clone(),
            Arc::new(ModelCache::new()),
        );
        Ok(Self::new(comix, cartoon))
    }

    pub fn comix(&self) -> &ComixStylizer {
        &self.comix
    }

    pub fn cartoon(&self) -> &CartoonStylizer {
        &self.cartoon
    }

    /// Integer-tagged entry point. Unknown modes are configuration errors.
    pub fn get_stylized_frames(
        &self,
        frames: &[Frame],
        style_transfer_mode: i64,
        gpu: bool,
    ) -> Result<Vec<StylizedFrame>, StylizeError> {
        let mode = StyleMode::try_from(style_transfer_mode)?;
        self.stylize(frames, mode, &Device::from_gpu_flag(gpu))
    }

    /// Returns every stylized frame or an error, never a partial batch.
    pub fn stylize(
        &self,
        frames: &[Frame],
        mode: StyleMode,
        device: &Device,
    ) -> Result<Vec<StylizedFrame>, StylizeError> {
        validate_batch(frames)?;
        let start = Instant::now();

        let stylized = match mode {
            StyleMode::Comix => self.comix.stylize(frames)?,
            StyleMode::Cartoon(style) => self.cartoon.stylize(frames, style, device)?,
        };

        if stylized.len() != frames.len() {
            return Err(StylizeError::Backend(format!(
                "{mode} returned {} frames for {} inputs",
                stylized.len(),
                frames.len()
            )));
        }

        log::info!(
            "stylized {} frames with {mode} in {:.2?}",
            frames.len(),
            start.elapsed()
        );
        Ok(stylized)
    }
}
