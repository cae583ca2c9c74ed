//! Frame stylization for the deli ecosystem.
//!
//! A [`StyleDispatcher`] picks one of two GAN backends per call:
//!
//! - [`ComixStylizer`]: one generator loaded up front, frames stacked in
//!   groups of [`COMIX_BATCH_SIZE`].
//! - [`CartoonStylizer`]: per-style generators loaded lazily into a
//!   [`ModelCache`], frames run one at a time.
//!
//! Frames are `Tensor<u8>` in HWC layout; stylized frames are `Tensor<f32>`
//! in display range and are not re-quantized here.

pub mod backend;
pub mod backends;
pub mod cache;
pub mod cartoon;
pub mod comix;
pub mod config;
pub mod device;
pub mod dispatcher;
pub mod error;
pub mod frame;
pub mod modelsource;
pub mod session;

pub use backend::Backend;
pub use backends::OnnxBackend;
pub use cache::ModelCache;
pub use cartoon::{CartoonModel, CartoonStyle, CartoonStylizer, CARTOON_TARGET_SIZE};
pub use comix::{ComixStylizer, COMIX_BATCH_SIZE};
pub use config::StylizeConfig;
pub use device::Device;
pub use dispatcher::{StyleDispatcher, StyleMode};
pub use error::StylizeError;
pub use frame::{Frame, StylizedFrame};
pub use modelsource::ModelSource;
pub use session::Session;
