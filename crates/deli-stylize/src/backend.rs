use crate::{Device, ModelSource, Session, StylizeError};

/// Loads model weights into a runnable [`Session`] bound to a device.
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;
    fn load_model(
        &self,
        model: ModelSource,
        device: &Device,
    ) -> Result<Box<dyn Session>, StylizeError>;
}
