use crate::StylizeError;
use deli_base::Tensor;
use std::collections::HashMap;

/// A loaded, ready-to-run model instance.
pub trait Session: Send {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, StylizeError>;
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];
}

/// Feeds `input` to the model's first input and returns its first output.
pub(crate) fn run_single(
    session: &mut dyn Session,
    input: Tensor<f32>,
) -> Result<Tensor<f32>, StylizeError> {
    let input_name = session
        .input_names()
        .first()
        .ok_or_else(|| StylizeError::Backend("model has no inputs".to_string()))?
        .clone();
    let output_name = session
        .output_names()
        .first()
        .ok_or_else(|| StylizeError::Backend("model has no outputs".to_string()))?
        .clone();

    let mut outputs = session.run(&[(input_name.as_str(), input)])?;
    outputs.remove(&output_name).ok_or_else(|| {
        StylizeError::Backend(format!("model did not produce output '{output_name}'"))
    })
}
