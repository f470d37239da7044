//! One inference call: form values plus constants in, label and probability
//! out.

use northstar_params::{FormState, PredictionRecord};
use northstar_pipeline::{Classifier, Label, PipelineError};
use serde::Serialize;

/// The outcome of a successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted class.
    pub label: Label,
    /// Probability of the success class.
    pub probability: f64,
}

impl Prediction {
    /// The probability with `precision` decimal places.
    #[must_use]
    pub fn probability_text(&self, precision: usize) -> String {
        format!("{:.*}", precision, self.probability)
    }
}

/// Machine-readable report of one prediction.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Badge text.
    pub label: Label,
    /// Class index.
    pub class: u8,
    /// Probability of the success class.
    pub probability: f64,
    /// The record that was sent.
    pub record: &'a PredictionRecord,
}

impl<'a> Report<'a> {
    /// Pairs a prediction with the record it was computed from.
    #[must_use]
    pub fn new(prediction: Prediction, record: &'a PredictionRecord) -> Self {
        Self {
            label: prediction.label,
            class: prediction.label.index(),
            probability: prediction.probability,
            record,
        }
    }
}

/// Runs `classifier` on an already assembled record.
///
/// The label and the probability come from two separate calls and are not
/// cross-checked.
///
/// # Errors
///
/// Propagates the classifier's schema errors unchanged.
pub fn invoke_record<C>(
    classifier: &C,
    record: &PredictionRecord,
) -> Result<Prediction, PipelineError>
where
    C: Classifier + ?Sized,
{
    let label = classifier.predict(record)?;
    let probability = classifier.predict_probability(record)?;
    log::debug!("predicted {} (p = {})", label.as_str(), probability);
    Ok(Prediction { label, probability })
}

/// Builds the record from `form` and runs `classifier` on it.
///
/// # Errors
///
/// Propagates the classifier's schema errors unchanged.
pub fn invoke<C>(classifier: &C, form: &FormState) -> Result<Prediction, PipelineError>
where
    C: Classifier + ?Sized,
{
    invoke_record(classifier, &form.to_record())
}
