//! Per-user interaction state.
//!
//! One linear cycle per interaction: `Idle -> Edited -> Triggered ->
//! Displayed -> Idle`. A trigger always runs to completion before the next
//! command is accepted, so there is never more than one prediction in
//! flight.

use northstar_params::{Catalog, FormError, FormState, RangePolicy};
use northstar_pipeline::Classifier;

use crate::invoker::{invoke, Prediction};

/// Where the session is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for input.
    Idle,
    /// At least one field changed since the last result.
    Edited,
    /// A prediction is running.
    Triggered,
    /// A result or failure is on screen.
    Displayed,
}

/// What the last trigger produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Label and probability.
    Predicted(Prediction),
    /// The pipeline rejected the record.
    Failed(String),
}

/// Form values plus the current phase and outcome.
#[derive(Debug, Clone)]
pub struct Session {
    form: FormState,
    policy: RangePolicy,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl Session {
    /// A fresh session holding every default.
    #[must_use]
    pub fn new(catalog: &'static Catalog, policy: RangePolicy) -> Self {
        Self {
            form: FormState::defaults(catalog),
            policy,
            phase: Phase::Idle,
            outcome: None,
        }
    }

    /// Current form values.
    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The last outcome, kept until the next edit or reset.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Range policy applied to numeric edits.
    #[must_use]
    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Sets one field from widget text. A successful edit clears any
    /// displayed outcome; a rejected one leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`FormError`] raised by the form.
    pub fn edit(&mut self, id: &str, raw: &str) -> Result<(), FormError> {
        self.form.set_from_str(id, raw, self.policy)?;
        self.outcome = None;
        self.phase = Phase::Edited;
        Ok(())
    }

    /// Restores every default and clears the outcome.
    pub fn reset(&mut self) {
        self.form.reset();
        self.outcome = None;
        self.phase = Phase::Idle;
    }

    /// Runs one prediction with the current values and stores the outcome.
    pub fn trigger<C>(&mut self, classifier: &C) -> &Outcome
    where
        C: Classifier + ?Sized,
    {
        self.phase = Phase::Triggered;
        let outcome = match invoke(classifier, &self.form) {
            Ok(prediction) => Outcome::Predicted(prediction),
            Err(e) => {
                log::error!("prediction failed: {}", e);
                Outcome::Failed(e.to_string())
            }
        };
        self.phase = Phase::Displayed;
        self.outcome.insert(outcome)
    }

    /// Marks a displayed outcome as seen. The outcome stays visible until
    /// the next edit.
    pub fn settle(&mut self) {
        if self.phase == Phase::Displayed {
            self.phase = Phase::Idle;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use northstar_params::PredictionRecord;
    use northstar_pipeline::{Label, PipelineError};

    struct Fixed;

    impl Classifier for Fixed {
        fn predict(&self, _: &PredictionRecord) -> Result<Label, PipelineError> {
            Ok(Label::Success)
        }

        fn predict_probability(&self, _: &PredictionRecord) -> Result<f64, PipelineError> {
            Ok(0.9)
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn predict(&self, _: &PredictionRecord) -> Result<Label, PipelineError> {
            Err(PipelineError::SchemaMismatch {
                detail: "missing column `x`".to_string(),
            })
        }

        fn predict_probability(&self, _: &PredictionRecord) -> Result<f64, PipelineError> {
            Ok(0.0)
        }
    }

    fn session() -> Session {
        Session::new(Catalog::full(), RangePolicy::Reject)
    }

    #[test]
    fn full_cycle() {
        let mut s = session();
        assert_eq!(s.phase(), Phase::Idle);
        s.edit("power", "200").unwrap();
        assert_eq!(s.phase(), Phase::Edited);
        let outcome = s.trigger(&Fixed).clone();
        assert!(matches!(outcome, Outcome::Predicted(p) if p.label == Label::Success));
        assert_eq!(s.phase(), Phase::Displayed);
        s.settle();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.outcome().is_some());
    }

    #[test]
    fn editing_clears_the_result() {
        let mut s = session();
        s.trigger(&Fixed);
        s.edit("atmosphere", "Nitrogen").unwrap();
        assert!(s.outcome().is_none());
        assert_eq!(s.phase(), Phase::Edited);
    }

    #[test]
    fn rejected_edit_keeps_state() {
        let mut s = session();
        s.trigger(&Fixed);
        assert!(s.edit("power", "9000").is_err());
        assert_eq!(s.phase(), Phase::Displayed);
        assert!(s.outcome().is_some());
        assert_eq!(s.form().numeric("power"), Some(180.0));
    }

    #[test]
    fn pipeline_errors_become_a_failure_outcome() {
        let mut s = session();
        match s.trigger(&Broken) {
            Outcome::Failed(message) => assert!(message.contains("missing column `x`")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = session();
        s.edit("velocity", "1.5").unwrap();
        s.trigger(&Fixed);
        s.reset();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.outcome().is_none());
        assert_eq!(s.form().numeric("velocity"), Some(0.9));
    }
}
