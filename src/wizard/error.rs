//! Wizard transition errors
//!
//! None of these leave the wizard in a changed state.

use super::step::StepId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("already on the last step")]
    NoNextStep,
    #[error("already on the first step")]
    NoPreviousStep,
    #[error("step {0} has not been visited yet")]
    NotVisited(StepId),
    #[error("{0} is not part of this wizard")]
    UnknownStep(StepId),
    #[error("final consent has not been given")]
    ConsentRequired,
    #[error("a submission is already in progress")]
    SubmissionPending,
    #[error("the application can only be finished from the review step")]
    NotOnReview,
}
