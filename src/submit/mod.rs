//! Submission backend

mod client;
mod traits;

pub use client::LoggingSubmitter;
pub use traits::{StepSubmitter, SubmissionReceipt, SubmitError};

#[cfg(test)]
pub use traits::MockStepSubmitter;
