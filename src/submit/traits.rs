//! Trait abstraction for the submission backend to enable mocking in tests

use crate::wizard::{AggregateApplication, FormValues, Route};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Acknowledgement returned by the backend for an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub received_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new() -> Self {
        Self {
            reference: Uuid::new_v4(),
            received_at: Utc::now(),
        }
    }
}

impl Default for SubmissionReceipt {
    fn default() -> Self {
        Self::new()
    }
}

/// Submission failures; retryable from the same page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{target} was rejected: {reason}")]
    Rejected { target: String, reason: String },
}

/// Backend that receives each page's values and the final application
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StepSubmitter: Send + Sync {
    /// Submit the values of one page
    async fn submit_step(
        &self,
        route: Route,
        values: FormValues,
    ) -> Result<SubmissionReceipt, SubmitError>;

    /// Submit the complete application from the review step
    async fn submit_application(
        &self,
        application: AggregateApplication,
    ) -> Result<SubmissionReceipt, SubmitError>;
}
