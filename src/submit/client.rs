//! Local submission backend
//!
//! Accepts every submission after a configurable delay and records it in the
//! log. Targets listed in `fail_targets` are rejected instead, which drives the
//! retry banner without a real service.

use super::traits::{StepSubmitter, SubmissionReceipt, SubmitError};
use crate::config::OnboardConfig;
use crate::wizard::{AggregateApplication, FormValues, Route, StepId};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

/// Target name of the final application in `fail_targets`
pub const APPLICATION_TARGET: &str = "application";

#[derive(Debug, Clone, Default)]
pub struct LoggingSubmitter {
    delay: Duration,
    fail_targets: HashSet<String>,
}

impl LoggingSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_targets: HashSet::new(),
        }
    }

    pub fn from_config(config: &OnboardConfig) -> Self {
        Self::new(config.submit_delay()).failing(config.fail_targets.iter().flatten().cloned())
    }

    /// Reject submissions to these targets (route paths or `application`)
    pub fn failing(mut self, targets: impl IntoIterator<Item = String>) -> Self {
        self.fail_targets.extend(targets);
        self
    }

    async fn accept(&self, target: &str) -> Result<SubmissionReceipt, SubmitError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_targets.contains(target) {
            tracing::warn!(target_name = target, "submission rejected by configuration");
            return Err(SubmitError::Rejected {
                target: target.to_string(),
                reason: "configured to fail".to_string(),
            });
        }
        let receipt = SubmissionReceipt::new();
        tracing::info!(
            target_name = target,
            reference = %receipt.reference,
            "submission accepted"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl StepSubmitter for LoggingSubmitter {
    async fn submit_step(
        &self,
        route: Route,
        values: FormValues,
    ) -> Result<SubmissionReceipt, SubmitError> {
        // Field names only; values may hold secrets
        let fields: Vec<&str> = values.iter().map(|(name, _)| name).collect();
        tracing::debug!(route = %route, count = values.len(), ?fields, "submitting page");
        self.accept(route.path()).await
    }

    async fn submit_application(
        &self,
        application: AggregateApplication,
    ) -> Result<SubmissionReceipt, SubmitError> {
        if application.is_empty() {
            return Err(SubmitError::Rejected {
                target: APPLICATION_TARGET.to_string(),
                reason: "application is empty".to_string(),
            });
        }
        let steps: Vec<String> = application.iter().map(|(step, _)| step.to_string()).collect();
        tracing::debug!(?steps, "submitting application");
        let missing = StepId::ALL
            .into_iter()
            .filter(|step| *step != StepId::Review)
            .find(|step| !application.contains(*step));
        if let Some(step) = missing {
            tracing::warn!(%step, "application is missing a step");
            return Err(SubmitError::Rejected {
                target: APPLICATION_TARGET.to_string(),
                reason: format!("step {step} was not submitted"),
            });
        }
        self.accept(APPLICATION_TARGET).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::StepId;

    #[tokio::test]
    async fn test_accepts_by_default() {
        let submitter = LoggingSubmitter::new(Duration::ZERO);
        let receipt = submitter
            .submit_step(Route::Step(StepId::AboutYou), FormValues::default())
            .await
            .unwrap();
        assert!(!receipt.reference.is_nil());
    }

    #[tokio::test]
    async fn test_fail_targets_reject_matching_route() {
        let submitter =
            LoggingSubmitter::new(Duration::ZERO).failing(["/step4".to_string()]);

        let rejected = submitter
            .submit_step(Route::Step(StepId::AutoPay), FormValues::default())
            .await;
        assert_eq!(
            rejected,
            Err(SubmitError::Rejected {
                target: "/step4".to_string(),
                reason: "configured to fail".to_string(),
            })
        );

        let accepted = submitter
            .submit_step(Route::Step(StepId::Loyalty), FormValues::default())
            .await;
        assert!(accepted.is_ok());
    }

    fn full_application() -> AggregateApplication {
        let mut application = AggregateApplication::default();
        for step in StepId::ALL {
            application.commit(step, FormValues::default());
        }
        application
    }

    #[tokio::test]
    async fn test_application_target() {
        let submitter = LoggingSubmitter::new(Duration::ZERO);
        assert!(submitter.submit_application(full_application()).await.is_ok());

        let submitter = submitter.failing([APPLICATION_TARGET.to_string()]);
        let result = submitter.submit_application(full_application()).await;
        assert!(matches!(result, Err(SubmitError::Rejected { .. })));
    }

    #[tokio::test]
    async fn test_incomplete_application_rejected() {
        let submitter = LoggingSubmitter::new(Duration::ZERO);
        let mut application = AggregateApplication::default();
        for step in StepId::ALL.into_iter().filter(|step| *step != StepId::AutoPay) {
            application.commit(step, FormValues::default());
        }
        let result = submitter.submit_application(application).await;
        assert_eq!(
            result,
            Err(SubmitError::Rejected {
                target: APPLICATION_TARGET.to_string(),
                reason: "step /step4 was not submitted".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_waits_for_delay() {
        let submitter = LoggingSubmitter::new(Duration::from_millis(50));
        let start = tokio::time::Instant::now();
        submitter
            .submit_step(Route::Register, FormValues::default())
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_from_config() {
        let config = OnboardConfig {
            submit_delay_ms: Some(0),
            fail_targets: Some(vec!["/login".to_string()]),
            ..Default::default()
        };
        let submitter = LoggingSubmitter::from_config(&config);
        let result = tokio_test::block_on(submitter.submit_step(Route::Login, FormValues::default()));
        assert!(result.is_err());
    }
}
