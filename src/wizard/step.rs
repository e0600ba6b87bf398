//! Step identifiers, routes and step status

use serde::{Deserialize, Serialize};
use std::fmt;

/// One top-level page in the onboarding sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepId {
    AboutYou,
    Licensing,
    CreditApplication,
    AutoPay,
    Loyalty,
    TaxExemption,
    Review,
}

impl StepId {
    /// All steps in wizard order
    pub const ALL: [StepId; 7] = [
        StepId::AboutYou,
        StepId::Licensing,
        StepId::CreditApplication,
        StepId::AutoPay,
        StepId::Loyalty,
        StepId::TaxExemption,
        StepId::Review,
    ];

    /// Zero-based position in the wizard
    pub fn position(self) -> usize {
        match self {
            Self::AboutYou => 0,
            Self::Licensing => 1,
            Self::CreditApplication => 2,
            Self::AutoPay => 3,
            Self::Loyalty => 4,
            Self::TaxExemption => 5,
            Self::Review => 6,
        }
    }

    /// Translation key of the step title
    pub fn label_key(self) -> &'static str {
        match self {
            Self::AboutYou => "step.about.title",
            Self::Licensing => "step.licensing.title",
            Self::CreditApplication => "step.credit.title",
            Self::AutoPay => "step.autopay.title",
            Self::Loyalty => "step.loyalty.title",
            Self::TaxExemption => "step.tax.title",
            Self::Review => "step.review.title",
        }
    }

    pub fn route(self) -> Route {
        Route::Step(self)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route().path())
    }
}

/// Every page reachable in the application, one path each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Register,
    CreatePassword,
    Login,
    Step(StepId),
}

impl Route {
    /// All routes in declaration order
    pub fn all() -> impl Iterator<Item = Route> {
        [Route::Register, Route::CreatePassword, Route::Login]
            .into_iter()
            .chain(StepId::ALL.into_iter().map(Route::Step))
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Register => "/",
            Self::CreatePassword => "/create-password",
            Self::Login => "/login",
            Self::Step(StepId::AboutYou) => "/step1",
            Self::Step(StepId::Licensing) => "/step2",
            Self::Step(StepId::CreditApplication) => "/step3",
            Self::Step(StepId::AutoPay) => "/step4",
            Self::Step(StepId::Loyalty) => "/step5",
            Self::Step(StepId::TaxExemption) => "/step6",
            Self::Step(StepId::Review) => "/step7",
        }
    }

    /// Parse a route path. No query parameters or sub-section paths exist.
    pub fn parse(path: &str) -> Option<Self> {
        Self::all().find(|route| route.path() == path)
    }

    pub fn step(self) -> Option<StepId> {
        match self {
            Self::Step(step) => Some(step),
            _ => None,
        }
    }

    /// Pages before the wizard starts
    pub fn is_unauthenticated(self) -> bool {
        self.step().is_none()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Completion status of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    #[default]
    Pending,
    Current,
    Completed,
}

impl StepStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pending => "○",
            Self::Current => "●",
            Self::Completed => "✓",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_order() {
        for (idx, step) in StepId::ALL.iter().enumerate() {
            assert_eq!(step.position(), idx);
        }
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Register.path(), "/");
        assert_eq!(Route::CreatePassword.path(), "/create-password");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(StepId::AboutYou.route().path(), "/step1");
        assert_eq!(StepId::Review.route().path(), "/step7");
    }

    #[test]
    fn test_parse_known_paths() {
        for route in Route::all() {
            assert_eq!(Route::parse(route.path()), Some(route));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/step8"), None);
        assert_eq!(Route::parse("/step1?section=billing"), None);
        assert_eq!(Route::parse(""), None);
    }

    #[test]
    fn test_unauthenticated_routes() {
        assert!(Route::Register.is_unauthenticated());
        assert!(Route::Login.is_unauthenticated());
        assert!(!StepId::AutoPay.route().is_unauthenticated());
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(StepStatus::default(), StepStatus::Pending);
    }
}
