//! Application state definitions

use super::forms::PageForm;
use crate::wizard::{
    AggregateApplication, FormValues, Navigator, Route, StepId, WizardController, WizardError,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Current page and the pages visited before it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Return to the previous page, if any
    pub fn back(&mut self) -> Option<Route> {
        let previous = self.history.pop()?;
        self.current = previous;
        Some(previous)
    }
}

impl Navigator for Router {
    fn go_to(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        tracing::debug!(from = %self.current, to = %route, "navigate");
        self.history.push(self.current);
        self.current = route;
    }
}

/// What a pending submission is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionTarget {
    Page(Route),
    Application,
}

/// Lifecycle of the primary action's submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting {
        attempt: Uuid,
        target: SubmissionTarget,
    },
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

/// Modal message shown after the application is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title_key: &'static str,
    pub reference: Uuid,
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    // Navigation
    pub router: Router,
    pub wizard: WizardController,

    // Data
    pub form: PageForm,
    pub aggregate: AggregateApplication,
    /// Values of pages the user left, restored on return
    drafts: HashMap<Route, FormValues>,

    // Review
    pub review_cursor: usize,
    /// Set by an edit from the review page; the next advance returns there
    pub return_to_review: bool,

    // Submission
    pub submission: SubmissionState,
    pub banner: Option<String>,

    // UI state
    pub status_message: Option<String>,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Route::Register)
    }
}

impl AppState {
    /// Step routes other than the first step are not reachable before the
    /// wizard starts; they fall back to registration.
    pub fn new(start: Route) -> Self {
        let wizard = WizardController::new();
        let start = match start {
            Route::Step(step) if step != wizard.current_step() => Route::Register,
            route => route,
        };
        Self {
            router: Router::new(start),
            wizard,
            form: PageForm::new(start),
            aggregate: AggregateApplication::default(),
            drafts: HashMap::new(),
            review_cursor: 0,
            return_to_review: false,
            submission: SubmissionState::Idle,
            banner: None,
            status_message: None,
            notice: None,
        }
    }

    pub fn current_route(&self) -> Route {
        self.router.current()
    }

    pub fn current_step(&self) -> Option<StepId> {
        self.current_route().step()
    }

    /// Swap the on-screen form after the router moved.
    ///
    /// The leaving page's values are kept as a draft; the entering page
    /// restores its draft, else its committed values, else starts empty.
    pub fn sync_form(&mut self) {
        let route = self.router.current();
        if self.form.route == route {
            return;
        }
        let leaving = std::mem::replace(&mut self.form, PageForm::new(route));
        self.drafts.insert(leaving.route, leaving.values);
        let restored = self.drafts.remove(&route).or_else(|| {
            route
                .step()
                .and_then(|step| self.aggregate.get(step))
                .cloned()
        });
        if let Some(values) = restored {
            self.form = PageForm::with_values(route, values);
        }
        // A submitted step comes back read-only until a section is opened
        if route.step().is_some_and(|step| self.wizard.is_completed(step)) {
            self.form.sections.lock_all();
        }
        self.banner = None;
        self.review_cursor = 0;
    }

    /// Move the router to `route` and load its form
    pub fn go_to(&mut self, route: Route) {
        self.router.go_to(route);
        self.sync_form();
    }

    /// Mark a submission as in flight; only one may be pending
    pub fn start_submission(&mut self, target: SubmissionTarget) -> Result<Uuid, WizardError> {
        if self.submission.is_pending() {
            return Err(WizardError::SubmissionPending);
        }
        let attempt = Uuid::new_v4();
        self.submission = SubmissionState::Submitting { attempt, target };
        self.banner = None;
        Ok(attempt)
    }

    /// Settle the pending submission if `attempt` is still the one in flight
    pub fn finish_submission(&mut self, attempt: Uuid) -> Option<SubmissionTarget> {
        match self.submission {
            SubmissionState::Submitting {
                attempt: pending,
                target,
            } if pending == attempt => {
                self.submission = SubmissionState::Idle;
                Some(target)
            }
            _ => None,
        }
    }

    /// Forget the pending submission; its result will be ignored
    pub fn abandon_submission(&mut self) {
        if self.submission.is_pending() {
            tracing::debug!("pending submission abandoned");
        }
        self.submission = SubmissionState::Idle;
    }

    /// Start over with an empty application, keeping the completion notice
    pub fn reset_session(&mut self) {
        let notice = self.notice.take();
        let status = self.status_message.take();
        *self = Self::new(Route::Register);
        self.notice = notice;
        self.status_message = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::FieldValue;

    mod router {
        use super::*;

        #[test]
        fn test_go_to_records_history() {
            let mut router = Router::new(Route::Register);
            router.go_to(Route::CreatePassword);
            router.go_to(Route::Step(StepId::AboutYou));
            assert_eq!(router.current(), Route::Step(StepId::AboutYou));
            assert_eq!(router.history(), &[Route::Register, Route::CreatePassword]);
        }

        #[test]
        fn test_go_to_same_route_is_ignored() {
            let mut router = Router::new(Route::Login);
            router.go_to(Route::Login);
            assert!(router.history().is_empty());
        }

        #[test]
        fn test_back() {
            let mut router = Router::new(Route::Register);
            assert_eq!(router.back(), None);
            router.go_to(Route::Login);
            assert_eq!(router.back(), Some(Route::Register));
            assert_eq!(router.current(), Route::Register);
        }
    }

    mod forms {
        use super::*;

        #[test]
        fn test_draft_restored_on_return() {
            let mut state = AppState::new(Route::Register);
            state.form.set_value("firstName", FieldValue::Text("Ada".to_string()));
            state.go_to(Route::Login);
            assert_eq!(state.form.route, Route::Login);
            assert_eq!(state.form.values.text("firstName"), "");

            state.go_to(Route::Register);
            assert_eq!(state.form.values.text("firstName"), "Ada");
        }

        #[test]
        fn test_committed_values_restored_without_draft() {
            let mut state = AppState::new(Route::Register);
            let mut values = FormValues::default();
            values.set_text("practitionerName", "Dr. Ada");
            state.aggregate.commit(StepId::Licensing, values);

            state.go_to(Route::Step(StepId::Licensing));
            assert_eq!(state.form.values.text("practitionerName"), "Dr. Ada");
        }

        #[test]
        fn test_completed_step_returns_locked() {
            let mut state = AppState::new(Route::Step(StepId::AboutYou));
            state.wizard.advance(None, &mut state.router).unwrap();
            state.sync_form();
            assert!(state.form.sections.is_editable("license"));

            state.wizard.retreat(&mut state.router).unwrap();
            state.sync_form();
            assert_eq!(state.current_route(), Route::Step(StepId::AboutYou));
            assert!(!state.form.sections.is_editable("practice"));
        }

        #[test]
        fn test_late_start_route_falls_back() {
            let state = AppState::new(Route::Step(StepId::AutoPay));
            assert_eq!(state.current_route(), Route::Register);
            let state = AppState::new(Route::Step(StepId::AboutYou));
            assert_eq!(state.current_route(), Route::Step(StepId::AboutYou));
        }
    }

    mod submission {
        use super::*;

        #[test]
        fn test_only_one_pending() {
            let mut state = AppState::default();
            let attempt = state.start_submission(SubmissionTarget::Page(Route::Register));
            assert!(attempt.is_ok());
            assert_eq!(
                state.start_submission(SubmissionTarget::Page(Route::Register)),
                Err(WizardError::SubmissionPending)
            );
        }

        #[test]
        fn test_finish_matches_attempt() {
            let mut state = AppState::default();
            let attempt = state
                .start_submission(SubmissionTarget::Application)
                .unwrap();
            assert_eq!(state.finish_submission(Uuid::new_v4()), None);
            assert!(state.submission.is_pending());
            assert_eq!(
                state.finish_submission(attempt),
                Some(SubmissionTarget::Application)
            );
            assert_eq!(state.submission, SubmissionState::Idle);
        }

        #[test]
        fn test_abandoned_attempt_is_stale() {
            let mut state = AppState::default();
            let attempt = state
                .start_submission(SubmissionTarget::Page(Route::Login))
                .unwrap();
            state.abandon_submission();
            assert_eq!(state.finish_submission(attempt), None);
        }

        #[test]
        fn test_reset_keeps_notice() {
            let mut state = AppState::default();
            state.aggregate.commit(StepId::AboutYou, FormValues::default());
            state.notice = Some(Notice {
                title_key: "ui.notice.title",
                reference: Uuid::nil(),
            });
            state.reset_session();
            assert!(state.aggregate.is_empty());
            assert!(state.notice.is_some());
            assert_eq!(state.current_route(), Route::Register);
        }
    }
}
