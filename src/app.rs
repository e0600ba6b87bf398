//! Application state and core logic

use crate::i18n::Translator;
use crate::state::{
    AppState, EditOutcome, FieldEdit, Form, Notice, SubmissionState, SubmissionTarget,
};
use crate::submit::{StepSubmitter, SubmissionReceipt, SubmitError};
use crate::wizard::review::{self, ReviewSection};
use crate::wizard::{AggregateApplication, FieldValue, FormValues, Route, StepId};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Values handed to the submitter
#[derive(Debug, Clone)]
enum SubmissionPayload {
    Page(Route, FormValues),
    Application(AggregateApplication),
}

impl SubmissionPayload {
    fn target(&self) -> SubmissionTarget {
        match self {
            Self::Page(route, _) => SubmissionTarget::Page(*route),
            Self::Application(_) => SubmissionTarget::Application,
        }
    }
}

/// Result of one submission attempt, sent back from its task
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub attempt: Uuid,
    pub result: Result<SubmissionReceipt, SubmitError>,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    pub translator: Translator,
    submitter: Arc<dyn StepSubmitter>,
    outcome_tx: mpsc::UnboundedSender<SubmissionOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<SubmissionOutcome>,
    /// Whether the app should quit
    quit: bool,
}

fn ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

impl App {
    pub fn new(translator: Translator, submitter: Arc<dyn StepSubmitter>, start: Route) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(start),
            translator,
            submitter,
            outcome_tx,
            outcome_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn set_status(&mut self, key: &str) {
        self.state.status_message = Some(self.translator.t(key).to_string());
    }

    /// Review summary of everything committed so far
    pub fn review_summary(&self) -> Vec<ReviewSection> {
        review::summarize(&self.state.aggregate, &self.translator)
    }

    /// Whether the primary action of the current page is enabled
    pub fn primary_enabled(&self) -> bool {
        if self.state.submission.is_pending() {
            return false;
        }
        match self.state.current_route() {
            Route::Step(StepId::Review) => self.state.form.values.flag("finalConsent"),
            _ => self.state.form.can_advance(),
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && ctrl(&key) {
            self.quit = true;
            return Ok(());
        }

        // Completion dialog is modal
        if self.state.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.notice = None;
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        if key.code == KeyCode::Esc {
            self.state.banner = None;
            return Ok(());
        }

        match self.state.current_route() {
            Route::Step(StepId::Review) => self.handle_review_key(key),
            _ => self.handle_form_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.state.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.prev_field(),
            KeyCode::Char('e') if ctrl(&key) => self.toggle_section(),
            KeyCode::Char('s') if ctrl(&key) => self.save_section(),
            KeyCode::Char('n') if ctrl(&key) => self.submit_page(),
            KeyCode::Enter => self.submit_page(),
            KeyCode::Char('b') if ctrl(&key) => self.go_back(),
            KeyCode::Char('l') if ctrl(&key) => self.switch_account_page(),
            KeyCode::Left => self.edit(FieldEdit::ActivateBack),
            KeyCode::Right => self.edit(FieldEdit::Activate),
            KeyCode::Char(c) if !ctrl(&key) => self.edit(FieldEdit::Char(c)),
            KeyCode::Backspace => self.edit(FieldEdit::Backspace),
            _ => {}
        }
        Ok(())
    }

    fn handle_review_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.review_cursor = self.state.review_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.review_summary().len().saturating_sub(1);
                self.state.review_cursor = (self.state.review_cursor + 1).min(last);
            }
            KeyCode::Char('e') if !ctrl(&key) => self.edit_from_review(),
            KeyCode::Char('c') | KeyCode::Char(' ') if !ctrl(&key) => self.toggle_consent(),
            KeyCode::Char('y') if !ctrl(&key) => {
                if let Err(err) = self.copy_summary() {
                    tracing::warn!(error = %err, "clipboard copy failed");
                    self.state.status_message = Some(format!("Copy failed: {err}"));
                }
            }
            KeyCode::Enter => self.submit_application(),
            KeyCode::Char('n') if ctrl(&key) => self.submit_application(),
            KeyCode::Char('b') if ctrl(&key) => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    fn edit(&mut self, edit: FieldEdit) {
        if self.state.submission.is_pending() {
            return;
        }
        if self.state.form.edit_active(edit) == EditOutcome::Locked {
            self.set_status("ui.status.locked");
        }
    }

    /// Switch the focused field's section between edit and saved mode
    pub fn toggle_section(&mut self) {
        if let Some(section) = self.state.form.toggle_active_section() {
            tracing::debug!(section, "section edit mode toggled");
        }
    }

    /// Validate and lock the focused field's section
    pub fn save_section(&mut self) {
        match self.state.form.save_active_section() {
            Some(_) => self.set_status("ui.status.saved"),
            None => self.set_status("ui.status.fixErrors"),
        }
    }

    /// Register and login link to each other
    fn switch_account_page(&mut self) {
        let target = match self.state.current_route() {
            Route::Register => Route::Login,
            Route::Login => Route::Register,
            _ => return,
        };
        self.state.abandon_submission();
        self.state.go_to(target);
    }

    /// Primary action of a form page: validate, then submit its values
    pub fn submit_page(&mut self) {
        if self.state.submission.is_pending() {
            tracing::debug!("primary action ignored while a submission is pending");
            return;
        }
        if !self.state.form.validate() {
            self.set_status("ui.status.fixErrors");
            return;
        }
        let route = self.state.current_route();
        let values = self.state.form.values.clone();
        self.begin_submission(SubmissionPayload::Page(route, values));
    }

    fn begin_submission(&mut self, payload: SubmissionPayload) {
        let attempt = match self.state.start_submission(payload.target()) {
            Ok(attempt) => attempt,
            Err(err) => {
                tracing::debug!(error = %err, "submission not started");
                return;
            }
        };
        tracing::info!(%attempt, submission = ?payload.target(), "submission started");
        let submitter = Arc::clone(&self.submitter);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = match payload {
                SubmissionPayload::Page(route, values) => submitter.submit_step(route, values).await,
                SubmissionPayload::Application(application) => {
                    submitter.submit_application(application).await
                }
            };
            // The receiver only goes away when the app is shutting down
            let _ = tx.send(SubmissionOutcome { attempt, result });
        });
    }

    /// Apply every submission result that has arrived since the last tick
    pub fn poll_submissions(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.complete_submission(outcome);
        }
    }

    /// Wait for the next submission result and apply it
    #[cfg(test)]
    pub async fn wait_for_submission(&mut self) {
        if let Some(outcome) = self.outcome_rx.recv().await {
            self.complete_submission(outcome);
        }
    }

    fn complete_submission(&mut self, outcome: SubmissionOutcome) {
        let Some(target) = self.state.finish_submission(outcome.attempt) else {
            tracing::debug!(attempt = %outcome.attempt, "ignoring stale submission result");
            return;
        };
        match outcome.result {
            Ok(receipt) => {
                tracing::info!(
                    reference = %receipt.reference,
                    received_at = %receipt.received_at,
                    submission = ?target,
                    "submission accepted"
                );
                match target {
                    SubmissionTarget::Page(route) => self.page_accepted(route),
                    SubmissionTarget::Application => self.application_accepted(receipt),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, submission = ?target, "submission failed");
                self.state.banner = Some(format!(
                    "{}: {err}",
                    self.translator.t("ui.banner.submitFailed")
                ));
            }
        }
    }

    fn page_accepted(&mut self, route: Route) {
        match route {
            Route::Register => self.state.go_to(Route::CreatePassword),
            Route::CreatePassword | Route::Login => {
                let first = self.state.wizard.current_step();
                self.state.go_to(first.route());
            }
            Route::Step(step) => self.step_accepted(step),
        }
    }

    fn step_accepted(&mut self, step: StepId) {
        self.state
            .aggregate
            .commit(step, self.state.form.values.clone());
        let target = self.state.return_to_review.then_some(StepId::Review);
        let state = &mut self.state;
        match state.wizard.advance(target, &mut state.router) {
            Ok(_) => {
                state.return_to_review = false;
                state.sync_form();
            }
            Err(err) => tracing::debug!(error = %err, "advance rejected"),
        }
    }

    fn application_accepted(&mut self, receipt: SubmissionReceipt) {
        let state = &mut self.state;
        if let Err(err) = state.wizard.finish(&mut state.router) {
            tracing::warn!(error = %err, "application accepted outside the review step");
            return;
        }
        tracing::info!(
            reference = %receipt.reference,
            complete = state.wizard.is_complete(),
            "application completed"
        );
        state.notice = Some(Notice {
            title_key: "ui.notice.title",
            reference: receipt.reference,
        });
        self.set_status("ui.status.submitted");
        self.state.reset_session();
    }

    /// Previous step, or the previous account page before the wizard
    pub fn go_back(&mut self) {
        self.state.abandon_submission();
        let state = &mut self.state;
        match state.current_step() {
            Some(_) => {
                if let Err(err) = state.wizard.retreat(&mut state.router) {
                    tracing::debug!(error = %err, "back ignored");
                    return;
                }
                state.return_to_review = false;
            }
            None => {
                state.router.back();
            }
        }
        state.sync_form();
    }

    /// Jump from the review page to the selected step's form
    pub fn edit_from_review(&mut self) {
        let Some(section) = self.review_summary().into_iter().nth(self.state.review_cursor) else {
            return;
        };
        self.state.abandon_submission();
        let state = &mut self.state;
        match review::on_edit(&mut state.wizard, section.step, &mut state.router) {
            Ok(_) => {
                state.return_to_review = true;
                state.sync_form();
                state.form.unlock_all();
            }
            Err(err) => tracing::debug!(error = %err, "edit rejected"),
        }
    }

    fn toggle_consent(&mut self) {
        if self.state.submission.is_pending() {
            return;
        }
        let given = self.state.form.values.flag("finalConsent");
        self.state
            .form
            .set_value("finalConsent", FieldValue::Flag(!given));
    }

    /// Final submission, gated on consent
    pub fn submit_application(&mut self) {
        if self.state.submission.is_pending() {
            tracing::debug!("submit ignored while a submission is pending");
            return;
        }
        if let Err(err) = review::ensure_consent(self.state.form.values.flag("finalConsent")) {
            tracing::debug!(error = %err, "submit blocked");
            self.set_status("ui.review.consentRequired");
            return;
        }
        self.state
            .aggregate
            .commit(StepId::Review, self.state.form.values.clone());
        let application = self.state.aggregate.clone();
        self.begin_submission(SubmissionPayload::Application(application));
    }

    /// Copy the review summary as plain text
    pub fn copy_summary(&mut self) -> Result<()> {
        let text = review::to_plain_text(&self.review_summary());
        self.copy_to_clipboard(&text)?;
        self.set_status("ui.status.copied");
        Ok(())
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }

    /// Whether the back action has somewhere to go
    pub fn can_go_back(&self) -> bool {
        match self.state.current_step() {
            Some(step) => self.state.wizard.steps().first() != Some(&step),
            None => !self.state.router.history().is_empty(),
        }
    }

    /// Whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        matches!(self.state.submission, SubmissionState::Submitting { .. })
    }
}
