//! Step sequencing: which step is active and which are completed

use super::error::WizardError;
use super::step::{Route, StepId, StepStatus};
use std::collections::BTreeSet;

/// Navigation collaborator invoked on every transition
pub trait Navigator {
    fn go_to(&mut self, route: Route);
}

/// Owns the ordered step list, the active step and per-step completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardController {
    steps: Vec<StepId>,
    current: usize,
    completed: BTreeSet<StepId>,
    visited: BTreeSet<StepId>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    /// Wizard over every step, first step active
    pub fn new() -> Self {
        Self::start(StepId::ALL.to_vec())
    }

    /// Wizard over a custom ordered step list; `None` when the list is empty
    #[cfg(test)]
    pub fn with_steps(steps: Vec<StepId>) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }
        Some(Self::start(steps))
    }

    fn start(steps: Vec<StepId>) -> Self {
        let visited = steps.first().copied().into_iter().collect();
        Self {
            steps,
            current: 0,
            completed: BTreeSet::new(),
            visited,
        }
    }

    pub fn current_step(&self) -> StepId {
        self.steps[self.current]
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    /// Completed wins over current: a revisited step stays completed
    pub fn status(&self, step: StepId) -> StepStatus {
        if self.completed.contains(&step) {
            StepStatus::Completed
        } else if step == self.current_step() {
            StepStatus::Current
        } else {
            StepStatus::Pending
        }
    }

    pub fn is_visited(&self, step: StepId) -> bool {
        self.visited.contains(&step)
    }

    pub fn is_completed(&self, step: StepId) -> bool {
        self.completed.contains(&step)
    }

    pub fn is_terminal(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    /// Every step completed
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|step| self.completed.contains(step))
    }

    fn index_of(&self, step: StepId) -> Result<usize, WizardError> {
        self.steps
            .iter()
            .position(|s| *s == step)
            .ok_or(WizardError::UnknownStep(step))
    }

    fn move_to(&mut self, index: usize, navigator: &mut dyn Navigator) -> StepId {
        let from = self.current_step();
        self.current = index;
        let to = self.current_step();
        self.visited.insert(to);
        tracing::info!(%from, %to, "wizard moved");
        navigator.go_to(to.route());
        to
    }

    /// Complete the current step and activate `target`, or the next step in order.
    ///
    /// Without a target, the terminal step has nowhere to go and nothing changes.
    pub fn advance(
        &mut self,
        target: Option<StepId>,
        navigator: &mut dyn Navigator,
    ) -> Result<StepId, WizardError> {
        let index = match target {
            Some(step) => self.index_of(step)?,
            None if self.is_terminal() => return Err(WizardError::NoNextStep),
            None => self.current + 1,
        };
        self.completed.insert(self.current_step());
        Ok(self.move_to(index, navigator))
    }

    /// Activate the previous step; completion flags are untouched
    pub fn retreat(&mut self, navigator: &mut dyn Navigator) -> Result<StepId, WizardError> {
        if self.current == 0 {
            return Err(WizardError::NoPreviousStep);
        }
        Ok(self.move_to(self.current - 1, navigator))
    }

    /// Jump back to a step the user has already reached
    pub fn jump_to(
        &mut self,
        step: StepId,
        navigator: &mut dyn Navigator,
    ) -> Result<StepId, WizardError> {
        let index = self.index_of(step)?;
        if !self.visited.contains(&step) {
            return Err(WizardError::NotVisited(step));
        }
        Ok(self.move_to(index, navigator))
    }

    /// Complete the terminal step after the final submission and return to the start
    pub fn finish(&mut self, navigator: &mut dyn Navigator) -> Result<(), WizardError> {
        if !self.is_terminal() {
            return Err(WizardError::NotOnReview);
        }
        self.completed.insert(self.current_step());
        tracing::info!("wizard finished");
        navigator.go_to(Route::Register);
        Ok(())
    }
}
