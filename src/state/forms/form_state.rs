//! Per-page form state: values, section modes, errors and focus

use super::field::{apply_edit, FieldEdit};
use crate::wizard::validation;
use crate::wizard::visibility;
use crate::wizard::{
    page_def, FieldValue, FormValues, PageDef, Route, SectionDef, SectionEditState,
    ValidationResult, VisibilitySet,
};

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Outcome of a keyboard edit on the focused field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Changed,
    Unchanged,
    /// The field's section is saved and read-only
    Locked,
    NoField,
}

/// Everything one page needs while it is on screen
#[derive(Debug, Clone)]
pub struct PageForm {
    pub route: Route,
    pub values: FormValues,
    pub sections: SectionEditState,
    pub errors: ValidationResult,
    visibility: VisibilitySet,
    active_field_index: usize,
}

impl PageForm {
    pub fn new(route: Route) -> Self {
        Self::with_values(route, FormValues::for_page(page_def(route)))
    }

    /// Restore previously committed values, e.g. when revisiting a step
    pub fn with_values(route: Route, values: FormValues) -> Self {
        let page = page_def(route);
        let visibility = visibility::resolve(route, &values);
        Self {
            route,
            values,
            sections: SectionEditState::for_page(page),
            errors: ValidationResult::default(),
            visibility,
            active_field_index: 0,
        }
    }

    pub fn page(&self) -> &'static PageDef {
        page_def(self.route)
    }

    pub fn visibility(&self) -> &VisibilitySet {
        &self.visibility
    }

    /// Visible, enabled fields in tab order
    pub fn focus_ring(&self) -> Vec<&'static str> {
        visibility::active_fields(self.page(), &self.visibility)
    }

    pub fn active_field_name(&self) -> Option<&'static str> {
        self.focus_ring().get(self.active_field_index).copied()
    }

    /// Section owning the focused field
    pub fn active_section(&self) -> Option<&'static SectionDef> {
        self.active_field_name()
            .and_then(|name| self.page().section_of(name))
    }

    /// Focus a field by name; ignored if it is not focusable
    pub fn focus(&mut self, name: &str) {
        if let Some(index) = self.focus_ring().iter().position(|f| *f == name) {
            self.active_field_index = index;
        }
    }

    /// Whether input is accepted for a field: its section is in edit mode
    pub fn is_field_editable(&self, name: &str) -> bool {
        self.page()
            .section_of(name)
            .is_some_and(|section| self.sections.is_editable(section.key))
    }

    /// Set a value and run the page's change effects.
    ///
    /// Every field the change rewrote or took out of input drops its error
    /// until the next validation pass.
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> bool {
        let focused = self.active_field_name();
        let before = self.values.clone();
        let changed = visibility::apply_change(self.route, &mut self.values, name, value);
        if changed {
            self.visibility = visibility::resolve(self.route, &self.values);
            let stale: Vec<&'static str> = self
                .page()
                .fields()
                .map(|field| field.name)
                .filter(|field| {
                    *field == name
                        || before.get(field) != self.values.get(field)
                        || !self.visibility.is_enabled(field)
                })
                .collect();
            for field in stale {
                self.errors.clear_field(field);
            }
            // Keep focus on the same field when fields appear or disappear
            match focused {
                Some(focused) => self.focus(focused),
                None => self.active_field_index = 0,
            }
            let count = self.field_count();
            if self.active_field_index >= count {
                self.active_field_index = count.saturating_sub(1);
            }
        }
        changed
    }

    /// Apply a keyboard edit to the focused field
    pub fn edit_active(&mut self, edit: FieldEdit) -> EditOutcome {
        let Some(name) = self.active_field_name() else {
            return EditOutcome::NoField;
        };
        if !self.is_field_editable(name) {
            return EditOutcome::Locked;
        }
        let Some(field) = self.page().field(name) else {
            return EditOutcome::NoField;
        };
        let current = field.value_in(&self.values);
        if let Some(value) = apply_edit(field, &current, edit) {
            if self.set_value(name, value) {
                return EditOutcome::Changed;
            }
        }
        EditOutcome::Unchanged
    }

    /// Toggle edit mode of the focused field's section
    pub fn toggle_active_section(&mut self) -> Option<&'static str> {
        let section = self.active_section()?;
        self.sections.toggle(section.key);
        Some(section.key)
    }

    /// Put every section of the page in edit mode
    pub fn unlock_all(&mut self) {
        for section in self.page().sections {
            self.sections.unlock(section.key);
        }
    }

    /// Validate the focused field's section and lock it when it is clean.
    ///
    /// Returns the saved section key, or `None` when validation failed.
    pub fn save_active_section(&mut self) -> Option<&'static str> {
        let section = self.active_section()?;
        let result =
            validation::validate_section(self.page(), section.key, &self.values, &self.visibility);
        for name in section.field_names() {
            self.errors.clear_field(name);
        }
        if result.is_valid() {
            self.sections.lock(section.key);
            tracing::debug!(route = %self.route, section = section.key, "section saved");
            Some(section.key)
        } else {
            for (name, message) in result.iter() {
                self.errors.insert(name, message);
            }
            None
        }
    }

    /// Full validation on submit; errors replace the previous ones
    pub fn validate(&mut self) -> bool {
        self.errors = validation::validate(self.page(), &self.values, &self.visibility);
        let first_error = self
            .focus_ring()
            .into_iter()
            .find(|name| self.errors.error(name).is_some());
        if let Some(name) = first_error {
            tracing::debug!(route = %self.route, errors = self.errors.len(), "validation failed");
            self.focus(name);
        }
        self.errors.is_valid()
    }

    /// Whether the primary action is enabled
    pub fn can_advance(&self) -> bool {
        validation::can_advance(self.page(), &self.values)
    }
}

impl Form for PageForm {
    fn field_count(&self) -> usize {
        self.focus_ring().len()
    }

    fn active_field(&self) -> usize {
        self.active_field_index
    }

    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index;
    }
}
