//! Per-section edit/read-only mode of a page

use super::catalog::PageDef;
use std::collections::BTreeMap;

/// Tracks whether each section of one page is being edited or shown saved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionEditState {
    editable: BTreeMap<&'static str, bool>,
}

impl SectionEditState {
    /// Initial modes from the page's default, overridden per section
    pub fn for_page(page: &PageDef) -> Self {
        let editable = page
            .sections
            .iter()
            .map(|section| {
                (
                    section.key,
                    section.is_editable_by_default(page.default_editable),
                )
            })
            .collect();
        Self { editable }
    }

    /// Unknown sections are never editable
    pub fn is_editable(&self, section: &str) -> bool {
        self.editable.get(section).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, section: &str) {
        if let Some(editable) = self.editable.get_mut(section) {
            *editable = !*editable;
        }
    }

    /// Force read-only, after a successful save
    pub fn lock(&mut self, section: &str) {
        if let Some(editable) = self.editable.get_mut(section) {
            *editable = false;
        }
    }

    pub fn unlock(&mut self, section: &str) {
        if let Some(editable) = self.editable.get_mut(section) {
            *editable = true;
        }
    }

    pub fn lock_all(&mut self) {
        self.editable.values_mut().for_each(|editable| *editable = false);
    }
}
