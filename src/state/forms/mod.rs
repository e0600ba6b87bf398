//! Form domain layer
//!
//! Page-level form state driven by the wizard catalog, and the keyboard
//! edits applied to individual fields.

mod field;
mod form_state;

pub use field::{input_display, FieldEdit};
pub use form_state::{EditOutcome, Form, PageForm};
