//! Wizard engine
//!
//! Step sequencing, per-section edit modes, conditional visibility, local
//! validation and the review summary. Nothing here touches the terminal.

pub mod catalog;
mod controller;
mod error;
pub mod review;
mod sections;
mod step;
pub mod validation;
mod values;
pub mod visibility;

pub use catalog::{page_def, FieldDef, FieldKind, PageDef, SectionDef};
pub use controller::{Navigator, WizardController};
pub use error::WizardError;
pub use review::ReviewSection;
pub use sections::SectionEditState;
pub use step::{Route, StepId};
pub use validation::ValidationResult;
pub use values::{AggregateApplication, FieldValue, FormValues};
pub use visibility::{Visibility, VisibilitySet};
