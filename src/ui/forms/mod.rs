//! Form rendering module
//!
//! - `field_renderer`: a single bordered field box
//! - `page_form`: account pages and wizard steps, with the action bar

mod field_renderer;
mod page_form;

pub use field_renderer::{draw_field, FieldView};
pub use page_form::{draw_action_bar, draw_banner, draw_page, page_heading, Action};
