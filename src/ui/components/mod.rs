//! Reusable UI components

mod button;
mod dialog;

pub use button::{render_action_button, render_step_button, BUTTON_HEIGHT};
pub use dialog::render_notice_dialog;
