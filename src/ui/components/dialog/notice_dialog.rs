//! Completion notice dialog

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render the notice shown once the application is accepted
pub fn render_notice_dialog(frame: &mut Frame, title: &str, message: &str, hint: &str) {
    let hint = vec![Span::styled(
        hint,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    render_dialog(
        frame,
        DialogConfig {
            title,
            title_color: Color::Green,
            border_color: Color::Green,
            message,
            hint: Some(hint),
            max_width: 64,
        },
    );
}
