//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a generic button with border
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    content: &str,
    is_selected: bool,
    is_enabled: bool,
) {
    let border_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text_style = if !is_enabled {
        Style::default().fg(Color::DarkGray)
    } else if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(format!(" {content} ")).style(text_style);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(paragraph.block(block), area);
}

/// Render a stepper entry: status symbol and step label
pub fn render_step_button(
    frame: &mut Frame,
    area: Rect,
    symbol: &str,
    label: &str,
    is_current: bool,
    is_reachable: bool,
) {
    let content = format!("{symbol} {label}");
    render_button(frame, area, &content, is_current, is_reachable);
}

/// Render an action bar button; the primary one is highlighted while enabled
pub fn render_action_button(
    frame: &mut Frame,
    area: Rect,
    key_hint: &str,
    label: &str,
    is_primary: bool,
    is_enabled: bool,
) {
    let content = format!("{key_hint} {label}");
    render_button(frame, area, &content, is_primary && is_enabled, is_enabled);
}
