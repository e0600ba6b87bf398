//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows taken by one field box
pub const FIELD_HEIGHT: u16 = 3;

/// What a single field box shows
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub is_active: bool,
    /// Input accepted: section in edit mode and field enabled
    pub is_editable: bool,
    /// Shown read-only by a visibility rule
    pub is_disabled: bool,
    pub error: Option<&'a str>,
}

fn border_color(view: &FieldView) -> Color {
    if view.error.is_some() {
        Color::Red
    } else if view.is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}

/// Draw a bordered field with its label as title and any error at the bottom
pub fn draw_field(frame: &mut Frame, area: Rect, view: &FieldView) {
    let value_style = if view.is_disabled {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    } else if !view.is_editable {
        Style::default().fg(Color::Gray)
    } else if view.is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default()
    };

    let shown = if view.value.is_empty() && !view.is_active {
        view.placeholder
    } else {
        view.value
    };

    let mut spans = vec![Span::styled(shown, value_style)];
    if view.is_active && view.is_editable {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(view)));
    // Checkboxes carry their label inline
    if !view.label.is_empty() {
        block = block.title(format!(" {} ", view.label));
    }
    if let Some(error) = view.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(error: Option<&'a str>, is_active: bool) -> FieldView<'a> {
        FieldView {
            label: "Email",
            value: "",
            placeholder: "(empty)",
            is_active,
            is_editable: true,
            is_disabled: false,
            error,
        }
    }

    #[test]
    fn test_error_border_wins_over_focus() {
        assert_eq!(border_color(&view(Some("Required"), true)), Color::Red);
        assert_eq!(border_color(&view(None, true)), Color::Cyan);
        assert_eq!(border_color(&view(None, false)), Color::DarkGray);
    }
}
