//! Review page: committed steps, the consent checkbox and final submit

use super::forms::{draw_action_bar, draw_banner, draw_field, page_heading, Action, FieldView};
use crate::app::App;
use crate::state::input_display;
use crate::wizard::ReviewSection;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CONSENT_FIELD: &str = "finalConsent";

/// Summary lines and the line range of the selected section
fn summary_lines<'a>(
    sections: &'a [ReviewSection],
    cursor: usize,
    edit_hint: &'a str,
) -> (Vec<Line<'a>>, (u16, u16)) {
    let mut lines = Vec::new();
    let mut selected = (0, 0);

    for (idx, section) in sections.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        let start = lines.len() as u16;
        if idx == cursor {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("▶ {}", section.title),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("   {edit_hint}"), Style::default().fg(Color::DarkGray)),
            ]));
        } else {
            lines.push(Line::from(Span::styled(
                format!("  {}", section.title),
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        for row in &section.rows {
            lines.push(Line::from(vec![
                Span::styled(format!("    {}: ", row.label), Style::default().fg(Color::Gray)),
                Span::raw(row.value.as_str()),
            ]));
        }
        if idx == cursor {
            selected = (start, lines.len() as u16);
        }
    }
    (lines, selected)
}

/// Scroll so the selected section fits, preferring its title
fn scroll_for(selected: (u16, u16), height: u16) -> u16 {
    let (start, end) = selected;
    end.saturating_sub(height).min(start)
}

fn draw_summary(frame: &mut Frame, area: Rect, app: &App) {
    let sections = app.review_summary();
    if sections.is_empty() {
        let empty = Paragraph::new(app.translator.t("ui.review.empty"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let (lines, selected) = summary_lines(
        &sections,
        app.state.review_cursor,
        app.translator.t("ui.review.edit"),
    );
    let paragraph = Paragraph::new(lines).scroll((scroll_for(selected, area.height), 0));
    frame.render_widget(paragraph, area);
}

fn draw_consent(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let Some(field) = form.page().field(CONSENT_FIELD) else {
        return;
    };
    let value = input_display(field, &field.value_in(&form.values), &app.translator);
    let view = FieldView {
        label: "",
        value: &value,
        placeholder: "",
        is_active: true,
        is_editable: !app.is_submitting(),
        is_disabled: false,
        error: None,
    };
    draw_field(frame, area, &view);
}

fn draw_actions(frame: &mut Frame, area: Rect, app: &App) {
    let t = |key: &'static str| app.translator.t(key);
    let primary_label = if app.is_submitting() {
        t("ui.action.submitting")
    } else {
        t("ui.action.submit")
    };
    let actions = [
        Action {
            key_hint: "^B",
            label: t("ui.action.back"),
            is_primary: false,
            is_enabled: app.can_go_back(),
        },
        Action {
            key_hint: "Enter",
            label: primary_label,
            is_primary: true,
            is_enabled: app.primary_enabled(),
        },
    ];
    draw_action_bar(frame, area, &actions);
}

/// Draw the review page
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(page_heading(app))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner_height = if app.state.banner.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(3), // Consent
            Constraint::Length(3), // Actions
        ])
        .horizontal_margin(1)
        .split(inner);

    if let Some(message) = &app.state.banner {
        draw_banner(frame, chunks[0], app, message);
    }
    draw_summary(frame, chunks[1], app);
    draw_consent(frame, chunks[2], app);
    draw_actions(frame, chunks[3], app);
}
