//! Layout components (stepper sidebar, status bar)

use super::components::{render_step_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::wizard::{Route, StepId};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SIDEBAR_WIDTH: u16 = 28;

/// Create the main layout with the stepper sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH), // Stepper
            Constraint::Min(0),                // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Full-width layout for the account pages
pub fn create_layout_no_sidebar(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    chunks[0]
}

/// Draw the step list with each step's status
pub fn draw_stepper(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.state.wizard;
    let steps = wizard.steps();

    let mut constraints = vec![Constraint::Length(2)]; // Title
    constraints.extend(steps.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", app.translator.t("ui.sidebar.title")),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, chunks[0]);

    let current = app.state.current_step();
    for (idx, step) in steps.iter().enumerate() {
        render_step_button(
            frame,
            chunks[idx + 1],
            wizard.status(*step).symbol(),
            app.translator.t(step.label_key()),
            current == Some(*step),
            wizard.is_visited(*step),
        );
    }
}

/// Key hints for the current page
fn page_hints(route: Route) -> &'static str {
    match route {
        Route::Step(StepId::Review) => "ui.hint.review",
        Route::Step(_) => "ui.hint.form",
        _ => "ui.hint.auth",
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let line = match &app.state.status_message {
        Some(msg) => Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(
            format!(" {}", app.translator.t(page_hints(app.state.current_route()))),
            Style::default().fg(Color::Gray),
        )),
    };

    let status = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);
}
