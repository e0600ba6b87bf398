//! Form page layout
//!
//! +------------------------------------------+
//! | Page title                               |
//! |  [failure banner]                        |
//! |  Section title              [editing]    |
//! |  +-Field------------------------------+  |
//! |  +------------------------------------+  |
//! |  ...                    (scrolls)        |
//! |  [^B Back] [^S Save Section] [^N Next]   |
//! +------------------------------------------+

use super::field_renderer::{draw_field, FieldView, FIELD_HEIGHT};
use crate::app::App;
use crate::state::input_display;
use crate::ui::components::{render_action_button, BUTTON_HEIGHT};
use crate::wizard::{FieldDef, FieldKind, Route, SectionDef, Visibility};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HEADER_HEIGHT: u16 = 1;

/// One button of the action bar
pub struct Action<'a> {
    pub key_hint: &'a str,
    pub label: &'a str,
    pub is_primary: bool,
    pub is_enabled: bool,
}

/// Draw buttons left to right, the primary one last
pub fn draw_action_bar(frame: &mut Frame, area: Rect, actions: &[Action]) {
    let mut constraints: Vec<Constraint> = actions
        .iter()
        .map(|action| {
            let width = action.key_hint.chars().count() + action.label.chars().count() + 5;
            Constraint::Length(width as u16)
        })
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (action, chunk) in actions.iter().zip(chunks.iter()) {
        render_action_button(
            frame,
            *chunk,
            action.key_hint,
            action.label,
            action.is_primary,
            action.is_enabled,
        );
    }
}

/// Draw the failure banner with its retry hint
pub fn draw_banner(frame: &mut Frame, area: Rect, app: &App, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.translator.t("ui.banner.retry"),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Laid-out content of the scrolling body
enum BodyRow {
    Header(&'static SectionDef),
    Field(&'static FieldDef),
}

impl BodyRow {
    fn height(&self) -> u16 {
        match self {
            Self::Header(_) => HEADER_HEIGHT,
            Self::Field(_) => FIELD_HEIGHT,
        }
    }
}

/// Visible sections and fields in display order
fn body_rows(app: &App) -> Vec<BodyRow> {
    let form = &app.state.form;
    let visibility = form.visibility();
    let mut rows = Vec::new();
    for section in form.page().sections {
        let fields: Vec<&'static FieldDef> = section
            .fields
            .iter()
            .filter(|field| visibility.is_visible(field.name))
            .collect();
        if fields.is_empty() {
            continue;
        }
        rows.push(BodyRow::Header(section));
        rows.extend(fields.into_iter().map(BodyRow::Field));
    }
    rows
}

/// First row offset that keeps the focused field on screen
fn scroll_offset(rows: &[BodyRow], active: Option<&str>, height: u16) -> u16 {
    let mut y = 0u16;
    for row in rows {
        let bottom = y + row.height();
        if let BodyRow::Field(field) = row {
            if Some(field.name) == active {
                return bottom.saturating_sub(height);
            }
        }
        y = bottom;
    }
    0
}

fn section_tag<'a>(app: &'a App, section: &SectionDef) -> (&'a str, Color) {
    let form = &app.state.form;
    let group = form.visibility().group(section.field_names());
    if group == Visibility::Disabled {
        (app.translator.t("ui.section.disabled"), Color::DarkGray)
    } else if form.sections.is_editable(section.key) {
        (app.translator.t("ui.section.editing"), Color::Yellow)
    } else {
        (app.translator.t("ui.section.saved"), Color::Green)
    }
}

fn draw_section_header(frame: &mut Frame, area: Rect, app: &App, section: &SectionDef) {
    let mut spans = vec![Span::styled(
        app.translator.t(section.title_key),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    // Account pages have no saved mode
    if app.state.current_step().is_some() {
        let (tag, color) = section_tag(app, section);
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("[{tag}]"), Style::default().fg(color)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_body_field(frame: &mut Frame, area: Rect, app: &App, field: &FieldDef) {
    let form = &app.state.form;
    let translator = &app.translator;
    let value = input_display(field, &field.value_in(&form.values), translator);
    let is_disabled = !form.visibility().is_enabled(field.name);
    let label = match field.kind {
        FieldKind::Flag => "",
        _ => translator.t(field.label_key),
    };
    let view = FieldView {
        label,
        value: &value,
        placeholder: translator.t("ui.empty"),
        is_active: form.active_field_name() == Some(field.name),
        is_editable: !is_disabled && form.is_field_editable(field.name),
        is_disabled,
        error: form.errors.error(field.name).map(|key| translator.t(key)),
    };
    draw_field(frame, area, &view);
}

fn draw_body(frame: &mut Frame, area: Rect, app: &App) {
    let rows = body_rows(app);
    let offset = scroll_offset(&rows, app.state.form.active_field_name(), area.height);

    let mut y = 0u16;
    for row in &rows {
        let height = row.height();
        let top = y;
        y += height;
        if top < offset || y > offset + area.height {
            continue;
        }
        let row_area = Rect {
            x: area.x,
            y: area.y + (top - offset),
            width: area.width,
            height,
        };
        match row {
            BodyRow::Header(section) => draw_section_header(frame, row_area, app, section),
            BodyRow::Field(field) => draw_body_field(frame, row_area, app, field),
        }
    }
}

fn draw_actions(frame: &mut Frame, area: Rect, app: &App) {
    let t = |key: &'static str| app.translator.t(key);
    let route = app.state.current_route();
    let primary_label = if app.is_submitting() {
        t("ui.action.submitting")
    } else {
        t("ui.action.next")
    };

    let mut actions = vec![Action {
        key_hint: "^B",
        label: t("ui.action.back"),
        is_primary: false,
        is_enabled: app.can_go_back(),
    }];
    match route {
        Route::Register | Route::Login => {
            let label = if route == Route::Register {
                t("ui.action.login")
            } else {
                t("ui.action.register")
            };
            actions.push(Action {
                key_hint: "^L",
                label,
                is_primary: false,
                is_enabled: !app.is_submitting(),
            });
        }
        Route::CreatePassword => {}
        Route::Step(_) => {
            let form = &app.state.form;
            let section_editable = form
                .active_section()
                .is_some_and(|section| form.sections.is_editable(section.key));
            actions.push(Action {
                key_hint: "^S",
                label: t("ui.action.save"),
                is_primary: false,
                is_enabled: section_editable && !app.is_submitting(),
            });
        }
    }
    actions.push(Action {
        key_hint: "^N",
        label: primary_label,
        is_primary: true,
        is_enabled: app.primary_enabled(),
    });

    draw_action_bar(frame, area, &actions);
}

/// Page title, with the step's place in the wizard
pub fn page_heading(app: &App) -> String {
    let title = app.translator.t(app.state.form.page().title_key);
    match app.state.current_step() {
        Some(step) => format!(
            " {title} · {}/{} ",
            step.position() + 1,
            app.state.wizard.steps().len()
        ),
        None => format!(" {title} "),
    }
}

/// Draw the current form page
pub fn draw_page(frame: &mut Frame, area: Rect, app: &App) {
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
            Constraint::Length(BUTTON_HEIGHT),
        ])
        .horizontal_margin(1)
        .split(inner);

    if let Some(message) = &app.state.banner {
        draw_banner(frame, chunks[0], app, message);
    }
    draw_body(frame, chunks[1], app);
    draw_actions(frame, chunks[2], app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Translator;
    use crate::submit::MockStepSubmitter;
    use crate::wizard::{FieldValue, StepId};
    use std::sync::Arc;

    fn app_on(route: Route) -> App {
        let translator = Translator::embedded().unwrap();
        App::new(translator, Arc::new(MockStepSubmitter::new()), route)
    }

    /// App moved through the wizard onto `step`
    fn app_at(step: StepId) -> App {
        let mut app = app_on(Route::Step(StepId::AboutYou));
        let state = &mut app.state;
        state.wizard.advance(Some(step), &mut state.router).unwrap();
        state.sync_form();
        assert_eq!(app.state.current_route(), Route::Step(step));
        app
    }

    fn field_rows(app: &App) -> Vec<&'static str> {
        body_rows(app)
            .iter()
            .filter_map(|row| match row {
                BodyRow::Field(field) => Some(field.name),
                BodyRow::Header(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_heading_counts_steps() {
        assert_eq!(page_heading(&app_on(Route::Login)), " Log In ");
        assert_eq!(
            page_heading(&app_on(Route::Step(StepId::AboutYou))),
            " About You · 1/7 "
        );
    }

    #[test]
    fn test_hidden_fields_have_no_rows() {
        let mut app = app_at(StepId::TaxExemption);
        assert_eq!(page_heading(&app), " Tax Exemption · 6/7 ");
        assert_eq!(field_rows(&app), vec!["exemptionStatus"]);

        app.state.form.set_value(
            "exemptionStatus",
            FieldValue::Choice(Some("exempt".to_string())),
        );
        let rows = field_rows(&app);
        assert_eq!(rows.len(), 6);
        assert!(rows.contains(&"certificateFile"));
    }

    #[test]
    fn test_section_headers_follow_page() {
        let app = app_at(StepId::AutoPay);
        let headers: Vec<_> = body_rows(&app)
            .iter()
            .filter_map(|row| match row {
                BodyRow::Header(section) => Some(section.key),
                BodyRow::Field(_) => None,
            })
            .collect();
        assert_eq!(headers, vec!["enrollment", "payment"]);
    }

    #[test]
    fn test_scroll_keeps_focused_field_visible() {
        let mut app = app_on(Route::Step(StepId::AboutYou));
        let rows = body_rows(&app);
        assert_eq!(scroll_offset(&rows, app.state.form.active_field_name(), 10), 0);

        app.state.form.focus("billingZip");
        let offset = scroll_offset(&rows, app.state.form.active_field_name(), 10);
        assert!(offset > 0);
    }

    #[test]
    fn test_section_tag_tracks_edit_mode() {
        let mut app = app_at(StepId::AutoPay);
        let payment = app.state.form.page().section("payment").unwrap();
        assert_eq!(section_tag(&app, payment).0, "not applicable");

        app.state
            .form
            .set_value("autoPayEnrolled", FieldValue::Flag(true));
        assert_eq!(section_tag(&app, payment).0, "saved");

        app.state.form.sections.unlock("payment");
        assert_eq!(section_tag(&app, payment).0, "editing");
    }
}
