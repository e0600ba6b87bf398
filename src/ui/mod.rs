//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod review;

use crate::app::App;
use crate::wizard::{Route, StepId};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let route = app.state.current_route();

    // The stepper only exists once the wizard is entered
    let main_area = if route.is_unauthenticated() {
        layout::create_layout_no_sidebar(area)
    } else {
        let (sidebar_area, main_area) = layout::create_layout(area);
        layout::draw_stepper(frame, sidebar_area, app);
        main_area
    };

    match route {
        Route::Step(StepId::Review) => review::draw(frame, main_area, app),
        _ => forms::draw_page(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    if let Some(notice) = &app.state.notice {
        let message = format!("{} {}", app.translator.t("ui.notice.body"), notice.reference);
        components::render_notice_dialog(
            frame,
            app.translator.t(notice.title_key),
            &message,
            app.translator.t("ui.hint.dismiss"),
        );
    }
}
