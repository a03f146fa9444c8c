pub mod form_popup;
pub mod help_overlay;
pub mod helpers;
pub mod panels;
pub mod project_list;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::tui::app::App;

const PROJECT_COLUMN_WIDTH: u16 = 28;

/// Main render function: tab bar, project column beside the phase panels,
/// status row, then overlays
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // body
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(PROJECT_COLUMN_WIDTH), Constraint::Min(1)])
        .split(chunks[1]);
    project_list::render_project_list(frame, app, body[0]);
    panels::render_panels(frame, app, body[1]);

    status_row::render_status_row(frame, app, chunks[2]);

    if app.form.is_some() {
        form_popup::render_form_popup(frame, app, area);
    }
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}
