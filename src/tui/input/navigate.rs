use crossterm::event::{KeyCode, KeyEvent};

use crate::controller::router::{PanelKind, Phase};
use crate::tui::app::App;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.switch_phase(Phase::ALL[index]);
        }
        KeyCode::Tab => app.cycle_focus(true),
        KeyCode::BackTab => app.cycle_focus(false),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Enter => app.activate_row(),
        KeyCode::Char('a') => {
            if focused_kind(app) == Some(PanelKind::Charter) {
                app.set_status("Press e to edit the charter");
            } else {
                app.open_form();
            }
        }
        KeyCode::Char('e') => {
            if focused_kind(app) == Some(PanelKind::Charter) {
                app.open_form();
            }
        }
        KeyCode::Char('r') => app.reload_focused(),
        KeyCode::Esc => app.status = None,
        _ => {}
    }
}

fn focused_kind(app: &App) -> Option<PanelKind> {
    app.focused_panel().map(|p| p.kind())
}
