use std::sync::Arc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::api::MemoryBackend;
use crate::controller::dispatch::Inline;
use crate::controller::shell::Shell;
use crate::model::DEFAULT_BASE_URL;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole screen.
pub fn render_app(app: &App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

/// Run queued requests until nothing is left.
pub fn settle(app: &mut App) {
    while app.tick() {}
}

/// An app over an in-memory server seeded with `names`, started and settled.
pub fn app_with_projects(names: &[&str]) -> (App, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    for name in names {
        backend.seed_project(name);
    }
    let mut app = App::new(
        Shell::new(),
        Box::new(Inline::new(backend.clone())),
        Theme::default(),
        DEFAULT_BASE_URL.to_string(),
    );
    app.start();
    settle(&mut app);
    (app, backend)
}
