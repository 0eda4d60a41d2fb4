use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::WORKSPACE_DIR;
use crate::model::TileworkConfig;

use super::app::App;
use super::panes::TuiPane;
use super::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
/// Trailing spaces and trailing blank rows are dropped.
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer();
    let rows: Vec<String> = buf
        .content
        .chunks(buf.area.width as usize)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    let end = rows.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);
    rows[..end].join("\n")
}

/// Render one pane on its own with the default theme
pub fn render_pane(pane: &dyn TuiPane, w: u16, h: u16) -> String {
    let theme = Theme::default();
    render_to_string(w, h, |frame, area| pane.render(frame, area, &theme))
}

/// An app with default config whose workspace lives under `tmp`, laid out on 120x40
pub fn test_app(tmp: &TempDir) -> App {
    let mut app = App::new(TileworkConfig::default(), tmp.path().join(WORKSPACE_DIR));
    app.manager.set_area(Rect::new(0, 0, 120, 40));
    app
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}
