//! Panes the terminal host knows how to build and draw.

pub mod clock;
pub mod fallback;
pub mod files;
pub mod notes;

use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::pane::{ElementId, Pane};
use crate::tui::theme::Theme;

pub use clock::ClockPane;
pub use fallback::FallbackPane;
pub use files::FilesPane;
pub use notes::NotesPane;

/// What a pane did with a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
    /// The key moved focus to another element inside the pane
    FocusMoved(ElementId),
}

/// A pane that can draw itself into a terminal frame
pub trait TuiPane: Pane {
    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme);

    fn handle_key(&mut self, _key: KeyEvent) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    /// Periodic update from the event loop
    fn tick(&mut self) {}
}

/// The kinds of pane the host can open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    Notes,
    Clock,
    Files,
}

impl PaneKind {
    pub const ALL: [PaneKind; 3] = [PaneKind::Notes, PaneKind::Clock, PaneKind::Files];

    pub fn as_str(self) -> &'static str {
        match self {
            PaneKind::Notes => notes::KIND,
            PaneKind::Clock => clock::KIND,
            PaneKind::Files => files::KIND,
        }
    }

    pub fn parse(kind: &str) -> Option<PaneKind> {
        PaneKind::ALL.into_iter().find(|k| k.as_str() == kind)
    }
}

/// Everything the factory needs to build a pane
#[derive(Debug, Clone)]
pub struct PaneContext {
    /// Directory listed by new files panes
    pub files_root: PathBuf,
}

pub fn build(kind: PaneKind, ctx: &PaneContext) -> Box<dyn TuiPane> {
    match kind {
        PaneKind::Notes => Box::new(NotesPane::new()),
        PaneKind::Clock => Box::new(ClockPane::new()),
        PaneKind::Files => Box::new(FilesPane::new(ctx.files_root.clone())),
    }
}

/// Build a pane for a saved entry. Unknown kinds get nothing and the entry is skipped.
pub fn build_for_kind(kind: &str, ctx: &PaneContext) -> Option<Box<dyn TuiPane>> {
    PaneKind::parse(kind).map(|k| build(k, ctx))
}
