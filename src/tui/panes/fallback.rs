use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use crate::pane::Pane;
use crate::tui::theme::Theme;

use super::TuiPane;

pub const KIND: &str = "fallback";

/// Stands in for a pane that failed to open
pub struct FallbackPane {
    failed_kind: String,
    message: String,
}

impl FallbackPane {
    pub fn new(failed_kind: impl Into<String>, message: impl Into<String>) -> Self {
        FallbackPane {
            failed_kind: failed_kind.into(),
            message: message.into(),
        }
    }
}

impl Pane for FallbackPane {
    fn kind(&self) -> &str {
        KIND
    }

    fn title(&self) -> String {
        format!("{} (failed)", self.failed_kind)
    }
}

impl TuiPane for FallbackPane {
    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let lines = vec![
            Line::styled(
                format!("{} could not be opened", self.failed_kind),
                Style::default().fg(theme.error),
            ),
            Line::styled(self.message.as_str(), Style::default().fg(theme.dim)),
            Line::default(),
            Line::styled("Ctrl+x closes this pane", Style::default().fg(theme.dim)),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }
}
