use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use serde::{Deserialize, Serialize};

use crate::pane::{Pane, PaneError, VisualState};
use crate::tui::theme::Theme;

use super::{KeyOutcome, TuiPane};

pub const KIND: &str = "clock";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedClock {
    #[serde(default)]
    utc: bool,
}

/// Wall clock, refreshed on every tick. `u` toggles between local time and UTC.
pub struct ClockPane {
    now: DateTime<Utc>,
    utc: bool,
    visual: VisualState,
}

impl ClockPane {
    pub fn new() -> Self {
        ClockPane {
            now: Utc::now(),
            utc: false,
            visual: VisualState::Inactive,
        }
    }

    /// Pin the displayed time
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn is_utc(&self) -> bool {
        self.utc
    }

    fn lines(&self) -> (String, String) {
        if self.utc {
            (
                self.now.format("%H:%M:%S").to_string(),
                self.now.format("%a %Y-%m-%d UTC").to_string(),
            )
        } else {
            let local = self.now.with_timezone(&Local);
            (
                local.format("%H:%M:%S").to_string(),
                local.format("%a %Y-%m-%d").to_string(),
            )
        }
    }
}

impl Default for ClockPane {
    fn default() -> Self {
        Self::new()
    }
}

impl Pane for ClockPane {
    fn kind(&self) -> &str {
        KIND
    }

    fn title(&self) -> String {
        if self.utc { "clock (utc)" } else { "clock" }.to_string()
    }

    fn initialize(&mut self) -> Result<(), PaneError> {
        self.now = Utc::now();
        Ok(())
    }

    fn apply_visual_state(&mut self, state: VisualState) {
        self.visual = state;
    }

    fn save_state(&self) -> Option<serde_json::Value> {
        serde_json::to_value(SavedClock { utc: self.utc }).ok()
    }

    fn restore_state(&mut self, state: serde_json::Value) -> Result<(), PaneError> {
        let saved: SavedClock = serde_json::from_value(state)?;
        self.utc = saved.utc;
        Ok(())
    }
}

impl TuiPane for ClockPane {
    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (time, date) = self.lines();
        let time_color = match self.visual {
            VisualState::Active => theme.accent,
            VisualState::Inactive => theme.text,
        };
        let top = area.height.saturating_sub(2) / 2;
        let mut lines: Vec<Line> = (0..top).map(|_| Line::default()).collect();
        lines.push(Line::styled(
            time,
            Style::default().fg(time_color).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(date, Style::default().fg(theme.dim)));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char('u') if key.modifiers == KeyModifiers::NONE => {
                self.utc = !self.utc;
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn tick(&mut self) {
        self.now = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_helpers::{key, render_pane};
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 30, 5).unwrap()
    }

    #[test]
    fn toggles_utc() {
        let mut pane = ClockPane::new();
        assert_eq!(
            pane.handle_key(key(KeyCode::Char('u'))),
            KeyOutcome::Consumed
        );
        assert!(pane.is_utc());
        assert_eq!(pane.title(), "clock (utc)");
        assert_eq!(
            pane.handle_key(key(KeyCode::Char('x'))),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn state_round_trip() {
        let mut pane = ClockPane::new();
        pane.restore_state(serde_json::json!({"utc": true})).unwrap();
        assert_eq!(pane.save_state(), Some(serde_json::json!({"utc": true})));
        // missing fields fall back to local time
        pane.restore_state(serde_json::json!({})).unwrap();
        assert!(!pane.is_utc());
    }

    #[test]
    fn renders_centered_time() {
        let mut pane = ClockPane::new().at(noon());
        pane.restore_state(serde_json::json!({"utc": true})).unwrap();
        let out = render_pane(&pane, 24, 2);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "        12:30:05");
        assert_eq!(lines[1].trim(), "Fri 2025-03-14 UTC");
    }
}
