use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use serde::{Deserialize, Serialize};

use crate::pane::{ContentRoot, Element, ElementId, FocusTarget, Pane, PaneError, VisualState};
use crate::tui::theme::Theme;
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

use super::{KeyOutcome, TuiPane};

pub const KIND: &str = "notes";

const TITLE: &str = "title";
const BODY: &str = "body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Body,
}

impl Field {
    fn id(self) -> &'static str {
        match self {
            Field::Title => TITLE,
            Field::Body => BODY,
        }
    }

    fn from_id(id: &ElementId) -> Option<Field> {
        match id.as_str() {
            TITLE => Some(Field::Title),
            BODY => Some(Field::Body),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedNotes {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

/// A scratch pad with a one-line title and a free-form body
pub struct NotesPane {
    title: String,
    body: String,
    /// Byte offsets of the edit cursor in each field
    title_cursor: usize,
    body_cursor: usize,
    field: Field,
    visual: VisualState,
    content: ContentRoot,
}

impl NotesPane {
    pub fn new() -> Self {
        NotesPane {
            title: String::new(),
            body: String::new(),
            title_cursor: 0,
            body_cursor: 0,
            field: Field::Title,
            visual: VisualState::Inactive,
            content: ContentRoot::new(vec![Element::focusable(TITLE), Element::focusable(BODY)]),
        }
    }

    pub fn title_text(&self) -> &str {
        &self.title
    }

    pub fn body_text(&self) -> &str {
        &self.body
    }

    pub fn focused_field(&self) -> ElementId {
        ElementId::new(self.field.id())
    }

    fn buffer_mut(&mut self) -> (&mut String, &mut usize) {
        match self.field {
            Field::Title => (&mut self.title, &mut self.title_cursor),
            Field::Body => (&mut self.body, &mut self.body_cursor),
        }
    }

    fn insert(&mut self, c: char) {
        let (text, cursor) = self.buffer_mut();
        text.insert(*cursor, c);
        *cursor += c.len_utf8();
    }

    fn backspace(&mut self) {
        let (text, cursor) = self.buffer_mut();
        if let Some(prev) = prev_grapheme_boundary(text, *cursor) {
            text.replace_range(prev..*cursor, "");
            *cursor = prev;
        }
    }

    fn step(&mut self, forward: bool) {
        let (text, cursor) = self.buffer_mut();
        let next = if forward {
            next_grapheme_boundary(text, *cursor)
        } else {
            prev_grapheme_boundary(text, *cursor)
        };
        if let Some(next) = next {
            *cursor = next;
        }
    }

    fn move_focus(&mut self, forward: bool) -> KeyOutcome {
        let current = self.focused_field();
        match self
            .content
            .cycle_focus(Some(&current), forward)
            .and_then(|id| Field::from_id(&id))
        {
            Some(field) => {
                self.field = field;
                KeyOutcome::FocusMoved(self.focused_field())
            }
            None => KeyOutcome::Ignored,
        }
    }

    fn field_line<'a>(
        &self,
        text: &'a str,
        cursor: usize,
        field: Field,
        style: Style,
        theme: &Theme,
    ) -> Vec<Span<'a>> {
        let editing = self.visual == VisualState::Active && self.field == field;
        if !editing {
            return vec![Span::styled(text, style)];
        }
        let (before, after) = text.split_at(cursor.min(text.len()));
        vec![
            Span::styled(before, style),
            Span::styled("\u{258C}", Style::default().fg(theme.border_active)),
            Span::styled(after, style),
        ]
    }
}

impl Default for NotesPane {
    fn default() -> Self {
        Self::new()
    }
}

impl Pane for NotesPane {
    fn kind(&self) -> &str {
        KIND
    }

    fn title(&self) -> String {
        if self.title.is_empty() {
            "notes".to_string()
        } else {
            format!("notes: {}", self.title)
        }
    }

    fn content(&self) -> &ContentRoot {
        &self.content
    }

    fn apply_visual_state(&mut self, state: VisualState) {
        self.visual = state;
    }

    fn focus_target(&mut self, target: &FocusTarget) {
        self.field = target
            .element()
            .and_then(Field::from_id)
            .unwrap_or(Field::Title);
    }

    fn save_state(&self) -> Option<serde_json::Value> {
        serde_json::to_value(SavedNotes {
            title: self.title.clone(),
            body: self.body.clone(),
        })
        .ok()
    }

    fn restore_state(&mut self, state: serde_json::Value) -> Result<(), PaneError> {
        let saved: SavedNotes = serde_json::from_value(state)?;
        self.title_cursor = saved.title.len();
        self.body_cursor = saved.body.len();
        self.title = saved.title;
        self.body = saved.body;
        Ok(())
    }
}

impl TuiPane for NotesPane {
    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let title_style = Style::default()
            .fg(theme.text_bright)
            .add_modifier(Modifier::BOLD);
        let body_style = Style::default().fg(theme.text);

        let mut lines = vec![
            Line::from(self.field_line(
                &self.title,
                self.title_cursor,
                Field::Title,
                title_style,
                theme,
            )),
            Line::from(Span::styled(
                "\u{2500}".repeat(area.width as usize),
                Style::default().fg(theme.dim),
            )),
        ];
        // Split the body around the cursor first so the marker lands on the right line
        let editing_body = self.visual == VisualState::Active && self.field == Field::Body;
        if editing_body {
            let marked = format!(
                "{}\u{258C}{}",
                &self.body[..self.body_cursor.min(self.body.len())],
                &self.body[self.body_cursor.min(self.body.len())..]
            );
            lines.extend(
                marked
                    .split('\n')
                    .map(|l| Line::from(Span::styled(l.to_string(), body_style))),
            );
        } else {
            lines.extend(
                self.body
                    .split('\n')
                    .map(|l| Line::from(Span::styled(l, body_style))),
            );
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return KeyOutcome::Ignored;
        }
        match key.code {
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            KeyCode::Enter if self.field == Field::Title => self.move_focus(true),
            KeyCode::Enter => {
                self.insert('\n');
                KeyOutcome::Consumed
            }
            KeyCode::Char(c) => {
                self.insert(c);
                KeyOutcome::Consumed
            }
            KeyCode::Backspace => {
                self.backspace();
                KeyOutcome::Consumed
            }
            KeyCode::Left => {
                self.step(false);
                KeyOutcome::Consumed
            }
            KeyCode::Right => {
                self.step(true);
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_helpers::{key, render_pane};

    fn type_str(pane: &mut NotesPane, s: &str) {
        for c in s.chars() {
            pane.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut pane = NotesPane::new();
        type_str(&mut pane, "todo");
        assert_eq!(
            pane.handle_key(key(KeyCode::Tab)),
            KeyOutcome::FocusMoved(ElementId::new(BODY))
        );
        type_str(&mut pane, "milk");
        pane.handle_key(key(KeyCode::Enter));
        type_str(&mut pane, "eggs");
        assert_eq!(pane.title_text(), "todo");
        assert_eq!(pane.body_text(), "milk\neggs");
        assert_eq!(pane.title(), "notes: todo");
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut pane = NotesPane::new();
        type_str(&mut pane, "cafe\u{301}");
        pane.handle_key(key(KeyCode::Backspace));
        assert_eq!(pane.title_text(), "caf");
    }

    #[test]
    fn cursor_moves_before_insert() {
        let mut pane = NotesPane::new();
        type_str(&mut pane, "ac");
        pane.handle_key(key(KeyCode::Left));
        type_str(&mut pane, "b");
        assert_eq!(pane.title_text(), "abc");
    }

    #[test]
    fn tab_wraps_around() {
        let mut pane = NotesPane::new();
        pane.handle_key(key(KeyCode::Tab));
        assert_eq!(
            pane.handle_key(key(KeyCode::Tab)),
            KeyOutcome::FocusMoved(ElementId::new(TITLE))
        );
        assert_eq!(
            pane.handle_key(key(KeyCode::BackTab)),
            KeyOutcome::FocusMoved(ElementId::new(BODY))
        );
    }

    #[test]
    fn focus_target_selects_field() {
        let mut pane = NotesPane::new();
        pane.focus_target(&FocusTarget::Element(ElementId::new(BODY)));
        assert_eq!(pane.focused_field(), ElementId::new(BODY));
        pane.focus_target(&FocusTarget::Root);
        assert_eq!(pane.focused_field(), ElementId::new(TITLE));
    }

    #[test]
    fn state_round_trip() {
        let mut pane = NotesPane::new();
        type_str(&mut pane, "plan");
        let saved = pane.save_state().unwrap();
        assert_eq!(saved, serde_json::json!({"title": "plan", "body": ""}));

        let mut restored = NotesPane::new();
        restored.restore_state(saved).unwrap();
        assert_eq!(restored.title_text(), "plan");
        // cursor sits at the end of restored text
        type_str(&mut restored, "!");
        assert_eq!(restored.title_text(), "plan!");
    }

    #[test]
    fn rejects_malformed_state() {
        let mut pane = NotesPane::new();
        let err = pane.restore_state(serde_json::json!({"title": 5})).unwrap_err();
        assert!(matches!(err, PaneError::InvalidState(_)));
    }

    #[test]
    fn renders_title_and_body() {
        let mut pane = NotesPane::new();
        pane.restore_state(serde_json::json!({"title": "plan", "body": "one\ntwo"}))
            .unwrap();
        let out = render_pane(&pane, 10, 5);
        insta::assert_snapshot!(out, @r"
        plan
        ──────────
        one
        two
        ");
    }
}
