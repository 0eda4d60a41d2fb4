use std::fs;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde::{Deserialize, Serialize};

use crate::io::watcher::DirWatcher;
use crate::pane::{ContentRoot, Element, ElementId, FocusTarget, Pane, PaneError, VisualState};
use crate::tui::theme::Theme;
use crate::util::unicode::truncate_to_width;

use super::{KeyOutcome, TuiPane};

pub const KIND: &str = "files";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    is_dir: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedFiles {
    root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected: Option<String>,
}

/// Live listing of one directory. The watch is held from `initialize` until `dispose`.
pub struct FilesPane {
    root: PathBuf,
    entries: Vec<Entry>,
    selected: usize,
    /// Entry to select once the listing is loaded
    wanted: Option<String>,
    content: ContentRoot,
    watcher: Option<DirWatcher>,
    visual: VisualState,
}

impl FilesPane {
    pub fn new(root: PathBuf) -> Self {
        FilesPane {
            root,
            entries: Vec::new(),
            selected: 0,
            wanted: None,
            content: ContentRoot::default(),
            watcher: None,
            visual: VisualState::Inactive,
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.entries.get(self.selected).map(|e| e.name.as_str())
    }

    fn reload(&mut self) -> Result<(), PaneError> {
        let keep = self.wanted.take().or_else(|| self.selected_name().map(str::to_string));

        let mut entries = Vec::new();
        for item in fs::read_dir(&self.root)? {
            let item = item?;
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let is_dir = item.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(Entry { name, is_dir });
        }
        // Directories first, then by name
        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

        self.content = ContentRoot::new(
            entries
                .iter()
                .map(|e| Element::focusable(e.name.clone()))
                .collect(),
        );
        self.entries = entries;
        self.selected = keep
            .and_then(|name| self.entries.iter().position(|e| e.name == name))
            .unwrap_or(0);
        Ok(())
    }

    fn select(&mut self, index: usize) -> KeyOutcome {
        if index >= self.entries.len() || index == self.selected {
            return KeyOutcome::Consumed;
        }
        self.selected = index;
        KeyOutcome::FocusMoved(ElementId::new(self.entries[index].name.clone()))
    }
}

impl Pane for FilesPane {
    fn kind(&self) -> &str {
        KIND
    }

    fn title(&self) -> String {
        format!("files: {}", self.root.display())
    }

    fn content(&self) -> &ContentRoot {
        &self.content
    }

    fn initialize(&mut self) -> Result<(), PaneError> {
        if !self.root.is_dir() {
            return Err(PaneError::failed(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        self.reload()?;
        match DirWatcher::start(&self.root) {
            Ok(watcher) => self.watcher = Some(watcher),
            // The listing still works, it just goes stale
            Err(e) => tracing::warn!(root = %self.root.display(), error = %e, "could not watch directory"),
        }
        Ok(())
    }

    fn dispose(&mut self) -> Result<(), PaneError> {
        if self.watcher.take().is_some() {
            tracing::debug!(root = %self.root.display(), "stopped watching");
        }
        Ok(())
    }

    fn apply_visual_state(&mut self, state: VisualState) {
        self.visual = state;
    }

    fn focus_target(&mut self, target: &FocusTarget) {
        if let Some(id) = target.element()
            && let Some(index) = self.entries.iter().position(|e| e.name == id.as_str())
        {
            self.selected = index;
        }
    }

    fn save_state(&self) -> Option<serde_json::Value> {
        serde_json::to_value(SavedFiles {
            root: self.root.clone(),
            selected: self.selected_name().map(str::to_string),
        })
        .ok()
    }

    fn restore_state(&mut self, state: serde_json::Value) -> Result<(), PaneError> {
        let saved: SavedFiles = serde_json::from_value(state)?;
        self.root = saved.root;
        self.wanted = saved.selected;
        Ok(())
    }
}

impl TuiPane for FilesPane {
    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let height = area.height as usize;
        let width = area.width as usize;
        // Keep the selection on screen
        let offset = (self.selected + 1).saturating_sub(height);
        let active = self.visual == VisualState::Active;

        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, entry)| {
                let label = if entry.is_dir {
                    format!("{}/", entry.name)
                } else {
                    entry.name.clone()
                };
                let mut style = Style::default().fg(if entry.is_dir { theme.accent } else { theme.text });
                if i == self.selected && active {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(truncate_to_width(&label, width), style))
            })
            .collect();

        if lines.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("(empty)", Style::default().fg(theme.dim))),
                area,
            );
        } else {
            frame.render_widget(Paragraph::new(lines), area);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return KeyOutcome::Ignored;
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.select(self.selected + 1),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.select(self.selected.saturating_sub(1))
            }
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(self.entries.len().saturating_sub(1)),
            _ => KeyOutcome::Ignored,
        }
    }

    fn tick(&mut self) {
        let changed = self
            .watcher
            .as_ref()
            .is_some_and(|w| !w.poll().is_empty());
        if changed && let Err(e) = self.reload() {
            tracing::warn!(root = %self.root.display(), error = %e, "could not refresh listing");
        }
    }
}
