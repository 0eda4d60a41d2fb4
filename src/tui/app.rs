use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::focus::FocusHistoryManager;
use crate::io::state_io::{self, StateError};
use crate::io::{self as ws, config_io, logging};
use crate::layout::TilingLayoutEngine;
use crate::manager::{ManagerError, PaneEvent, PaneManager, RestoreReport, drain};
use crate::model::{Axis, PaneManagerState, TileworkConfig};

use super::input::{self, Action};
use super::panes::{self, FallbackPane, KeyOutcome, PaneContext, PaneKind, TuiPane};
use super::render;
use super::theme::Theme;

/// A divider being dragged with the mouse
#[derive(Debug, Clone, Copy)]
struct MouseDrag {
    axis: Axis,
    /// Last pointer coordinate along the drag axis
    last: u16,
}

/// Main application state
pub struct App {
    pub manager: PaneManager<dyn TuiPane>,
    pub config: TileworkConfig,
    pub theme: Theme,
    /// The `.tilework/` directory
    pub workspace: PathBuf,
    pub ctx: PaneContext,
    events: mpsc::Receiver<PaneEvent>,
    /// One-line message for the status row, cleared on the next key press
    pub status: Option<String>,
    pub should_quit: bool,
    drag: Option<MouseDrag>,
}

impl App {
    pub fn new(config: TileworkConfig, workspace: PathBuf) -> Self {
        let engine = TilingLayoutEngine::new(config.layout.mode, config.layout.size_constraint());
        let mut manager: PaneManager<dyn TuiPane> =
            PaneManager::new(engine, FocusHistoryManager::new());
        let events = manager.subscribe();

        let root = workspace
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let files_root = match &config.ui.files_root {
            Some(dir) => root.join(dir),
            None => root,
        };

        App {
            manager,
            theme: Theme::from_config(&config.ui),
            config,
            workspace,
            ctx: PaneContext { files_root },
            events,
            status: None,
            should_quit: false,
            drag: None,
        }
    }

    /// Open a new pane of `kind`. A pane that fails to open is replaced by a
    /// fallback pane describing the failure.
    pub fn open(&mut self, kind: PaneKind) {
        let pane = panes::build(kind, &self.ctx);
        if let Err(err) = self.manager.open_pane(pane) {
            let message = match &err {
                ManagerError::InitializeFailed { source, .. } => source.to_string(),
                other => other.to_string(),
            };
            let _ = self
                .manager
                .open_pane(Box::new(FallbackPane::new(kind.as_str(), message)));
        }
        self.drain_events();
    }

    /// Rebuild the panes described by a saved snapshot
    pub fn restore(&mut self, state: &PaneManagerState) -> RestoreReport {
        let supplied: Vec<Box<dyn TuiPane>> = state
            .panes
            .iter()
            .filter_map(|saved| panes::build_for_kind(&saved.kind, &self.ctx))
            .collect();
        let report = self.manager.restore_state(state, supplied);

        // Saved panes that fail to initialize still get a region, behind the restored focus
        let focused = self.manager.focused();
        let failures: Vec<(String, String)> = drain(&self.events)
            .into_iter()
            .filter_map(|event| match event {
                PaneEvent::PaneFailed { kind, error } => Some((kind, error)),
                _ => None,
            })
            .collect();
        for (kind, error) in failures {
            let _ = self
                .manager
                .open_pane(Box::new(FallbackPane::new(kind, error)));
        }
        if let Some(id) = focused {
            let _ = self.manager.focus_pane(id);
        }
        self.drain_events();

        if report.skipped > 0 {
            self.status = Some(format!(
                "restored {} panes, {} could not be restored",
                report.restored, report.skipped
            ));
        }
        report
    }

    /// Write the pane layout when autosave is on
    pub fn save(&self) -> Result<(), StateError> {
        if !self.config.state.autosave {
            return Ok(());
        }
        state_io::write_state(&self.workspace, &self.manager.get_state())
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Navigate(direction) => {
                self.manager.navigate_focus(direction);
            }
            Action::MovePane(direction) => {
                self.manager.move_pane(direction);
            }
            Action::Open(kind) => self.open(kind),
            Action::CloseFocused => {
                if let Some(outcome) = self.manager.close_focused_pane()
                    && let Some(error) = outcome.dispose_error
                {
                    self.status = Some(format!("{} closed with an error: {}", outcome.kind, error));
                }
            }
            Action::CycleMode => {
                let mode = self.manager.mode().cycle();
                self.manager.set_mode(mode);
                self.status = Some(format!("mode: {mode}"));
            }
            Action::Resize(axis, sign) => {
                let step = i32::from(self.config.layout.resize_step.max(1));
                match self.manager.resize_focused(axis, sign * step) {
                    Ok(Some(_)) => {}
                    Ok(None) => self.status = Some("nothing to resize".into()),
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            Action::ResetSizes => self.manager.reset_sizes(),
            Action::FocusNext => {
                self.manager.focus_next();
            }
            Action::Quit => self.should_quit = true,
        }
        self.drain_events();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
        if matches!(key.code, KeyCode::Modifier(_)) {
            return;
        }
        self.status = None;

        if let Some(action) = input::map_key(key) {
            self.apply(action);
            return;
        }
        let Some(id) = self.manager.focused() else {
            return;
        };
        let outcome = match self.manager.pane_mut(id) {
            Some(pane) => pane.handle_key(key),
            None => return,
        };
        if let KeyOutcome::FocusMoved(element) = outcome {
            self.manager.element_focused(id, element);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        let along = |axis: Axis| match axis {
            Axis::Columns => x,
            Axis::Rows => y,
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(divider) = self.manager.begin_resize_at(x, y) {
                    self.drag = Some(MouseDrag {
                        axis: divider.axis,
                        last: along(divider.axis),
                    });
                    return;
                }
                let hit = self
                    .manager
                    .snapshot()
                    .placements
                    .iter()
                    .find(|p| p.rect.contains(ratatui::layout::Position { x, y }))
                    .map(|p| p.pane);
                if let Some(id) = hit {
                    let _ = self.manager.focus_pane(id);
                    self.drain_events();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = &mut self.drag {
                    let now = along(drag.axis);
                    let delta = i32::from(now) - i32::from(drag.last);
                    drag.last = now;
                    self.manager.drag_resize(delta);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag.take().is_some() {
                    self.manager.complete_resize();
                }
            }
            _ => {}
        }
    }

    /// Periodic work: let panes refresh, then pick up manager notifications
    pub fn tick(&mut self) {
        for id in self.manager.layout_order().to_vec() {
            if let Some(pane) = self.manager.pane_mut(id) {
                pane.tick();
            }
        }
        self.drain_events();
    }

    fn drain_events(&mut self) {
        for event in drain(&self.events) {
            match event {
                PaneEvent::NavigationMiss(direction) => {
                    self.status = Some(format!("no pane {direction}"));
                }
                PaneEvent::PaneFailed { kind, error } => {
                    self.status = Some(format!("{kind} failed to open: {error}"));
                }
                PaneEvent::Opened(_) | PaneEvent::Closed(_) | PaneEvent::FocusChanged { .. } => {}
            }
        }
    }
}

/// Run the TUI application
pub fn run(project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match project_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let workspace = ws::require_workspace(&start)?;
    logging::init(&workspace)?;
    let config = config_io::load_config(&workspace)?;

    let mut app = App::new(config, workspace);
    if let Some(state) = state_io::read_state(&app.workspace) {
        app.restore(&state);
    }
    tracing::info!(workspace = %app.workspace.display(), panes = app.manager.len(), "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Pane hooks run behind catch_unwind; their panics belong in the log, not on screen
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "panic");
    }));

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        run_event_loop(&mut terminal, &mut app)
    }));

    // Restore terminal
    panic::set_hook(original_hook);
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(result) => {
            if let Err(e) = app.save() {
                tracing::error!(error = %e, "could not save pane state");
                eprintln!("warning: {e}");
            }
            app.manager.close_all();
            result
        }
        Err(payload) => {
            eprintln!(
                "tilework crashed; details in {}",
                app.workspace.join(ws::LOG_FILE).display()
            );
            panic::resume_unwind(payload)
        }
    }
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
        app.tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, SavedPane, TilingMode};
    use crate::tui::test_helpers::{ctrl, key, test_app as app};
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    #[test]
    fn open_and_close_with_keys() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        app.handle_key(ctrl('n'));
        app.handle_key(ctrl('t'));
        assert_eq!(app.manager.len(), 2);
        app.handle_key(ctrl('x'));
        assert_eq!(app.manager.len(), 1);
        let focused = app.manager.focused().unwrap();
        assert_eq!(app.manager.pane(focused).unwrap().kind(), "notes");
    }

    #[test]
    fn failed_pane_is_replaced_by_fallback() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        app.ctx.files_root = tmp.path().join("missing");
        app.open(PaneKind::Files);
        assert_eq!(app.manager.len(), 1);
        let id = app.manager.focused().unwrap();
        assert_eq!(app.manager.pane(id).unwrap().kind(), panes::fallback::KIND);
        assert!(app.status.as_deref().unwrap().starts_with("files failed to open"));
    }

    #[test]
    fn navigation_miss_sets_status() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        app.open(PaneKind::Notes);
        app.apply(Action::Navigate(Direction::Left));
        assert_eq!(app.status.as_deref(), Some("no pane left"));
    }

    #[test]
    fn typing_reaches_focused_pane_and_records_element() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        app.open(PaneKind::Notes);
        let id = app.manager.focused().unwrap();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(
            app.manager.history().last_focused(id).map(|e| e.as_str()),
            Some("body")
        );
    }

    #[test]
    fn cycle_mode_reports_status() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        app.handle_key(ctrl('l'));
        assert_eq!(app.manager.mode(), TilingMode::Grid);
        assert_eq!(app.status.as_deref(), Some("mode: grid"));
    }

    #[test]
    fn save_and_restore_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        std::fs::create_dir_all(&app.workspace).unwrap();
        app.open(PaneKind::Notes);
        app.open(PaneKind::Clock);
        app.save().unwrap();

        let state = state_io::read_state(&app.workspace).unwrap();
        let mut fresh = App::new(TileworkConfig::default(), app.workspace.clone());
        let report = fresh.restore(&state);
        assert_eq!(report.restored, 2);
        let kinds: Vec<String> = fresh
            .manager
            .layout_order()
            .iter()
            .map(|&id| fresh.manager.pane(id).unwrap().kind().to_string())
            .collect();
        assert_eq!(kinds, vec!["notes", "clock"]);
    }

    #[test]
    fn failed_restore_shows_fallback() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        let state = PaneManagerState {
            panes: vec![
                SavedPane {
                    kind: "notes".into(),
                    state: serde_json::Value::Null,
                },
                SavedPane {
                    kind: "files".into(),
                    state: serde_json::json!({ "root": tmp.path().join("missing") }),
                },
            ],
            focused: Some(0),
            ..PaneManagerState::default()
        };
        let report = app.restore(&state);
        assert_eq!((report.restored, report.skipped), (1, 1));
        let kinds: Vec<&str> = app
            .manager
            .layout_order()
            .iter()
            .map(|&id| app.manager.pane(id).unwrap().kind())
            .collect();
        assert_eq!(kinds, vec!["notes", panes::fallback::KIND]);
        let focused = app.manager.focused().unwrap();
        assert_eq!(app.manager.pane(focused).unwrap().kind(), "notes");
    }

    #[test]
    fn autosave_off_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        app.config.state.autosave = false;
        app.open(PaneKind::Notes);
        app.save().unwrap();
        assert!(!state_io::state_path(&app.workspace).exists());
    }

    #[test]
    fn mouse_drag_moves_divider() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        app.open(PaneKind::Notes);
        app.open(PaneKind::Notes);
        let divider = app.manager.snapshot().dividers[0];
        let mouse = |kind, column| MouseEvent {
            kind,
            column,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        let x = divider.rect.x;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x + 5));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x + 10));
        // nothing committed while dragging
        assert_eq!(app.manager.snapshot().column_sizes, vec![60, 60]);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x + 10));
        assert_eq!(app.manager.snapshot().column_sizes, vec![70, 50]);
    }
}
