use std::sync::Arc;
use std::sync::mpsc;

use indexmap::IndexMap;
use ratatui::layout::Rect;

use crate::focus::FocusHistoryManager;
use crate::layout::{
    Divider, LayoutError, LayoutSnapshot, PlacementHint, ResizeOutcome, TilingLayoutEngine,
};
use crate::model::{Axis, Direction, PaneId, PaneManagerState, SavedPane, TilingMode};
use crate::pane::{ElementId, Hook, Pane, PaneError, VisualState, guard, guard_call};

use super::events::{EventBus, PaneEvent};

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("could not open {kind} pane: {source}")]
    InitializeFailed { kind: String, source: PaneError },
    #[error("no open pane {0}")]
    UnknownPane(PaneId),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Result of a directional command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateOutcome {
    Moved { from: PaneId, to: PaneId },
    NoPaneInDirection,
    NoFocusedPane,
}

impl NavigateOutcome {
    pub fn is_miss(&self) -> bool {
        !matches!(self, NavigateOutcome::Moved { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOutcome {
    pub pane: PaneId,
    pub kind: String,
    /// Set when the pane's dispose hook failed. The pane is closed regardless.
    pub dispose_error: Option<PaneError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: usize,
    /// Saved entries with no matching pane, or whose pane failed to initialize
    pub skipped: usize,
    /// Supplied panes no saved entry asked for
    pub unused: usize,
}

struct PaneSlot<P: ?Sized> {
    pane: Box<P>,
    active: bool,
}

/// Owns the open panes and drives their lifecycle.
///
/// Geometry questions go to the [`TilingLayoutEngine`], sub-element focus to the
/// [`FocusHistoryManager`]; both are handed in by the host at construction.
pub struct PaneManager<P: Pane + ?Sized = dyn Pane> {
    /// Open panes, in the order they were opened
    panes: IndexMap<PaneId, PaneSlot<P>>,
    engine: TilingLayoutEngine,
    history: FocusHistoryManager,
    focused: Option<PaneId>,
    next_id: u64,
    events: EventBus,
}

impl<P: Pane + ?Sized> PaneManager<P> {
    pub fn new(engine: TilingLayoutEngine, history: FocusHistoryManager) -> Self {
        PaneManager {
            panes: IndexMap::new(),
            engine,
            history,
            focused: None,
            next_id: 1,
            events: EventBus::default(),
        }
    }

    // -- Accessors --

    pub fn engine(&self) -> &TilingLayoutEngine {
        &self.engine
    }

    pub fn history(&self) -> &FocusHistoryManager {
        &self.history
    }

    pub fn snapshot(&self) -> Arc<LayoutSnapshot> {
        self.engine.snapshot()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<PaneEvent> {
        self.events.subscribe()
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.panes.contains_key(&id)
    }

    pub fn focused(&self) -> Option<PaneId> {
        self.focused
    }

    pub fn is_active(&self, id: PaneId) -> bool {
        self.panes.get(&id).is_some_and(|slot| slot.active)
    }

    pub fn pane(&self, id: PaneId) -> Option<&P> {
        self.panes.get(&id).map(|slot| &*slot.pane)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut P> {
        self.panes.get_mut(&id).map(|slot| &mut *slot.pane)
    }

    pub fn focused_pane_mut(&mut self) -> Option<&mut P> {
        let id = self.focused?;
        self.pane_mut(id)
    }

    /// Pane ids in the order they were opened
    pub fn open_order(&self) -> Vec<PaneId> {
        self.panes.keys().copied().collect()
    }

    /// Pane ids in layout order
    pub fn layout_order(&self) -> &[PaneId] {
        self.engine.panes()
    }

    pub fn mode(&self) -> TilingMode {
        self.engine.mode()
    }

    // -- Open / close --

    /// Initialize a pane, lay it out and focus it
    pub fn open_pane(&mut self, pane: Box<P>) -> Result<PaneId, ManagerError> {
        self.open_pane_with(pane, PlacementHint::default())
    }

    pub fn open_pane_with(
        &mut self,
        pane: Box<P>,
        hint: PlacementHint,
    ) -> Result<PaneId, ManagerError> {
        let id = self.attach(pane, hint)?;
        self.focus_pane(id)?;
        Ok(id)
    }

    /// Initialize and register a pane without touching focus. A pane whose
    /// initialize hook fails is dropped and never reaches the layout.
    fn attach(&mut self, mut pane: Box<P>, hint: PlacementHint) -> Result<PaneId, ManagerError> {
        let kind = pane.kind().to_string();
        if let Err(source) = guard(&kind, Hook::Initialize, || pane.initialize()) {
            self.events.emit(PaneEvent::PaneFailed {
                kind: kind.clone(),
                error: source.to_string(),
            });
            return Err(ManagerError::InitializeFailed { kind, source });
        }

        let id = PaneId(self.next_id);
        self.next_id += 1;
        if let Err(e) = self.engine.add_pane(id, hint) {
            let _ = guard(&kind, Hook::Dispose, || pane.dispose());
            return Err(e.into());
        }
        self.history.track_pane(id);
        guard_call(&kind, Hook::VisualState, || {
            pane.apply_visual_state(VisualState::Inactive)
        });
        self.panes.insert(
            id,
            PaneSlot {
                pane,
                active: false,
            },
        );

        tracing::info!(pane = %id, %kind, "opened pane");
        self.events.emit(PaneEvent::Opened(id));
        Ok(id)
    }

    /// Close a pane. Its dispose hook runs exactly once, and a failing dispose
    /// does not keep it open. Closing a pane that is not open does nothing.
    pub fn close_pane(&mut self, id: PaneId) -> Option<CloseOutcome> {
        if !self.panes.contains_key(&id) {
            return None;
        }
        let was_focused = self.focused == Some(id);
        if was_focused {
            self.deactivate(id);
        }

        self.engine.remove_pane(id);
        let mut slot = self.panes.shift_remove(&id)?;
        let kind = slot.pane.kind().to_string();
        let dispose_error = guard(&kind, Hook::Dispose, || slot.pane.dispose()).err();
        self.history.untrack_pane(id);
        drop(slot);

        tracing::info!(pane = %id, %kind, "closed pane");
        self.events.emit(PaneEvent::Closed(id));

        if was_focused {
            // Most recently opened survivor takes over
            match self.panes.keys().last().copied() {
                Some(next) => {
                    let _ = self.focus_pane(next);
                }
                None => {
                    self.focused = None;
                    self.events.emit(PaneEvent::FocusChanged {
                        from: Some(id),
                        to: None,
                    });
                }
            }
        }

        Some(CloseOutcome {
            pane: id,
            kind,
            dispose_error,
        })
    }

    pub fn close_focused_pane(&mut self) -> Option<CloseOutcome> {
        let id = self.focused?;
        self.close_pane(id)
    }

    /// Close every pane, most recently opened first
    pub fn close_all(&mut self) -> Vec<CloseOutcome> {
        // Drop focus up front so closing does not hop focus across doomed panes
        if let Some(id) = self.focused.take() {
            self.deactivate(id);
            self.events.emit(PaneEvent::FocusChanged {
                from: Some(id),
                to: None,
            });
        }
        let ids: Vec<PaneId> = self.panes.keys().rev().copied().collect();
        ids.into_iter()
            .filter_map(|id| self.close_pane(id))
            .collect()
    }

    // -- Focus --

    /// Make `id` the focused pane. Focusing the pane that already has focus does nothing.
    pub fn focus_pane(&mut self, id: PaneId) -> Result<(), ManagerError> {
        if !self.panes.contains_key(&id) {
            return Err(ManagerError::UnknownPane(id));
        }
        if self.focused == Some(id) {
            return Ok(());
        }
        let previous = self.focused.replace(id);
        if let Some(prev) = previous {
            self.deactivate(prev);
        }
        self.activate(id);

        tracing::debug!(from = ?previous, to = %id, "focus changed");
        self.events.emit(PaneEvent::FocusChanged {
            from: previous,
            to: Some(id),
        });
        Ok(())
    }

    fn activate(&mut self, id: PaneId) {
        let Some(slot) = self.panes.get_mut(&id) else {
            return;
        };
        slot.active = true;
        let kind = slot.pane.kind().to_string();
        guard_call(&kind, Hook::VisualState, || {
            slot.pane.apply_visual_state(VisualState::Active)
        });
        guard_call(&kind, Hook::GainedFocus, || slot.pane.on_gained_focus());
        self.history.apply_focus_to_pane(id, &mut *slot.pane);
    }

    fn deactivate(&mut self, id: PaneId) {
        let Some(slot) = self.panes.get_mut(&id) else {
            return;
        };
        slot.active = false;
        let kind = slot.pane.kind().to_string();
        guard_call(&kind, Hook::VisualState, || {
            slot.pane.apply_visual_state(VisualState::Inactive)
        });
        guard_call(&kind, Hook::LostFocus, || slot.pane.on_lost_focus());
    }

    /// Record that `element` took keyboard focus inside pane `id`
    pub fn element_focused(&mut self, id: PaneId, element: ElementId) -> bool {
        self.panes.contains_key(&id) && self.history.record_focus(id, element)
    }

    /// Move focus to the nearest pane in `direction`. A miss leaves everything
    /// as it was and emits `PaneEvent::NavigationMiss`.
    pub fn navigate_focus(&mut self, direction: Direction) -> NavigateOutcome {
        let Some(from) = self.focused else {
            return NavigateOutcome::NoFocusedPane;
        };
        match self.engine.find_in_direction(from, direction) {
            Some(to) => {
                let _ = self.focus_pane(to);
                NavigateOutcome::Moved { from, to }
            }
            None => self.miss(direction),
        }
    }

    /// Swap the focused pane with its neighbour in `direction`. Focus stays on
    /// the moved pane.
    pub fn move_pane(&mut self, direction: Direction) -> NavigateOutcome {
        let Some(from) = self.focused else {
            return NavigateOutcome::NoFocusedPane;
        };
        let Some(to) = self.engine.find_in_direction(from, direction) else {
            return self.miss(direction);
        };
        if self.engine.swap_panes(from, to).is_err() {
            return self.miss(direction);
        }
        tracing::debug!(pane = %from, with = %to, %direction, "moved pane");
        NavigateOutcome::Moved { from, to }
    }

    fn miss(&mut self, direction: Direction) -> NavigateOutcome {
        tracing::debug!(%direction, "no pane in that direction");
        self.events.emit(PaneEvent::NavigationMiss(direction));
        NavigateOutcome::NoPaneInDirection
    }

    /// Focus the next pane in layout order, wrapping around
    pub fn focus_next(&mut self) -> Option<PaneId> {
        self.cycle_focus(true)
    }

    pub fn focus_prev(&mut self) -> Option<PaneId> {
        self.cycle_focus(false)
    }

    fn cycle_focus(&mut self, forward: bool) -> Option<PaneId> {
        let order = self.engine.panes();
        if order.is_empty() {
            return None;
        }
        let len = order.len();
        let next = match self.focused.and_then(|f| order.iter().position(|&p| p == f)) {
            Some(i) if forward => order[(i + 1) % len],
            Some(i) => order[(i + len - 1) % len],
            None => order[0],
        };
        self.focus_pane(next).ok()?;
        Some(next)
    }

    // -- Layout --

    pub fn set_mode(&mut self, mode: TilingMode) {
        self.engine.set_mode(mode);
        tracing::info!(%mode, effective = %self.engine.effective_mode(), "tiling mode changed");
    }

    pub fn set_area(&mut self, area: Rect) {
        self.engine.set_area(area);
    }

    /// Grow the focused pane along `axis` by `delta` cells (negative shrinks)
    pub fn resize_focused(
        &mut self,
        axis: Axis,
        delta: i32,
    ) -> Result<Option<ResizeOutcome>, ManagerError> {
        let Some(id) = self.focused else {
            return Ok(None);
        };
        Ok(self.engine.resize_pane(id, axis, delta)?)
    }

    pub fn reset_sizes(&mut self) {
        self.engine.reset_sizes();
    }

    /// Start dragging the divider under the cell at `(x, y)`, if any
    pub fn begin_resize_at(&mut self, x: u16, y: u16) -> Option<Divider> {
        let divider = *self.engine.snapshot().divider_at(x, y)?;
        self.engine.begin_resize(divider.axis, divider.index).ok()?;
        Some(divider)
    }

    pub fn drag_resize(&mut self, delta: i32) {
        self.engine.drag_resize(delta);
    }

    pub fn is_resizing(&self) -> bool {
        self.engine.is_resizing()
    }

    pub fn complete_resize(&mut self) -> Option<ResizeOutcome> {
        self.engine.complete_resize()
    }

    // -- State --

    /// Capture the open panes (in layout order), the mode and any size overrides
    pub fn get_state(&self) -> PaneManagerState {
        let order = self.engine.panes();
        let panes = order
            .iter()
            .filter_map(|id| self.panes.get(id))
            .map(|slot| {
                let kind = slot.pane.kind().to_string();
                let state = guard(&kind, Hook::SaveState, || Ok(slot.pane.save_state()))
                    .ok()
                    .flatten()
                    .unwrap_or(serde_json::Value::Null);
                SavedPane { kind, state }
            })
            .collect();
        let focused = self
            .focused
            .and_then(|f| order.iter().position(|&p| p == f));

        PaneManagerState {
            panes,
            mode: self.engine.mode(),
            size_overrides: self.engine.size_overrides(),
            focused,
            saved_at: Some(chrono::Utc::now()),
        }
    }

    /// Replace the open panes with those described by `state`.
    ///
    /// Each saved entry takes the first unused supplied pane of the same kind.
    /// Entries without a match, or whose pane fails to initialize, are skipped;
    /// everything else is restored.
    pub fn restore_state(&mut self, state: &PaneManagerState, panes: Vec<Box<P>>) -> RestoreReport {
        self.close_all();
        self.engine.set_mode(state.mode);
        self.engine.set_size_overrides(&state.size_overrides);

        let mut supplied: Vec<Option<Box<P>>> = panes.into_iter().map(Some).collect();
        let mut restored_ids: Vec<Option<PaneId>> = Vec::with_capacity(state.panes.len());
        let mut report = RestoreReport::default();

        for saved in &state.panes {
            let index = supplied
                .iter()
                .position(|p| matches!(p, Some(pane) if pane.kind() == saved.kind));
            let Some(mut pane) = index.and_then(|i| supplied[i].take()) else {
                tracing::warn!(kind = %saved.kind, "no pane supplied for saved entry");
                report.skipped += 1;
                restored_ids.push(None);
                continue;
            };

            if !saved.state.is_null() {
                let blob = saved.state.clone();
                // A pane that rejects its blob still opens with default state
                let _ = guard(&saved.kind, Hook::RestoreState, || pane.restore_state(blob));
            }

            match self.attach(pane, PlacementHint::default()) {
                Ok(id) => {
                    report.restored += 1;
                    restored_ids.push(Some(id));
                }
                Err(_) => {
                    report.skipped += 1;
                    restored_ids.push(None);
                }
            }
        }
        report.unused = supplied.iter().filter(|p| p.is_some()).count();

        let focus = state
            .focused
            .and_then(|i| restored_ids.get(i).copied().flatten())
            .or_else(|| self.panes.keys().last().copied());
        if let Some(id) = focus {
            let _ = self.focus_pane(id);
        }

        tracing::info!(
            restored = report.restored,
            skipped = report.skipped,
            unused = report.unused,
            "restored pane layout"
        );
        report
    }
}

impl<P: Pane + ?Sized> Drop for PaneManager<P> {
    fn drop(&mut self) {
        if !self.panes.is_empty() {
            self.close_all();
        }
    }
}
