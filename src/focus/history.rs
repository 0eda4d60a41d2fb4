use std::collections::HashMap;

use crate::model::PaneId;
use crate::pane::{ContentRoot, ElementId, FocusTarget, Hook, Pane, guard_call};

/// What the history knows about one pane
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusRecord {
    pub last_focused: Option<ElementId>,
}

/// Remembers which element inside each pane last had keyboard focus, so that
/// focus can be put back when the pane becomes active again.
///
/// Records are created by `track_pane` and must be dropped with `untrack_pane`
/// from the pane's close path; nothing else removes them.
#[derive(Debug, Default)]
pub struct FocusHistoryManager {
    records: HashMap<PaneId, FocusRecord>,
}

impl FocusHistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording for a pane. Tracking an already tracked pane keeps its record.
    pub fn track_pane(&mut self, pane: PaneId) {
        self.records.entry(pane).or_default();
    }

    /// Stop recording and discard the pane's record
    pub fn untrack_pane(&mut self, pane: PaneId) -> bool {
        self.records.remove(&pane).is_some()
    }

    pub fn is_tracked(&self, pane: PaneId) -> bool {
        self.records.contains_key(&pane)
    }

    pub fn tracked_count(&self) -> usize {
        self.records.len()
    }

    /// Note that `element` received focus inside `pane`. Ignored for untracked panes.
    pub fn record_focus(&mut self, pane: PaneId, element: ElementId) -> bool {
        match self.records.get_mut(&pane) {
            Some(record) => {
                record.last_focused = Some(element);
                true
            }
            None => false,
        }
    }

    pub fn last_focused(&self, pane: PaneId) -> Option<&ElementId> {
        self.records.get(&pane)?.last_focused.as_ref()
    }

    /// Pick the focus target for a pane:
    /// the remembered element if it still exists and can take focus, else the
    /// first focusable element near the top of the content tree, else the pane root.
    pub fn resolve_focus(&self, pane: PaneId, content: &ContentRoot) -> FocusTarget {
        if let Some(last) = self.last_focused(pane)
            && content.find(last).is_some_and(|e| e.can_focus())
        {
            return FocusTarget::Element(last.clone());
        }
        match content.first_focusable() {
            Some(element) => FocusTarget::Element(element.id.clone()),
            None => FocusTarget::Root,
        }
    }

    /// Resolve the focus target and hand it to the pane. Never fails: a pane with
    /// nothing focusable gets `FocusTarget::Root`.
    pub fn apply_focus_to_pane<P: Pane + ?Sized>(&mut self, id: PaneId, pane: &mut P) -> FocusTarget {
        let target = self.resolve_focus(id, pane.content());
        let name = pane.kind().to_string();
        guard_call(&name, Hook::FocusTarget, || pane.focus_target(&target));
        if let FocusTarget::Element(element) = &target {
            self.record_focus(id, element.clone());
        }
        tracing::trace!(pane = %id, ?target, "focus restored");
        target
    }
}
