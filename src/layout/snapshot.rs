use ratatui::layout::Rect;

use crate::model::{Axis, GridPosition, PaneId, TilingMode};

/// Where one pane goes: its logical slot and the concrete rectangle for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub pane: PaneId,
    pub position: GridPosition,
    pub row_span: usize,
    pub rect: Rect,
}

/// A draggable boundary between track `index` and track `index + 1` on `axis`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Divider {
    pub axis: Axis,
    pub index: usize,
    /// One-cell-thick hit area along the boundary
    pub rect: Rect,
}

/// Immutable result of one relayout.
///
/// Every consumer (directional find, rendering, state capture) reads one of these;
/// the engine replaces it wholesale instead of mutating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSnapshot {
    /// Mode as requested, possibly `Auto`
    pub requested_mode: TilingMode,
    /// Mode actually laid out
    pub mode: TilingMode,
    pub area: Rect,
    pub rows: usize,
    pub columns: usize,
    pub column_sizes: Vec<u16>,
    pub row_sizes: Vec<u16>,
    /// One entry per pane, in layout order
    pub placements: Vec<Placement>,
    pub dividers: Vec<Divider>,
}

impl LayoutSnapshot {
    pub fn empty(requested_mode: TilingMode, mode: TilingMode, area: Rect) -> Self {
        LayoutSnapshot {
            requested_mode,
            mode,
            area,
            rows: 0,
            columns: 0,
            column_sizes: Vec::new(),
            row_sizes: Vec::new(),
            placements: Vec::new(),
            dividers: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn placement(&self, pane: PaneId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.pane == pane)
    }

    pub fn position_of(&self, pane: PaneId) -> Option<GridPosition> {
        self.placement(pane).map(|p| p.position)
    }

    pub fn rect_of(&self, pane: PaneId) -> Option<Rect> {
        self.placement(pane).map(|p| p.rect)
    }

    /// The pane whose slot starts at `position`
    pub fn pane_at(&self, position: GridPosition) -> Option<PaneId> {
        self.placements
            .iter()
            .find(|p| p.position == position)
            .map(|p| p.pane)
    }

    pub fn positions(&self) -> impl Iterator<Item = (PaneId, GridPosition)> + '_ {
        self.placements.iter().map(|p| (p.pane, p.position))
    }

    pub fn track_sizes(&self, axis: Axis) -> &[u16] {
        match axis {
            Axis::Columns => &self.column_sizes,
            Axis::Rows => &self.row_sizes,
        }
    }

    pub fn divider(&self, axis: Axis, index: usize) -> Option<&Divider> {
        self.dividers
            .iter()
            .find(|d| d.axis == axis && d.index == index)
    }

    /// The divider whose hit area contains the cell at `(x, y)`
    pub fn divider_at(&self, x: u16, y: u16) -> Option<&Divider> {
        self.dividers.iter().find(|d| {
            x >= d.rect.x
                && x < d.rect.x.saturating_add(d.rect.width)
                && y >= d.rect.y
                && y < d.rect.y.saturating_add(d.rect.height)
        })
    }
}
