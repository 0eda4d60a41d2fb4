use std::collections::BTreeMap;
use std::sync::Arc;

use ratatui::layout::Rect;

use crate::model::{
    Axis, Direction, GridPosition, PaneId, RegionKey, SizeConstraint, SizeOverride, TilingMode,
};

use super::arrange::{Arrangement, arrange, default_weights, resolve_mode};
use super::navigate;
use super::sizing::{ClampOutcome, clamp_tracks, distribute, offsets, weights_from_lengths};
use super::snapshot::{Divider, LayoutSnapshot, Placement};

/// Errors from layout operations that name a pane or divider the engine does not have
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("pane {0} is not in the layout")]
    UnknownPane(PaneId),
    #[error("pane {0} is already in the layout")]
    AlreadyPresent(PaneId),
    #[error("no {axis:?} divider at index {index}")]
    UnknownDivider { axis: Axis, index: usize },
}

/// Advisory placement request for a new pane. The engine may ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementHint {
    /// Preferred index in layout order
    pub index: Option<usize>,
}

impl PlacementHint {
    pub fn at(index: usize) -> Self {
        PlacementHint { index: Some(index) }
    }
}

/// Result of a committed resize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOutcome {
    pub axis: Axis,
    pub index: usize,
    pub requested: i32,
    /// Delta actually applied after clamping to the minimum
    pub applied: i32,
    /// Final track lengths on the resized axis
    pub lengths: Vec<u16>,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    axis: Axis,
    index: usize,
    delta: i32,
}

/// Arranges panes into tiles and answers geometric questions about them.
///
/// The engine only knows pane identities, never pane objects. Every change to the
/// pane set, mode, area or track sizes produces a fresh [`LayoutSnapshot`].
pub struct TilingLayoutEngine {
    order: Vec<PaneId>,
    mode: TilingMode,
    constraint: SizeConstraint,
    area: Rect,
    overrides: BTreeMap<RegionKey, f64>,
    snapshot: Arc<LayoutSnapshot>,
    drag: Option<DragState>,
}

impl TilingLayoutEngine {
    pub fn new(mode: TilingMode, constraint: SizeConstraint) -> Self {
        let area = Rect::default();
        TilingLayoutEngine {
            order: Vec::new(),
            mode,
            constraint,
            area,
            overrides: BTreeMap::new(),
            snapshot: Arc::new(LayoutSnapshot::empty(mode, resolve_mode(mode, 0), area)),
            drag: None,
        }
    }

    // -- Accessors --

    pub fn mode(&self) -> TilingMode {
        self.mode
    }

    pub fn effective_mode(&self) -> TilingMode {
        self.snapshot.mode
    }

    pub fn constraint(&self) -> SizeConstraint {
        self.constraint
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Panes in layout order
    pub fn panes(&self) -> &[PaneId] {
        &self.order
    }

    pub fn contains(&self, pane: PaneId) -> bool {
        self.order.contains(&pane)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The current layout. Cheap to clone and safe to hold across later changes.
    pub fn snapshot(&self) -> Arc<LayoutSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn position_of(&self, pane: PaneId) -> Option<GridPosition> {
        self.snapshot.position_of(pane)
    }

    // -- Pane set --

    /// Add a pane and relayout. A hint index past the end appends.
    pub fn add_pane(&mut self, pane: PaneId, hint: PlacementHint) -> Result<(), LayoutError> {
        if self.contains(pane) {
            return Err(LayoutError::AlreadyPresent(pane));
        }
        let index = hint
            .index
            .filter(|&i| i <= self.order.len())
            .unwrap_or(self.order.len());
        self.order.insert(index, pane);
        self.drag = None;
        self.relayout();
        Ok(())
    }

    /// Remove a pane and relayout. Returns false (and changes nothing) if the
    /// pane was not in the layout.
    pub fn remove_pane(&mut self, pane: PaneId) -> bool {
        let Some(index) = self.order.iter().position(|&p| p == pane) else {
            return false;
        };
        self.order.remove(index);
        self.drag = None;
        self.relayout();
        true
    }

    pub fn set_mode(&mut self, mode: TilingMode) {
        self.mode = mode;
        self.drag = None;
        self.relayout();
    }

    pub fn set_area(&mut self, area: Rect) {
        if area == self.area {
            return;
        }
        self.area = area;
        self.drag = None;
        self.relayout();
    }

    pub fn set_constraint(&mut self, constraint: SizeConstraint) {
        self.constraint = constraint;
        self.relayout();
    }

    /// Exchange the slots of two panes. Positions and rectangles stay with the
    /// slots; only which pane occupies them changes.
    pub fn swap_panes(&mut self, a: PaneId, b: PaneId) -> Result<(), LayoutError> {
        let ia = self
            .order
            .iter()
            .position(|&p| p == a)
            .ok_or(LayoutError::UnknownPane(a))?;
        let ib = self
            .order
            .iter()
            .position(|&p| p == b)
            .ok_or(LayoutError::UnknownPane(b))?;
        if ia == ib {
            return Ok(());
        }
        self.order.swap(ia, ib);

        let mut next = LayoutSnapshot::clone(&self.snapshot);
        for placement in &mut next.placements {
            if placement.pane == a {
                placement.pane = b;
            } else if placement.pane == b {
                placement.pane = a;
            }
        }
        self.snapshot = Arc::new(next);
        tracing::debug!(%a, %b, "swapped panes");
        Ok(())
    }

    // -- Queries --

    pub fn find_in_direction(&self, from: PaneId, direction: Direction) -> Option<PaneId> {
        navigate::find_in_direction(&self.snapshot.placements, from, direction)
    }

    // -- Layout --

    /// Recompute positions and rectangles from scratch. Idempotent.
    pub fn relayout(&mut self) {
        self.snapshot = Arc::new(self.compute());
        tracing::trace!(
            mode = %self.snapshot.mode,
            panes = self.order.len(),
            rows = self.snapshot.rows,
            columns = self.snapshot.columns,
            "relayout"
        );
    }

    fn compute(&self) -> LayoutSnapshot {
        let arrangement = arrange(self.mode, self.order.len());
        if arrangement.cells.is_empty() {
            return LayoutSnapshot::empty(self.mode, arrangement.mode, self.area);
        }

        let column_sizes = self.track_lengths(&arrangement, Axis::Columns);
        let row_sizes = self.track_lengths(&arrangement, Axis::Rows);
        let xs = offsets(self.area.x, &column_sizes);
        let ys = offsets(self.area.y, &row_sizes);

        let placements = self
            .order
            .iter()
            .zip(&arrangement.cells)
            .map(|(&pane, cell)| {
                let (row, column) = (cell.position.row, cell.position.column);
                let height: u16 = row_sizes[row..row + cell.row_span].iter().sum();
                Placement {
                    pane,
                    position: cell.position,
                    row_span: cell.row_span,
                    rect: Rect::new(xs[column], ys[row], column_sizes[column], height),
                }
            })
            .collect();

        let mut dividers = Vec::new();
        for index in 1..arrangement.columns {
            dividers.push(Divider {
                axis: Axis::Columns,
                index: index - 1,
                rect: Rect::new(xs[index], self.area.y, 1, self.area.height),
            });
        }
        // In master/stack the row tracks only exist inside the stack column
        let (row_x, row_width) = if arrangement.mode == TilingMode::MasterStack
            && arrangement.columns == 2
        {
            (xs[1], column_sizes[1])
        } else {
            (self.area.x, self.area.width)
        };
        for index in 1..arrangement.rows {
            dividers.push(Divider {
                axis: Axis::Rows,
                index: index - 1,
                rect: Rect::new(row_x, ys[index], row_width, 1),
            });
        }

        LayoutSnapshot {
            requested_mode: self.mode,
            mode: arrangement.mode,
            area: self.area,
            rows: arrangement.rows,
            columns: arrangement.columns,
            column_sizes,
            row_sizes,
            placements,
            dividers,
        }
    }

    fn axis_length(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Columns => self.area.width,
            Axis::Rows => self.area.height,
        }
    }

    /// Default weights with any stored overrides applied
    fn track_weights(&self, arrangement: &Arrangement, axis: Axis) -> Vec<f64> {
        let mut weights = default_weights(arrangement, axis);
        for (index, weight) in weights.iter_mut().enumerate() {
            let key = RegionKey::new(arrangement.mode, axis, index);
            if let Some(&w) = self.overrides.get(&key)
                && w.is_finite()
                && w > 0.0
            {
                *weight = w;
            }
        }
        weights
    }

    fn track_lengths(&self, arrangement: &Arrangement, axis: Axis) -> Vec<u16> {
        let weights = self.track_weights(arrangement, axis);
        let mut lengths = distribute(self.axis_length(axis), &weights);
        clamp_tracks(&mut lengths, self.constraint.min_for(axis), &weights);
        lengths
    }

    // -- Resizing --

    /// The divider that grows `pane` along `axis` when moved by a positive delta,
    /// with the sign to apply. Panes spanning the whole axis have none.
    pub fn divider_for(&self, pane: PaneId, axis: Axis) -> Option<(Divider, i32)> {
        let placement = self.snapshot.placement(pane)?;
        let (start, span) = match axis {
            Axis::Columns => (placement.position.column, 1),
            Axis::Rows => (placement.position.row, placement.row_span),
        };
        let end = start + span;
        if end < self.snapshot.track_sizes(axis).len() {
            return self.snapshot.divider(axis, end - 1).map(|d| (*d, 1));
        }
        if start > 0 {
            return self.snapshot.divider(axis, start - 1).map(|d| (*d, -1));
        }
        None
    }

    /// Start dragging a divider. Any drag in progress is discarded.
    pub fn begin_resize(&mut self, axis: Axis, index: usize) -> Result<(), LayoutError> {
        if self.snapshot.divider(axis, index).is_none() {
            return Err(LayoutError::UnknownDivider { axis, index });
        }
        self.drag = Some(DragState {
            axis,
            index,
            delta: 0,
        });
        Ok(())
    }

    /// Accumulate drag movement. Nothing is committed until `complete_resize`.
    pub fn drag_resize(&mut self, delta: i32) {
        if let Some(drag) = &mut self.drag {
            drag.delta = drag.delta.saturating_add(delta);
        }
    }

    pub fn is_resizing(&self) -> bool {
        self.drag.is_some()
    }

    pub fn cancel_resize(&mut self) {
        self.drag = None;
    }

    /// Track lengths the drag in progress would produce, without committing them
    pub fn resize_preview(&self) -> Option<Vec<u16>> {
        let drag = self.drag?;
        let (lengths, _) = self.apply_drag(drag)?;
        Some(lengths)
    }

    fn apply_drag(&self, drag: DragState) -> Option<(Vec<u16>, i32)> {
        let mut lengths = self.snapshot.track_sizes(drag.axis).to_vec();
        if drag.index + 1 >= lengths.len() {
            return None;
        }
        let min = i32::from(self.constraint.min_for(drag.axis));
        let before = i32::from(lengths[drag.index]);
        let after = i32::from(lengths[drag.index + 1]);
        // Stop the boundary where either side would drop below the minimum
        let lowest = -(before - min).max(0);
        let highest = (after - min).max(0);
        let applied = drag.delta.clamp(lowest, highest);
        lengths[drag.index] = (before + applied) as u16;
        lengths[drag.index + 1] = (after - applied) as u16;
        Some((lengths, applied))
    }

    /// Commit the drag in progress: clamp every track on the axis to the minimum,
    /// store the result as size overrides and relayout. The clamp runs before
    /// anything is stored, so no under-sized result is ever observable.
    pub fn complete_resize(&mut self) -> Option<ResizeOutcome> {
        let drag = self.drag.take()?;
        let (mut lengths, applied) = self.apply_drag(drag)?;
        let weights = weights_from_lengths(&lengths);
        let min = self.constraint.min_for(drag.axis);
        if clamp_tracks(&mut lengths, min, &weights) == ClampOutcome::Proportional {
            tracing::warn!(axis = ?drag.axis, min, "area too small for minimum track size");
        }

        let mode = self.snapshot.mode;
        for (index, weight) in weights_from_lengths(&lengths).into_iter().enumerate() {
            self.overrides
                .insert(RegionKey::new(mode, drag.axis, index), weight);
        }
        self.relayout();

        tracing::debug!(
            axis = ?drag.axis,
            index = drag.index,
            requested = drag.delta,
            applied,
            "resize committed"
        );
        Some(ResizeOutcome {
            axis: drag.axis,
            index: drag.index,
            requested: drag.delta,
            applied,
            lengths: self.snapshot.track_sizes(drag.axis).to_vec(),
        })
    }

    /// Move one divider by `delta` cells in a single step
    pub fn resize_divider(
        &mut self,
        axis: Axis,
        index: usize,
        delta: i32,
    ) -> Result<Option<ResizeOutcome>, LayoutError> {
        self.begin_resize(axis, index)?;
        self.drag_resize(delta);
        Ok(self.complete_resize())
    }

    /// Grow (or shrink, with a negative delta) a pane's track along `axis`.
    /// Returns `Ok(None)` when the pane spans the whole axis.
    pub fn resize_pane(
        &mut self,
        pane: PaneId,
        axis: Axis,
        delta: i32,
    ) -> Result<Option<ResizeOutcome>, LayoutError> {
        if !self.contains(pane) {
            return Err(LayoutError::UnknownPane(pane));
        }
        let Some((divider, sign)) = self.divider_for(pane, axis) else {
            return Ok(None);
        };
        self.resize_divider(divider.axis, divider.index, delta * sign)
    }

    // -- Size overrides --

    pub fn size_overrides(&self) -> Vec<SizeOverride> {
        self.overrides
            .iter()
            .map(|(&region, &size)| SizeOverride { region, size })
            .collect()
    }

    /// Replace all overrides (used when restoring saved state). Entries with
    /// unusable sizes are dropped.
    pub fn set_size_overrides(&mut self, overrides: &[SizeOverride]) {
        self.overrides = overrides
            .iter()
            .filter(|o| o.size.is_finite() && o.size > 0.0 && o.region.mode != TilingMode::Auto)
            .map(|o| (o.region, o.size))
            .collect();
        self.relayout();
    }

    /// Forget every manual resize
    pub fn reset_sizes(&mut self) {
        self.overrides.clear();
        self.drag = None;
        self.relayout();
    }
}
