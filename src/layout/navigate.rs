use crate::model::{Direction, GridPosition, PaneId};

use super::snapshot::Placement;

/// Score of `candidate` as a move from `origin` in `direction`, or `None` if the
/// candidate does not lie strictly in that direction.
///
/// The score is `2 * primary + secondary`, which orders candidates the same way as
/// `primary + 0.5 * secondary` without floating point: panes in line with the
/// origin beat panes that are merely closer.
pub fn direction_score(
    origin: GridPosition,
    candidate: GridPosition,
    direction: Direction,
) -> Option<usize> {
    let (r0, c0) = (origin.row, origin.column);
    let (r, c) = (candidate.row, candidate.column);
    let (primary, secondary) = match direction {
        Direction::Up if r < r0 => (r0 - r, c.abs_diff(c0)),
        Direction::Down if r > r0 => (r - r0, c.abs_diff(c0)),
        Direction::Left if c < c0 => (c0 - c, r.abs_diff(r0)),
        Direction::Right if c > c0 => (c - c0, r.abs_diff(r0)),
        _ => return None,
    };
    Some(2 * primary + secondary)
}

/// The best pane to move to from `from` in `direction`.
///
/// Ties go to the pane that comes first in layout order. Returns `None` when
/// `from` is not placed or nothing lies in that direction; never wraps around.
pub fn find_in_direction(
    placements: &[Placement],
    from: PaneId,
    direction: Direction,
) -> Option<PaneId> {
    let origin = placements.iter().find(|p| p.pane == from)?.position;
    placements
        .iter()
        .filter(|p| p.pane != from)
        .filter_map(|p| direction_score(origin, p.position, direction).map(|s| (s, p.pane)))
        .min_by_key(|(score, _)| *score)
        .map(|(_, pane)| pane)
}
