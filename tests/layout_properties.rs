//! Layout engine properties checked across pane counts, modes and areas.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use ratatui::layout::Rect;

use tilework::layout::{PlacementHint, TilingLayoutEngine, grid_dimensions, resolve_mode};
use tilework::model::{Axis, Direction, PaneId, SizeConstraint, TilingMode};

const CONCRETE: [TilingMode; 4] = [
    TilingMode::Grid,
    TilingMode::Tall,
    TilingMode::Wide,
    TilingMode::MasterStack,
];

fn engine(mode: TilingMode, n: u64, area: Rect) -> TilingLayoutEngine {
    let mut engine = TilingLayoutEngine::new(mode, SizeConstraint::default());
    engine.set_area(area);
    for id in 1..=n {
        engine.add_pane(PaneId(id), PlacementHint::default()).unwrap();
    }
    engine
}

/// Small deterministic generator so failures reproduce
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next() % (hi - lo + 1) as u64) as i32
    }
}

#[test]
fn grid_dimensions_follow_square_root() {
    for n in 1..=20usize {
        let (rows, columns) = grid_dimensions(n);
        let expected_columns = (n as f64).sqrt().ceil() as usize;
        assert_eq!(columns, expected_columns, "n={n}");
        assert_eq!(rows, n.div_ceil(columns), "n={n}");

        let snap = engine(TilingMode::Grid, n as u64, Rect::new(0, 0, 200, 80)).snapshot();
        assert_eq!((snap.rows, snap.columns), (rows, columns));
        let positions: HashSet<_> = snap.positions().map(|(_, p)| p).collect();
        assert_eq!(positions.len(), n, "duplicate position for n={n}");
        assert!(positions.iter().all(|p| p.row < rows && p.column < columns));
    }
}

#[test]
fn auto_mode_thresholds() {
    for n in 1..=20usize {
        let expected = match n {
            1 => TilingMode::Grid,
            2 => TilingMode::Tall,
            3 | 4 => TilingMode::Grid,
            _ => TilingMode::MasterStack,
        };
        assert_eq!(resolve_mode(TilingMode::Auto, n), expected, "n={n}");
        let snap = engine(TilingMode::Auto, n as u64, Rect::new(0, 0, 200, 80)).snapshot();
        assert_eq!(snap.mode, expected, "n={n}");
        assert_eq!(snap.requested_mode, TilingMode::Auto);
    }
}

#[test]
fn every_pane_has_one_unique_slot_in_every_mode() {
    for mode in CONCRETE {
        for n in 1..=9u64 {
            let snap = engine(mode, n, Rect::new(0, 0, 160, 60)).snapshot();
            assert_eq!(snap.placements.len(), n as usize);
            let positions: HashSet<_> = snap.positions().map(|(_, p)| p).collect();
            assert_eq!(positions.len(), n as usize, "{mode} n={n}");
        }
    }
}

#[test]
fn tracks_fill_the_area_exactly() {
    let areas = [Rect::new(0, 0, 120, 40), Rect::new(3, 2, 97, 31), Rect::new(0, 0, 61, 17)];
    for area in areas {
        for mode in CONCRETE {
            for n in 1..=6u64 {
                let snap = engine(mode, n, area).snapshot();
                let width: u16 = snap.column_sizes.iter().sum();
                let height: u16 = snap.row_sizes.iter().sum();
                assert_eq!((width, height), (area.width, area.height), "{mode} n={n} {area:?}");
                for p in &snap.placements {
                    assert!(area.contains(p.rect.as_position()), "{mode} n={n}");
                    assert!(p.rect.right() <= area.right() && p.rect.bottom() <= area.bottom());
                }
            }
        }
    }
}

#[test]
fn placements_never_overlap() {
    for mode in CONCRETE {
        for n in 2..=7u64 {
            let snap = engine(mode, n, Rect::new(0, 0, 140, 50)).snapshot();
            for (i, a) in snap.placements.iter().enumerate() {
                for b in &snap.placements[i + 1..] {
                    assert!(!a.rect.intersects(b.rect), "{mode} n={n}: {a:?} / {b:?}");
                }
            }
        }
    }
}

#[test]
fn directional_find_is_strict() {
    for mode in CONCRETE {
        for n in 1..=9u64 {
            let engine = engine(mode, n, Rect::new(0, 0, 160, 60));
            let snap = engine.snapshot();
            for (from, p0) in snap.positions() {
                for dir in Direction::ALL {
                    let Some(to) = engine.find_in_direction(from, dir) else {
                        continue;
                    };
                    let p = snap.position_of(to).unwrap();
                    let ok = match dir {
                        Direction::Up => p.row < p0.row,
                        Direction::Down => p.row > p0.row,
                        Direction::Left => p.column < p0.column,
                        Direction::Right => p.column > p0.column,
                    };
                    assert!(ok, "{mode} n={n}: {from} {dir} -> {to}");
                }
            }
        }
    }
}

#[test]
fn single_pane_has_no_neighbours() {
    for mode in TilingMode::ALL {
        let engine = engine(mode, 1, Rect::new(0, 0, 80, 24));
        for dir in Direction::ALL {
            assert_eq!(engine.find_in_direction(PaneId(1), dir), None);
        }
    }
}

#[test]
fn relayout_is_idempotent() {
    for mode in TilingMode::ALL {
        let mut engine = engine(mode, 5, Rect::new(0, 0, 120, 40));
        engine.resize_pane(PaneId(1), Axis::Columns, 7).unwrap();
        let before = engine.snapshot();
        engine.relayout();
        engine.relayout();
        assert_eq!(*engine.snapshot(), *before, "{mode}");
    }
}

#[test]
fn zero_panes_is_an_empty_layout() {
    for mode in TilingMode::ALL {
        let snap = engine(mode, 0, Rect::new(0, 0, 80, 24)).snapshot();
        assert!(snap.is_empty());
        assert!(snap.dividers.is_empty());
        assert_eq!((snap.rows, snap.columns), (0, 0));
    }
}

#[test]
fn manual_resizes_never_break_the_minimum() {
    let constraint = SizeConstraint::default();
    let mut rng = Lcg(7);
    for mode in CONCRETE {
        for n in 2..=8u64 {
            let mut engine = engine(mode, n, Rect::new(0, 0, 150, 48));
            for _ in 0..40 {
                let snap = engine.snapshot();
                if snap.dividers.is_empty() {
                    break;
                }
                let divider = snap.dividers[rng.next() as usize % snap.dividers.len()];
                let delta = rng.range(-80, 80);
                let outcome = engine
                    .resize_divider(divider.axis, divider.index, delta)
                    .unwrap()
                    .unwrap();
                let min = constraint.min_for(outcome.axis);
                assert!(
                    outcome.lengths.iter().all(|&l| l >= min),
                    "{mode} n={n} delta={delta}: {:?}",
                    outcome.lengths
                );
                let after = engine.snapshot();
                assert!(after.column_sizes.iter().all(|&l| l >= constraint.min_width));
                assert!(after.row_sizes.iter().all(|&l| l >= constraint.min_height));
            }
        }
    }
}

#[test]
fn swap_keeps_slots_and_exchanges_occupants() {
    let mut engine = engine(TilingMode::Grid, 4, Rect::new(0, 0, 100, 40));
    let before = engine.snapshot();
    engine.swap_panes(PaneId(1), PaneId(4)).unwrap();
    let after = engine.snapshot();
    assert_eq!(after.rect_of(PaneId(1)), before.rect_of(PaneId(4)));
    assert_eq!(after.position_of(PaneId(4)), before.position_of(PaneId(1)));
    assert_eq!(after.column_sizes, before.column_sizes);
    assert_eq!(engine.panes(), &[PaneId(4), PaneId(2), PaneId(3), PaneId(1)]);
}
