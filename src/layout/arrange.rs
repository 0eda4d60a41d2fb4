use crate::model::{Axis, GridPosition, TilingMode};

/// Share of the width given to the master column in master/stack mode
pub const MASTER_RATIO: f64 = 0.6;

/// Resolve `Auto` to a concrete mode for the given pane count.
///
/// 1 pane is fullscreen grid, 2 sit side by side, 3-4 form a grid and
/// 5 or more switch to master/stack. Non-auto modes are returned unchanged.
pub fn resolve_mode(mode: TilingMode, count: usize) -> TilingMode {
    match mode {
        TilingMode::Auto => match count {
            0 | 1 => TilingMode::Grid,
            2 => TilingMode::Tall,
            3 | 4 => TilingMode::Grid,
            _ => TilingMode::MasterStack,
        },
        other => other,
    }
}

/// Smallest `c` with `c * c >= n`
fn ceil_sqrt(n: usize) -> usize {
    let mut c = 0;
    while c * c < n {
        c += 1;
    }
    c
}

/// `(rows, columns)` of the grid for `n` panes
pub fn grid_dimensions(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let columns = ceil_sqrt(n);
    let rows = n.div_ceil(columns);
    (rows, columns)
}

/// Logical slot of one pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub position: GridPosition,
    /// Number of row tracks covered, starting at `position.row`
    pub row_span: usize,
}

impl Cell {
    fn single(row: usize, column: usize) -> Self {
        Cell {
            position: GridPosition::new(row, column),
            row_span: 1,
        }
    }
}

/// Logical structure of a layout: track counts plus one cell per pane, in pane order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    /// Effective mode, never `Auto`
    pub mode: TilingMode,
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Cell>,
}

impl Arrangement {
    pub fn track_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Columns => self.columns,
            Axis::Rows => self.rows,
        }
    }
}

/// Compute the logical arrangement of `count` panes under `mode`.
pub fn arrange(mode: TilingMode, count: usize) -> Arrangement {
    let mode = resolve_mode(mode, count);
    if count == 0 {
        return Arrangement {
            mode,
            rows: 0,
            columns: 0,
            cells: Vec::new(),
        };
    }

    match mode {
        TilingMode::Tall => Arrangement {
            mode,
            rows: 1,
            columns: count,
            cells: (0..count).map(|i| Cell::single(0, i)).collect(),
        },
        TilingMode::Wide => Arrangement {
            mode,
            rows: count,
            columns: 1,
            cells: (0..count).map(|i| Cell::single(i, 0)).collect(),
        },
        TilingMode::MasterStack if count == 1 => Arrangement {
            mode,
            rows: 1,
            columns: 1,
            cells: vec![Cell::single(0, 0)],
        },
        TilingMode::MasterStack => {
            let stack = count - 1;
            let mut cells = Vec::with_capacity(count);
            cells.push(Cell {
                position: GridPosition::new(0, 0),
                row_span: stack,
            });
            cells.extend((0..stack).map(|i| Cell::single(i, 1)));
            Arrangement {
                mode,
                rows: stack,
                columns: 2,
                cells,
            }
        }
        // resolve_mode never yields Auto
        TilingMode::Grid | TilingMode::Auto => {
            let (rows, columns) = grid_dimensions(count);
            Arrangement {
                mode: TilingMode::Grid,
                rows,
                columns,
                cells: (0..count)
                    .map(|i| Cell::single(i / columns, i % columns))
                    .collect(),
            }
        }
    }
}

/// Default relative weights for one axis. Mean weight is 1.0.
pub fn default_weights(arrangement: &Arrangement, axis: Axis) -> Vec<f64> {
    let count = arrangement.track_count(axis);
    if arrangement.mode == TilingMode::MasterStack && axis == Axis::Columns && count == 2 {
        return vec![MASTER_RATIO * 2.0, (1.0 - MASTER_RATIO) * 2.0];
    }
    vec![1.0; count]
}
