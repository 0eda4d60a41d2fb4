use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity of an open pane. Assigned by the pane manager when the pane is opened
/// and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub u64);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical (row, column) coordinate of a pane in the current layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
}

impl GridPosition {
    pub const fn new(row: usize, column: usize) -> Self {
        GridPosition { row, column }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

/// Compass direction for focus navigation and pane moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The axis along which this direction moves
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Rows,
            Direction::Left | Direction::Right => Axis::Columns,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(s)
    }
}

/// A family of tracks: column tracks split the width, row tracks split the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Columns,
    Rows,
}

impl Axis {
    fn key(self) -> &'static str {
        match self {
            Axis::Columns => "col",
            Axis::Rows => "row",
        }
    }
}

/// Layout strategy. `Auto` is resolved to one of the others at compute time
/// and is never an effective layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TilingMode {
    #[default]
    Auto,
    Grid,
    Tall,
    Wide,
    MasterStack,
}

impl TilingMode {
    pub const ALL: [TilingMode; 5] = [
        TilingMode::Auto,
        TilingMode::Grid,
        TilingMode::Tall,
        TilingMode::Wide,
        TilingMode::MasterStack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TilingMode::Auto => "auto",
            TilingMode::Grid => "grid",
            TilingMode::Tall => "tall",
            TilingMode::Wide => "wide",
            TilingMode::MasterStack => "master-stack",
        }
    }

    /// Next mode in the cycle order used by the mode toggle key
    pub fn cycle(self) -> TilingMode {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TilingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tiling mode '{0}' (expected auto, grid, tall, wide or master-stack)")]
pub struct ParseModeError(pub String);

impl FromStr for TilingMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(TilingMode::Auto),
            "grid" => Ok(TilingMode::Grid),
            "tall" => Ok(TilingMode::Tall),
            "wide" => Ok(TilingMode::Wide),
            "master-stack" | "masterstack" | "master_stack" => Ok(TilingMode::MasterStack),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Minimum size of any tiled region, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeConstraint {
    pub min_width: u16,
    pub min_height: u16,
}

impl SizeConstraint {
    pub fn min_for(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Columns => self.min_width,
            Axis::Rows => self.min_height,
        }
    }
}

impl Default for SizeConstraint {
    fn default() -> Self {
        SizeConstraint {
            min_width: 12,
            min_height: 4,
        }
    }
}

/// Key of a resizable track whose weight can be overridden.
///
/// Keys are scoped by effective mode so that widening the master column does not
/// leak into the grid's first column. Serialized as `"<mode>/<col|row>/<index>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionKey {
    pub mode: TilingMode,
    pub axis: Axis,
    pub index: usize,
}

impl RegionKey {
    pub fn new(mode: TilingMode, axis: Axis, index: usize) -> Self {
        RegionKey { mode, axis, index }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.mode, self.axis.key(), self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid region key '{0}'")]
pub struct ParseRegionKeyError(pub String);

impl FromStr for RegionKey {
    type Err = ParseRegionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRegionKeyError(s.to_string());
        let mut parts = s.split('/');
        let (Some(mode), Some(axis), Some(index), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };
        let mode: TilingMode = mode.parse().map_err(|_| err())?;
        if mode == TilingMode::Auto {
            return Err(err());
        }
        let axis = match axis {
            "col" => Axis::Columns,
            "row" => Axis::Rows,
            _ => return Err(err()),
        };
        let index = index.parse().map_err(|_| err())?;
        Ok(RegionKey { mode, axis, index })
    }
}

impl TryFrom<String> for RegionKey {
    type Error = ParseRegionKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RegionKey> for String {
    fn from(key: RegionKey) -> Self {
        key.to_string()
    }
}
