pub mod arrange;
pub mod engine;
pub mod navigate;
pub mod sizing;
pub mod snapshot;

pub use arrange::{MASTER_RATIO, grid_dimensions, resolve_mode};
pub use engine::{LayoutError, PlacementHint, ResizeOutcome, TilingLayoutEngine};
pub use snapshot::{Divider, LayoutSnapshot, Placement};
