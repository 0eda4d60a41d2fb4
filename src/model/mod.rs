pub mod config;
pub mod geometry;
pub mod state;

pub use config::*;
pub use geometry::*;
pub use state::*;
