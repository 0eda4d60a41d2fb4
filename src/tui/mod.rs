pub mod app;
pub mod input;
pub mod panes;
pub mod render;
pub mod theme;

#[cfg(test)]
pub mod test_helpers;

pub use app::run;
