pub mod history;

pub use history::{FocusHistoryManager, FocusRecord};
