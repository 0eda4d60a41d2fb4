pub mod events;
pub mod pane_manager;

pub use events::{EventBus, PaneEvent, drain};
pub use pane_manager::{CloseOutcome, ManagerError, NavigateOutcome, PaneManager, RestoreReport};
