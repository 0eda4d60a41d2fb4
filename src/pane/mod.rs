//! The contract every pane fulfils.
//!
//! Panes are built by a factory outside the core and handed to the pane manager
//! already constructed. The manager only ever talks to them through the hooks
//! below, all of which have do-nothing defaults.

pub mod boundary;
pub mod content;

pub use boundary::{Hook, guard, guard_call};
pub use content::{ContentRoot, Element, ElementId, FocusTarget};

/// Failure reported by a pane hook
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaneError {
    #[error("{0}")]
    Failed(String),
    #[error("invalid saved state: {0}")]
    InvalidState(String),
    #[error("{hook} panicked: {message}")]
    Panicked { hook: Hook, message: String },
}

impl PaneError {
    pub fn failed(message: impl Into<String>) -> Self {
        PaneError::Failed(message.into())
    }
}

impl From<std::io::Error> for PaneError {
    fn from(e: std::io::Error) -> Self {
        PaneError::Failed(e.to_string())
    }
}

impl From<serde_json::Error> for PaneError {
    fn from(e: serde_json::Error) -> Self {
        PaneError::InvalidState(e.to_string())
    }
}

/// Visual activation state pushed to a pane whenever focus moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Active,
    Inactive,
}

pub trait Pane {
    /// Pane type identifier, used to match saved state to reconstructed panes
    fn kind(&self) -> &str;

    /// Human-readable name
    fn title(&self) -> String {
        self.kind().to_string()
    }

    fn content(&self) -> &ContentRoot {
        ContentRoot::empty()
    }

    /// Acquire resources and subscriptions. Called once, before the pane is laid out.
    fn initialize(&mut self) -> Result<(), PaneError> {
        Ok(())
    }

    /// Release everything `initialize` acquired and cancel pending work.
    /// Called exactly once when the pane closes.
    fn dispose(&mut self) -> Result<(), PaneError> {
        Ok(())
    }

    fn on_gained_focus(&mut self) {}

    fn on_lost_focus(&mut self) {}

    fn apply_visual_state(&mut self, _state: VisualState) {}

    /// Move keyboard focus inside the pane
    fn focus_target(&mut self, _target: &FocusTarget) {}

    fn save_state(&self) -> Option<serde_json::Value> {
        None
    }

    fn restore_state(&mut self, _state: serde_json::Value) -> Result<(), PaneError> {
        Ok(())
    }
}
