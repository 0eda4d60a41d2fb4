//! Error boundary between the pane manager and pane hooks.
//!
//! A misbehaving pane must degrade only itself. Every hook call goes through
//! one of these guards, which log failures and turn panics into `PaneError`s.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use super::PaneError;

/// Which pane hook was running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Initialize,
    Dispose,
    GainedFocus,
    LostFocus,
    VisualState,
    FocusTarget,
    SaveState,
    RestoreState,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Hook::Initialize => "initialize",
            Hook::Dispose => "dispose",
            Hook::GainedFocus => "on_gained_focus",
            Hook::LostFocus => "on_lost_focus",
            Hook::VisualState => "apply_visual_state",
            Hook::FocusTarget => "focus_target",
            Hook::SaveState => "save_state",
            Hook::RestoreState => "restore_state",
        };
        f.write_str(s)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run a fallible hook. Both `Err` returns and panics come back as `Err`.
pub fn guard<T>(
    pane: &str,
    hook: Hook,
    f: impl FnOnce() -> Result<T, PaneError>,
) -> Result<T, PaneError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => {
            tracing::warn!(pane, %hook, %error, "pane hook failed");
            Err(error)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(pane, %hook, %message, "pane hook panicked");
            Err(PaneError::Panicked { hook, message })
        }
    }
}

/// Run an infallible hook. Returns false if it panicked.
pub fn guard_call(pane: &str, hook: Hook, f: impl FnOnce()) -> bool {
    guard(pane, hook, || {
        f();
        Ok(())
    })
    .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_success() {
        assert_eq!(guard("p", Hook::Initialize, || Ok(7)), Ok(7));
    }

    #[test]
    fn passes_through_error() {
        let result: Result<(), _> = guard("p", Hook::Dispose, || Err(PaneError::failed("boom")));
        assert_eq!(result, Err(PaneError::failed("boom")));
    }

    #[test]
    fn converts_panic() {
        let result: Result<(), _> = guard("p", Hook::Initialize, || panic!("kaput"));
        assert_eq!(
            result,
            Err(PaneError::Panicked {
                hook: Hook::Initialize,
                message: "kaput".into()
            })
        );
    }

    #[test]
    fn converts_formatted_panic() {
        let result: Result<(), _> = guard("p", Hook::Dispose, || panic!("code {}", 3));
        assert!(matches!(
            result,
            Err(PaneError::Panicked { message, .. }) if message == "code 3"
        ));
    }

    #[test]
    fn guard_call_reports_panics() {
        assert!(guard_call("p", Hook::GainedFocus, || {}));
        assert!(!guard_call("p", Hook::LostFocus, || panic!("nope")));
    }
}
