use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::{RegionKey, TilingMode};

/// Persisted snapshot of the open panes and the layout around them.
///
/// Produced by `PaneManager::get_state`, consumed by `PaneManager::restore_state`
/// together with panes the caller has already constructed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaneManagerState {
    /// Open panes in layout order
    #[serde(default)]
    pub panes: Vec<SavedPane>,
    #[serde(default)]
    pub mode: TilingMode,
    /// Explicit track weights set by manual resizing
    #[serde(default)]
    pub size_overrides: Vec<SizeOverride>,
    /// Index into `panes` of the pane that had focus
    #[serde(default)]
    pub focused: Option<usize>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

/// One saved pane: its type identifier and whatever the pane chose to save.
/// The blob is opaque here and handed back to the pane untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPane {
    pub kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub state: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeOverride {
    pub region: RegionKey,
    pub size: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::Axis;

    #[test]
    fn minimal_object_uses_defaults() {
        let state: PaneManagerState = serde_json::from_str("{}").unwrap();
        assert!(state.panes.is_empty());
        assert_eq!(state.mode, TilingMode::Auto);
        assert!(state.size_overrides.is_empty());
        assert!(state.focused.is_none());
        assert!(state.saved_at.is_none());
    }

    #[test]
    fn json_layout() {
        let state = PaneManagerState {
            panes: vec![
                SavedPane {
                    kind: "notes".into(),
                    state: serde_json::json!({"body": "hi"}),
                },
                SavedPane {
                    kind: "clock".into(),
                    state: serde_json::Value::Null,
                },
            ],
            mode: TilingMode::MasterStack,
            size_overrides: vec![SizeOverride {
                region: RegionKey::new(TilingMode::MasterStack, Axis::Columns, 0),
                size: 1.5,
            }],
            focused: Some(1),
            saved_at: None,
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["mode"], "master-stack");
        assert_eq!(value["panes"][0]["kind"], "notes");
        assert_eq!(value["panes"][0]["state"]["body"], "hi");
        assert!(value["panes"][1].get("state").is_none());
        assert_eq!(value["size_overrides"][0]["region"], "master-stack/col/0");

        let back: PaneManagerState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }
}
