use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::geometry::{SizeConstraint, TilingMode};

/// Configuration from .tilework/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileworkConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Default: see the config template in cli::handlers
    #[serde(default)]
    pub mode: TilingMode,
    #[serde(default = "default_min_width")]
    pub min_width: u16,
    #[serde(default = "default_min_height")]
    pub min_height: u16,
    /// Cells moved per resize key press
    #[serde(default = "default_resize_step")]
    pub resize_step: u16,
}

impl LayoutConfig {
    pub fn size_constraint(&self) -> SizeConstraint {
        SizeConstraint {
            min_width: self.min_width,
            min_height: self.min_height,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            mode: TilingMode::Auto,
            min_width: default_min_width(),
            min_height: default_min_height(),
            resize_step: default_resize_step(),
        }
    }
}

fn default_min_width() -> u16 {
    SizeConstraint::default().min_width
}

fn default_min_height() -> u16 {
    SizeConstraint::default().min_height
}

fn default_resize_step() -> u16 {
    4
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Save the pane layout on exit and restore it on startup
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        StateConfig { autosave: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Directory listed by the files pane. Relative to the workspace root.
    #[serde(default)]
    pub files_root: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: TileworkConfig = toml::from_str("").unwrap();
        assert_eq!(config.layout.mode, TilingMode::Auto);
        assert_eq!(config.layout.min_width, 12);
        assert_eq!(config.layout.min_height, 4);
        assert_eq!(config.layout.resize_step, 4);
        assert!(config.state.autosave);
        assert!(!config.ui.show_key_hints);
        assert!(config.ui.files_root.is_none());
    }

    #[test]
    fn partial_layout_table() {
        let config: TileworkConfig = toml::from_str(
            r#"
[layout]
mode = "master-stack"
min_width = 20

[state]
autosave = false
"#,
        )
        .unwrap();
        assert_eq!(config.layout.mode, TilingMode::MasterStack);
        assert_eq!(
            config.layout.size_constraint(),
            SizeConstraint {
                min_width: 20,
                min_height: 4
            }
        );
        assert!(!config.state.autosave);
    }
}
