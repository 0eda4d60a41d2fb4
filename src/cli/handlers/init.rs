use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::{self as ws, config_io};
use crate::model::TilingMode;

const CONFIG_TOML_TEMPLATE: &str = r##"# tilework configuration

[layout]
# auto, grid, tall, wide or master-stack.
# auto picks grid, tall or master-stack from the number of open panes.
mode = "auto"

# Smallest size of any tile, in terminal cells
min_width = 12
min_height = 4

# Cells moved per Alt+</> or Alt+-/+ press
resize_step = 4

[state]
# Save the open panes on exit and bring them back on the next start
autosave = true

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# show_key_hints = false
#
# # directory listed by the files pane, relative to the workspace root
# files_root = "."
#
# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# text_bright = "#FFFFFF"
# dim = "#7D78BF"
# border = "#3D356B"
# border_active = "#FB4196"
# accent = "#44DDFF"
# error = "#FF4444"
# status_bg = "#1A0E33"
"##;

/// Config text for a new workspace, with `[layout] mode` set when asked
fn render_config_toml(mode: Option<TilingMode>) -> Result<String, config_io::ConfigError> {
    let Some(mode) = mode else {
        return Ok(CONFIG_TOML_TEMPLATE.to_string());
    };
    let mut doc: toml_edit::DocumentMut = CONFIG_TOML_TEMPLATE.parse()?;
    config_io::set_default_mode(&mut doc, mode);
    Ok(doc.to_string())
}

pub fn cmd_init(args: InitArgs, start: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let dir = start.join(ws::WORKSPACE_DIR);
    let config_path = config_io::config_path(&dir);

    if config_path.exists() && !args.force {
        return Err(format!(
            "workspace already exists at {} (use --force to overwrite config.toml)",
            dir.display()
        )
        .into());
    }

    // Nested workspaces are allowed but easy to create by accident
    if let Some(parent) = start.parent()
        && let Some(outer) = ws::discover_workspace(parent)
    {
        eprintln!("Note: enclosing workspace found at {}/", outer.display());
        eprintln!("Creating new workspace in {}/", dir.display());
    }

    fs::create_dir_all(&dir)?;
    fs::write(&config_path, render_config_toml(args.mode)?)?;

    println!("Initialized tilework workspace: {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TileworkConfig;
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_defaults() {
        let config: TileworkConfig = toml::from_str(CONFIG_TOML_TEMPLATE).unwrap();
        let defaults = TileworkConfig::default();
        assert_eq!(config.layout.mode, defaults.layout.mode);
        assert_eq!(config.layout.min_width, defaults.layout.min_width);
        assert_eq!(config.layout.min_height, defaults.layout.min_height);
        assert_eq!(config.layout.resize_step, defaults.layout.resize_step);
        assert!(config.state.autosave);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn mode_is_written_in_place() {
        let text = render_config_toml(Some(TilingMode::MasterStack)).unwrap();
        assert!(text.contains("mode = \"master-stack\""));
        assert!(!text.contains("mode = \"auto\""));
        // comments survive the edit
        assert!(text.contains("# [ui.colors]"));
        let config: TileworkConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.layout.mode, TilingMode::MasterStack);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let args = || InitArgs {
            mode: None,
            force: false,
        };
        cmd_init(args(), tmp.path()).unwrap();
        assert!(cmd_init(args(), tmp.path()).is_err());

        let forced = InitArgs {
            mode: Some(TilingMode::Wide),
            force: true,
        };
        cmd_init(forced, tmp.path()).unwrap();
        let config = config_io::load_config(&tmp.path().join(ws::WORKSPACE_DIR)).unwrap();
        assert_eq!(config.layout.mode, TilingMode::Wide);
    }
}
