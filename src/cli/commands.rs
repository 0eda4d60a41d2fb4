use clap::{Args, Parser, Subcommand};

use crate::model::TilingMode;

#[derive(Parser)]
#[command(name = "tw", about = concat!("tilework v", env!("CARGO_PKG_VERSION"), " - tiling panes for the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .tilework/ with a commented config in the current directory
    Init(InitArgs),
    /// Compute a layout without opening the TUI
    Layout(LayoutArgs),
    /// Summarize the saved pane layout
    State,
    /// Read or change configuration
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Default tiling mode written to config.toml
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<TilingMode>,
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Tiling mode (auto, grid, tall, wide, master-stack)
    #[arg(long, default_value = "auto", value_parser = parse_mode)]
    pub mode: TilingMode,
    /// Number of panes to lay out
    #[arg(long)]
    pub panes: usize,
    /// Container width in cells
    #[arg(long, default_value_t = 120)]
    pub width: u16,
    /// Container height in cells
    #[arg(long, default_value_t = 40)]
    pub height: u16,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the default tiling mode, or set it
    Mode {
        #[arg(value_parser = parse_mode)]
        mode: Option<TilingMode>,
    },
}

fn parse_mode(s: &str) -> Result<TilingMode, String> {
    s.parse().map_err(|e: crate::model::ParseModeError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layout_args() {
        let cli = Cli::try_parse_from(["tw", "layout", "--mode", "master-stack", "--panes", "5"])
            .unwrap();
        match cli.command {
            Some(Commands::Layout(args)) => {
                assert_eq!(args.mode, TilingMode::MasterStack);
                assert_eq!(args.panes, 5);
                assert_eq!((args.width, args.height), (120, 40));
            }
            _ => panic!("expected layout"),
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["tw", "layout", "--mode", "spiral", "--panes", "2"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tw", "state", "--json", "-C", "/tmp/x"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.project_dir.as_deref(), Some("/tmp/x"));
    }

    #[test]
    fn config_mode_is_optional() {
        let cli = Cli::try_parse_from(["tw", "config", "mode"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config(ConfigCmd {
                action: ConfigAction::Mode { mode: None }
            }))
        ));
    }
}
