mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use ratatui::layout::Rect;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{self as ws, config_io, state_io};
use crate::layout::{PlacementHint, TilingLayoutEngine};
use crate::model::{PaneId, TilingMode};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let start = start_dir(cli.project_dir.as_deref())?;

    match cli.command {
        None => crate::tui::run(Some(&*start.to_string_lossy())),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, &start),
            Commands::Layout(args) => cmd_layout(args, &start, json),
            Commands::State => cmd_state(&start, json),
            Commands::Config(ConfigCmd {
                action: ConfigAction::Mode { mode },
            }) => cmd_config_mode(mode, &start, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory commands run against: the -C path, or the current directory
fn start_dir(project_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match project_dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_layout(args: LayoutArgs, start: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Minimum tile sizes come from the workspace config when there is one
    let constraint = match ws::discover_workspace(start) {
        Some(dir) => config_io::load_config(&dir)?.layout.size_constraint(),
        None => Default::default(),
    };

    let mut engine = TilingLayoutEngine::new(args.mode, constraint);
    engine.set_area(Rect::new(0, 0, args.width, args.height));
    for id in 1..=args.panes as u64 {
        engine.add_pane(PaneId(id), PlacementHint::default())?;
    }
    let snapshot = engine.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&layout_json(&snapshot))?);
    } else {
        println!("{}", format_layout(&snapshot));
    }
    Ok(())
}

fn cmd_state(start: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = ws::require_workspace(start)?;
    let state = state_io::read_state(&dir);

    match (state, json) {
        (Some(state), true) => println!("{}", serde_json::to_string_pretty(&state_json(&state))?),
        (Some(state), false) => println!("{}", format_state(&state)),
        (None, true) => println!("null"),
        (None, false) => println!("no saved state"),
    }
    Ok(())
}

fn cmd_config_mode(
    mode: Option<TilingMode>,
    start: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = ws::require_workspace(start)?;

    let current = match mode {
        None => config_io::load_config(&dir)?.layout.mode,
        Some(mode) => {
            let (_, mut doc) = config_io::read_config(&dir)?;
            config_io::set_default_mode(&mut doc, mode);
            config_io::write_config(&dir, &doc)?;
            mode
        }
    };

    if json {
        println!("{}", serde_json::json!({ "mode": current }));
    } else {
        println!("{current}");
    }
    Ok(())
}
