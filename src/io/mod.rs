pub mod config_io;
pub mod logging;
pub mod state_io;
pub mod watcher;

use std::path::{Path, PathBuf};

/// Workspace directory holding config, state and log
pub const WORKSPACE_DIR: &str = ".tilework";
pub const CONFIG_FILE: &str = "config.toml";
pub const STATE_FILE: &str = "state.json";
pub const LOG_FILE: &str = "tilework.log";

/// Find the workspace by walking up from `start` looking for a `.tilework/`
/// directory. Returns the `.tilework/` path itself.
pub fn discover_workspace(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let dir = current.join(WORKSPACE_DIR);
        if dir.is_dir() {
            return Some(dir);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("no {WORKSPACE_DIR} workspace found from {} (try `tw init`)", start.display())]
pub struct NoWorkspace {
    pub start: PathBuf,
}

/// Like [`discover_workspace`], for commands that cannot run without one
pub fn require_workspace(start: &Path) -> Result<PathBuf, NoWorkspace> {
    discover_workspace(start).ok_or_else(|| NoWorkspace {
        start: start.to_path_buf(),
    })
}
