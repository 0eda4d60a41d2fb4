use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::PaneManagerState;

use super::STATE_FILE;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("could not serialize pane state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
}

pub fn state_path(dir: &Path) -> PathBuf {
    dir.join(STATE_FILE)
}

/// Read the saved pane layout. A missing or unreadable snapshot is `None`;
/// the caller starts from an empty layout.
pub fn read_state(dir: &Path) -> Option<PaneManagerState> {
    let path = state_path(dir);
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed state file");
            None
        }
    }
}

/// Write the pane layout snapshot
pub fn write_state(dir: &Path, state: &PaneManagerState) -> Result<(), StateError> {
    let path = state_path(dir);
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&path, content.as_bytes()).map_err(|e| StateError::WriteError { path, source: e })
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Axis, RegionKey, SavedPane, SizeOverride, TilingMode};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = PaneManagerState {
            panes: vec![
                SavedPane {
                    kind: "notes".into(),
                    state: serde_json::json!({"text": "hello"}),
                },
                SavedPane {
                    kind: "clock".into(),
                    state: serde_json::Value::Null,
                },
            ],
            mode: TilingMode::Tall,
            size_overrides: vec![SizeOverride {
                region: RegionKey::new(TilingMode::Tall, Axis::Columns, 0),
                size: 1.25,
            }],
            focused: Some(1),
            saved_at: None,
        };

        write_state(dir.path(), &state).unwrap();
        let loaded = read_state(dir.path()).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_state(dir.path()).is_none());
    }

    #[test]
    fn malformed_file_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(state_path(dir.path()), "{ not json").unwrap();
        assert!(read_state(dir.path()).is_none());
    }

    #[test]
    fn overwrite_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        write_state(dir.path(), &PaneManagerState::default()).unwrap();
        write_state(dir.path(), &PaneManagerState::default()).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
