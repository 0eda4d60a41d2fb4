use std::fs;
use std::path::{Path, PathBuf};

use crate::model::TilingMode;
use crate::model::config::TileworkConfig;

use super::CONFIG_FILE;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for formatting-preserving edits.
pub fn read_config(dir: &Path) -> Result<(TileworkConfig, toml_edit::DocumentMut), ConfigError> {
    let path = config_path(dir);
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: TileworkConfig = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Load the config, falling back to defaults when the file does not exist.
/// A file that exists but does not parse is still an error.
pub fn load_config(dir: &Path) -> Result<TileworkConfig, ConfigError> {
    if !config_path(dir).exists() {
        return Ok(TileworkConfig::default());
    }
    read_config(dir).map(|(config, _)| config)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = config_path(dir);
    fs::write(&path, doc.to_string()).map_err(|e| ConfigError::WriteError { path, source: e })
}

/// Set `[layout] mode` in the config document
pub fn set_default_mode(doc: &mut toml_edit::DocumentMut, mode: TilingMode) {
    if !doc.contains_key("layout") {
        doc["layout"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["layout"]["mode"] = toml_edit::value(mode.as_str());
}
