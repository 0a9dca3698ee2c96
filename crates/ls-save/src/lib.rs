//! ls-save: save file formats for locomotive state.
//!
//! The versioned schema is written as JSON or YAML. The flat legacy layout
//! can be read and written, and is upgraded to the current schema on load.

pub mod legacy;
pub mod migrate;
pub mod schema;

pub use migrate::{SAVE_VERSION, migrate_to_latest};
pub use schema::SaveFile;

use std::path::Path;

pub type SaveResult<T> = Result<T, SaveError>;

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("Unsupported save version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Legacy save has {found} bytes, expected {expected}")]
    LegacyLength { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> SaveResult<SaveFile> {
    let content = std::fs::read_to_string(path)?;
    let save: SaveFile = serde_yaml::from_str(&content)?;
    migrate_to_latest(save)
}

pub fn save_yaml(path: &Path, save: &SaveFile) -> SaveResult<()> {
    let content = serde_yaml::to_string(save)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> SaveResult<SaveFile> {
    let content = std::fs::read_to_string(path)?;
    let save: SaveFile = serde_json::from_str(&content)?;
    migrate_to_latest(save)
}

pub fn save_json(path: &Path, save: &SaveFile) -> SaveResult<()> {
    let content = serde_json::to_string_pretty(save)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_legacy(path: &Path) -> SaveResult<SaveFile> {
    let bytes = std::fs::read(path)?;
    migrate_to_latest(legacy::decode_save(&bytes)?)
}

pub fn save_legacy(path: &Path, save: &SaveFile) -> SaveResult<()> {
    std::fs::write(path, legacy::encode(&save.state))?;
    Ok(())
}

/// Load by extension: `.json`, `.yaml`/`.yml`, anything else as legacy binary.
pub fn load_any(path: &Path) -> SaveResult<SaveFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        Some("yaml" | "yml") => load_yaml(path),
        _ => load_legacy(path),
    }
}

pub fn save_any(path: &Path, save: &SaveFile) -> SaveResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => save_json(path, save),
        Some("yaml" | "yml") => save_yaml(path, save),
        _ => save_legacy(path, save),
    }
}
