//! Error type for the command-line driver.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Locomotive error: {0}")]
    Loco(#[from] ls_core::LsError),

    #[error("Save error: {0}")]
    Save(#[from] ls_save::SaveError),

    #[error("Failed to read parameter file: {path}")]
    ParamsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid parameter file {path}: {source}")]
    ParamsParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unknown preset: {0} (try `ls-cli presets`)")]
    UnknownPreset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type CliResult<T> = Result<T, CliError>;
