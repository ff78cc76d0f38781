use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read PDF {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Snapshot service failed for {doc}: {message}")]
    SnapshotService { doc: String, message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
