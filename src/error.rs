use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a single-snapshot classification call.
///
/// Everything else (malformed manifests, invalid services, unreadable
/// subtrees) is recovered inside the engine and only logged.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Snapshot root does not exist: {0}")]
    RootNotFound(PathBuf),
    #[error("Snapshot root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
