use std::path::PathBuf;
use thiserror::Error;

/// Reasons a manifest cannot be turned into declared services.
///
/// All of these are recovered by [`collect_services`](super::collect_services):
/// the manifest is treated as absent and the error is logged.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Manifest {0} is not a mapping")]
    NotAMapping(PathBuf),

    #[error("Service '{service}' in {path} is invalid: {source}")]
    InvalidService {
        service: String,
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Service '{service}' extends '{base}', which is not declared in {path}")]
    MissingBaseService {
        service: String,
        base: String,
        path: PathBuf,
    },

    #[error("Service '{service}' extends a service from absolute path {file}")]
    AbsoluteExtendsFile { service: String, file: String },

    #[error("Service '{service}' in {path} extends itself")]
    ExtendsCycle { service: String, path: PathBuf },

    #[error("Manifest {0} includes itself")]
    IncludeCycle(PathBuf),

    #[error("Manifest {path} is nested deeper than {limit} levels")]
    IncludeTooDeep { path: PathBuf, limit: usize },
}
