//! msminer - microservice identification for container-orchestrated repositories
//!
//! Given a checked-out snapshot of a repository, msminer decides which of the
//! services declared in its docker-compose manifest are microservices built
//! from the repository's own code, as opposed to third-party containers
//! pulled from a registry.
//!
//! # Core Concepts
//!
//! - **Manifest selection**: one canonical compose file is picked among all
//!   recognized manifests of the snapshot
//! - **Containers**: declared services after `include`/`extends` resolution,
//!   interpolation and path normalization
//! - **Build files**: Dockerfile-like definitions found in the snapshot,
//!   grouped by directory
//! - **Classification**: containers are matched to build files by explicit
//!   path, then by image name, then by service name, each tier carrying its
//!   own [`Confidence`]
//!
//! # Example Usage
//!
//! ```no_run
//! use msminer::MicroserviceDetector;
//! use std::path::Path;
//!
//! let detector = MicroserviceDetector::baseline();
//! let report = detector.analyze("acme", "shop", Path::new("/tmp/shop"))?;
//!
//! for microservice in &report.classification.microservices {
//!     println!("{}", microservice);
//! }
//! # Ok::<(), msminer::EngineError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`compose`]: manifest selection, service collection and normalization
//! - [`build`]: build-file discovery and grouping
//! - [`detection`]: classification and the per-snapshot pipeline
//! - [`history`]: chunking of per-commit results

pub mod build;
pub mod cli;
pub mod compose;
pub mod config;
pub mod detection;
pub mod error;
pub mod fs;
pub mod history;
pub mod util;

pub use config::{ConfigError, MinerConfig};
pub use detection::types::{
    BuildFile, BuildGroup, Classification, Confidence, Container, Microservice,
};
pub use detection::{determine_microservices, MicroserviceDetector, SnapshotReport};
pub use error::EngineError;
pub use history::{ChunkTracker, CommitChunk};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_msminer() {
        assert_eq!(NAME, "msminer");
    }
}
