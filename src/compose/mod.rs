//! Orchestration manifests: selection, service collection and normalization

pub mod collector;
pub mod env_file;
pub mod error;
pub mod interpolate;
pub mod normalizer;
pub mod patterns;
pub mod selector;

pub use collector::{collect_services, try_collect_services, BuildSpec, DeclaredService};
pub use error::ComposeError;
pub use normalizer::normalize;
pub use selector::{rank_manifests, select_manifest, ManifestCandidate};
