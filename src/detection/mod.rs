//! Microservice identification: types, candidate naming, classification and
//! the per-snapshot pipeline

pub mod classifier;
pub mod engine;
pub mod naming;
pub mod types;

pub use classifier::{classify, ContainerClassifier};
pub use engine::{determine_microservices, MicroserviceDetector, SnapshotReport};
pub use types::{BuildFile, BuildGroup, Classification, Confidence, Container, Microservice};
