use super::classifier::ContainerClassifier;
use super::types::{BuildFile, BuildGroup, Classification, Container, Microservice};
use crate::build::{group_build_files, locate_build_files};
use crate::compose::{
    collect_services, normalize, rank_manifests, select_manifest, DeclaredService,
    ManifestCandidate,
};
use crate::config::MinerConfig;
use crate::error::Result;
use crate::fs::{check_snapshot_root, FileSystem, RealFileSystem};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything the pipeline learned about one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub owner: String,
    pub repo: String,
    pub root: PathBuf,
    pub manifest: Option<PathBuf>,
    pub declared: Vec<DeclaredService>,
    pub containers: Vec<Container>,
    pub classification: Classification,
}

/// Runs the identification pipeline over snapshots read through `F`.
///
/// Holds no state between calls; every method is a pure function of the
/// snapshot and the configuration.
pub struct MicroserviceDetector<F: FileSystem> {
    fs: F,
    config: MinerConfig,
}

impl<F: FileSystem> MicroserviceDetector<F> {
    pub fn new(fs: F, config: MinerConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn rank_manifests(&self, root: &Path) -> Result<Vec<ManifestCandidate>> {
        rank_manifests(&self.fs, root, &self.config.selector)
    }

    pub fn select_manifest(&self, root: &Path) -> Result<Option<PathBuf>> {
        select_manifest(&self.fs, root, &self.config.selector)
    }

    /// Declared services of `manifest`; malformed manifests yield none
    pub fn collect_services(&self, manifest: &Path) -> Vec<DeclaredService> {
        collect_services(&self.fs, manifest, &self.config.collector)
    }

    pub fn normalize(&self, services: &[DeclaredService], root: &Path) -> Vec<Container> {
        normalize(services, root)
    }

    pub fn locate_build_files(&self, root: &Path) -> Result<Vec<BuildFile>> {
        locate_build_files(&self.fs, root, &self.config.locator)
    }

    pub fn group_build_files(&self, build_files: &[BuildFile]) -> Vec<BuildGroup> {
        group_build_files(build_files)
    }

    pub fn classify(
        &self,
        owner: &str,
        repo: &str,
        containers: &[Container],
        build_files: &[BuildFile],
    ) -> Classification {
        ContainerClassifier::new(&self.config.classifier, owner, repo)
            .classify(containers, build_files)
    }

    /// Containers declared by the snapshot's canonical manifest
    pub fn containers(&self, root: &Path) -> Result<Vec<Container>> {
        match self.select_manifest(root)? {
            Some(manifest) => {
                let declared = self.collect_services(&manifest);
                Ok(self.normalize(&declared, root))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Locates build files under `root` and classifies `containers` against them
    pub fn classify_snapshot(
        &self,
        owner: &str,
        repo: &str,
        root: &Path,
        containers: &[Container],
    ) -> Result<Classification> {
        check_snapshot_root(&self.fs, root)?;
        let build_files = self.locate_build_files(root)?;
        Ok(self.classify(owner, repo, containers, &build_files))
    }

    /// Microservices among `containers`, matched against the build files under `root`
    pub fn determine_microservices(
        &self,
        owner: &str,
        repo: &str,
        root: &Path,
        containers: &[Container],
    ) -> Result<BTreeSet<Microservice>> {
        Ok(self
            .classify_snapshot(owner, repo, root, containers)?
            .microservices)
    }

    /// Runs the whole pipeline, manifest selection included
    pub fn analyze(&self, owner: &str, repo: &str, root: &Path) -> Result<SnapshotReport> {
        check_snapshot_root(&self.fs, root)?;

        let manifest = self.select_manifest(root)?;
        let declared = match &manifest {
            Some(path) => self.collect_services(path),
            None => Vec::new(),
        };
        let containers = self.normalize(&declared, root);
        debug!(
            declared = declared.len(),
            containers = containers.len(),
            "Normalized declared services"
        );

        let classification = self.classify_snapshot(owner, repo, root, &containers)?;
        info!(
            owner,
            repo,
            microservices = classification.microservices.len(),
            "Analyzed snapshot"
        );

        Ok(SnapshotReport {
            owner: owner.to_string(),
            repo: repo.to_string(),
            root: root.to_path_buf(),
            manifest,
            declared,
            containers,
            classification,
        })
    }
}

impl MicroserviceDetector<RealFileSystem> {
    /// Detector over the real filesystem with built-in defaults
    pub fn baseline() -> Self {
        Self::new(RealFileSystem, MinerConfig::baseline())
    }
}

/// Microservices among `containers` of the checked-out repository `owner/name` at `root`
pub fn determine_microservices(
    owner: &str,
    name: &str,
    root: &Path,
    containers: &[Container],
) -> Result<BTreeSet<Microservice>> {
    MicroserviceDetector::baseline().determine_microservices(owner, name, root, containers)
}
