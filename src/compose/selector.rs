//! Manifest selection across a snapshot tree

use super::patterns::{filename_tier, in_keyword_directories, is_manifest_file};
use crate::config::SelectorConfig;
use crate::error::{EngineError, Result};
use crate::fs::{check_snapshot_root, FileSystem, SKIPPED_DIRS};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A manifest eligible for selection.
///
/// Field order is the ordering key: filename tier, then depth below the
/// snapshot root, then path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ManifestCandidate {
    pub tier: usize,
    pub depth: usize,
    pub path: PathBuf,
}

/// Every eligible manifest under `root`, most canonical first
pub fn rank_manifests<F: FileSystem>(
    fs: &F,
    root: &Path,
    config: &SelectorConfig,
) -> Result<Vec<ManifestCandidate>> {
    check_snapshot_root(fs, root)?;

    let files = fs
        .walk_files(root, SKIPPED_DIRS)
        .map_err(|source| EngineError::Io {
            path: root.to_path_buf(),
            source,
        })?;

    let mut candidates: Vec<ManifestCandidate> = files
        .into_iter()
        .filter_map(|path| candidate_for(root, path, config))
        .collect();

    candidates.sort();
    Ok(candidates)
}

/// Picks the canonical manifest of a snapshot, if any
pub fn select_manifest<F: FileSystem>(
    fs: &F,
    root: &Path,
    config: &SelectorConfig,
) -> Result<Option<PathBuf>> {
    let candidates = rank_manifests(fs, root, config)?;
    let selected = candidates.into_iter().next().map(|c| c.path);

    match &selected {
        Some(path) => info!(manifest = %path.display(), "Selected manifest"),
        None => info!(root = %root.display(), "No manifest found"),
    }

    Ok(selected)
}

fn candidate_for(root: &Path, path: PathBuf, config: &SelectorConfig) -> Option<ManifestCandidate> {
    let filename = path.file_name()?.to_str()?;
    if !is_manifest_file(filename) {
        return None;
    }

    let Some(tier) = filename_tier(filename) else {
        debug!(path = %path.display(), "Rejecting manifest with unrecognized name");
        return None;
    };

    let relative_dir = path.parent()?.strip_prefix(root).ok()?;
    if config.require_dir_keywords && !in_keyword_directories(relative_dir) {
        debug!(path = %path.display(), "Rejecting manifest outside keyword directories");
        return None;
    }

    Some(ManifestCandidate {
        tier,
        depth: relative_dir.components().count(),
        path,
    })
}
