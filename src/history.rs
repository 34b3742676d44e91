//! Folding per-commit classifications into runs of identical results

use crate::detection::{BuildFile, Classification, Container, Microservice};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// A run of consecutive commits that share the same classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitChunk {
    pub from_index: usize,
    pub to_index: usize,
    pub from_commit: String,
    pub to_commit: String,
    pub microservices: BTreeSet<Microservice>,
    pub leftover_containers: BTreeSet<Container>,
    pub leftover_build_files: BTreeSet<BuildFile>,
}

impl CommitChunk {
    fn open(index: usize, commit_id: &str, classification: &Classification) -> Self {
        Self {
            from_index: index,
            to_index: index,
            from_commit: commit_id.to_string(),
            to_commit: commit_id.to_string(),
            microservices: classification.microservices.clone(),
            leftover_containers: classification.leftover_containers.clone(),
            leftover_build_files: classification.leftover_build_files.clone(),
        }
    }

    fn matches(&self, classification: &Classification) -> bool {
        self.microservices == classification.microservices
            && self.leftover_containers == classification.leftover_containers
            && self.leftover_build_files == classification.leftover_build_files
    }

    /// Number of commits covered
    pub fn commit_count(&self) -> usize {
        self.to_index - self.from_index + 1
    }
}

/// Records classifications in commit order.
///
/// Commits are indexed from zero in the order they are recorded.
#[derive(Debug, Default)]
pub struct ChunkTracker {
    chunks: Vec<CommitChunk>,
    counts: Vec<usize>,
}

impl ChunkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, commit_id: &str, classification: &Classification) {
        let index = self.counts.len();
        self.counts.push(classification.count());

        match self.chunks.last_mut() {
            Some(current) if current.matches(classification) => {
                current.to_index = index;
                current.to_commit = commit_id.to_string();
            }
            _ => {
                debug!(
                    commit = commit_id,
                    index,
                    microservices = classification.count(),
                    "Opening commit chunk"
                );
                self.chunks
                    .push(CommitChunk::open(index, commit_id, classification));
            }
        }
    }

    /// Microservice count of every recorded commit
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn commits(&self) -> usize {
        self.counts.len()
    }

    pub fn finish(self) -> Vec<CommitChunk> {
        self.chunks
    }
}
