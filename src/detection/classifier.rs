//! Container classification against the build-file pool
//!
//! Explicit build paths are settled first, for every container, so a
//! verified match can never be pre-empted by a name-based one. The
//! remaining containers are then matched by image and by name, longest
//! identifying name first, each match consuming the whole build group.

use super::naming::{image_candidates, name_candidates, normalize_name, ordered_candidates};
use super::types::{BuildFile, BuildGroup, Classification, Confidence, Container, Microservice};
use crate::build::group_build_files;
use crate::config::ClassifierConfig;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of claiming an explicit build-definition path
enum ExactClaim {
    Claimed(BuildFile),
    /// No located build file has this path
    Absent,
    /// The file exists but was already claimed or does not copy code
    Rejected,
}

/// Unconsumed build groups plus the individual files already claimed
struct BuildPool {
    groups: Vec<BuildGroup>,
    consumed: Vec<bool>,
    claimed: BTreeSet<PathBuf>,
}

impl BuildPool {
    fn new(build_files: &[BuildFile]) -> Self {
        let groups = group_build_files(build_files);
        let consumed = vec![false; groups.len()];
        Self {
            groups,
            consumed,
            claimed: BTreeSet::new(),
        }
    }

    /// Claims the exact file at `path`, consuming its group
    fn claim_exact(&mut self, path: &Path, require_code_copy: bool) -> ExactClaim {
        let found = self.groups.iter().enumerate().find_map(|(index, group)| {
            group
                .members
                .iter()
                .find(|m| m.path.as_path() == path)
                .map(|m| (index, m.clone()))
        });
        let Some((index, file)) = found else {
            return ExactClaim::Absent;
        };
        if self.claimed.contains(path) || (require_code_copy && !file.copies_code) {
            return ExactClaim::Rejected;
        }

        self.consumed[index] = true;
        self.claimed.insert(file.path.clone());
        ExactClaim::Claimed(file)
    }

    /// Finds the single group whose directory matches one of `candidates`,
    /// trying longer candidates first
    fn find_by_name(&self, candidates: &[String], require_code_copy: bool) -> Option<usize> {
        let eligible: Vec<(usize, String)> = self
            .groups
            .iter()
            .enumerate()
            .filter(|(index, group)| {
                !self.consumed[*index]
                    && !group.directory().is_empty()
                    && group.representative(require_code_copy).is_some()
            })
            .map(|(index, group)| (index, normalize_name(group.directory())))
            .collect();

        for candidate in candidates {
            let hits: Vec<&(usize, String)> = eligible
                .iter()
                .filter(|(_, dir)| dir.contains(candidate.as_str()))
                .collect();

            match hits.len() {
                0 => continue,
                1 => return Some(hits[0].0),
                _ => {
                    let narrowed: Vec<&&(usize, String)> = hits
                        .iter()
                        .filter(|(_, dir)| dir.rsplit('/').next() == Some(candidate.as_str()))
                        .collect();
                    if narrowed.len() == 1 {
                        return Some(narrowed[0].0);
                    }
                }
            }
        }
        None
    }

    fn claim_group(&mut self, index: usize, require_code_copy: bool) -> Option<BuildFile> {
        let file = self.groups[index].representative(require_code_copy)?.clone();
        self.consumed[index] = true;
        self.claimed.insert(file.path.clone());
        Some(file)
    }

    fn split(self) -> (BTreeSet<BuildFile>, BTreeSet<BuildFile>) {
        let mut consumed = BTreeSet::new();
        let mut leftover = BTreeSet::new();
        for (group, is_consumed) in self.groups.into_iter().zip(self.consumed) {
            let target = if is_consumed {
                &mut consumed
            } else {
                &mut leftover
            };
            target.extend(group.members);
        }
        (consumed, leftover)
    }
}

/// Matches containers to build files for one repository
pub struct ContainerClassifier<'a> {
    config: &'a ClassifierConfig,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> ContainerClassifier<'a> {
    pub fn new(config: &'a ClassifierConfig, owner: &'a str, repo: &'a str) -> Self {
        Self {
            config,
            owner,
            repo,
        }
    }

    fn attempts(&self, tier: Confidence) -> bool {
        tier >= self.config.min_confidence
    }

    pub fn classify(&self, containers: &[Container], build_files: &[BuildFile]) -> Classification {
        let mut pool = BuildPool::new(build_files);
        let require_code_copy = self.config.require_code_copy;

        // Stable sort keeps declaration order among equally long names.
        let mut order: Vec<usize> = (0..containers.len()).collect();
        order.sort_by(|a, b| {
            containers[*b]
                .identifying_name()
                .len()
                .cmp(&containers[*a].identifying_name().len())
        });

        let mut matched: Vec<Option<Microservice>> = vec![None; containers.len()];

        for &index in &order {
            let container = &containers[index];
            let Some(dockerfile) = &container.build_dockerfile else {
                continue;
            };

            match pool.claim_exact(dockerfile, require_code_copy) {
                ExactClaim::Claimed(file) => {
                    debug!(service = %container.name, build = %file, "Verified build");
                    matched[index] =
                        Some(microservice(container, Some(file), Confidence::BuildVerified));
                }
                ExactClaim::Absent
                    if self.config.accept_unverified && self.attempts(Confidence::BuildUnverified) =>
                {
                    debug!(
                        service = %container.name,
                        dockerfile = %dockerfile.display(),
                        "Explicit build file not in snapshot"
                    );
                    matched[index] = Some(microservice(container, None, Confidence::BuildUnverified));
                }
                ExactClaim::Absent => {}
                ExactClaim::Rejected => {
                    debug!(
                        service = %container.name,
                        dockerfile = %dockerfile.display(),
                        "Explicit build file not claimable"
                    );
                }
            }
        }

        if self.attempts(Confidence::BuildImageMatched) {
            for &index in &order {
                let container = &containers[index];
                if matched[index].is_some() || container.build_dockerfile.is_some() {
                    continue;
                }
                matched[index] = self.match_by_name(container, &mut pool);
            }
        }

        let mut classification = Classification::default();
        for (container, result) in containers.iter().zip(matched) {
            match result {
                Some(ms) => {
                    classification.microservices.insert(ms);
                }
                None => {
                    classification.leftover_containers.insert(container.clone());
                }
            }
        }

        let (consumed, leftover) = pool.split();
        classification.consumed_build_files = consumed;
        classification.leftover_build_files = leftover;

        info!(
            microservices = classification.microservices.len(),
            leftover_containers = classification.leftover_containers.len(),
            leftover_build_files = classification.leftover_build_files.len(),
            "Classified snapshot"
        );
        classification
    }

    fn match_by_name(&self, container: &Container, pool: &mut BuildPool) -> Option<Microservice> {
        let require_code_copy = self.config.require_code_copy;

        if let Some(image) = &container.image {
            let candidates = ordered_candidates(image_candidates(image, self.owner, self.repo));
            if let Some(group) = pool.find_by_name(&candidates, require_code_copy) {
                let file = pool.claim_group(group, require_code_copy)?;
                debug!(service = %container.name, build = %file, "Matched build by image");
                return Some(microservice(container, Some(file), Confidence::BuildImageMatched));
            }
        }

        if !self.attempts(Confidence::BuildNameMatched) {
            return None;
        }

        let mut names = name_candidates(&container.name);
        if let Some(container_name) = &container.container_name {
            names.extend(name_candidates(container_name));
        }
        let candidates = ordered_candidates(names);
        let group = pool.find_by_name(&candidates, require_code_copy)?;
        let file = pool.claim_group(group, require_code_copy)?;
        debug!(service = %container.name, build = %file, "Matched build by name");
        Some(microservice(container, Some(file), Confidence::BuildNameMatched))
    }
}

fn microservice(container: &Container, build: Option<BuildFile>, confidence: Confidence) -> Microservice {
    Microservice {
        name: container.service_name().to_string(),
        build,
        image: container.image.clone(),
        container_name: container.container_name.clone(),
        confidence,
    }
}

/// Classifies `containers` against `build_files` of the repository `owner/repo`
pub fn classify(
    containers: &[Container],
    build_files: &[BuildFile],
    owner: &str,
    repo: &str,
    config: &ClassifierConfig,
) -> Classification {
    ContainerClassifier::new(config, owner, repo).classify(containers, build_files)
}
