use crate::detection::types::{BuildFile, BuildGroup};
use std::collections::BTreeMap;

/// Collapses build files sharing a directory into one group each.
///
/// The canonical member is the smallest path of the directory, so a plain
/// `Dockerfile` represents its `Dockerfile.*` siblings. Groups come out in
/// directory order.
pub fn group_build_files(build_files: &[BuildFile]) -> Vec<BuildGroup> {
    let mut by_directory: BTreeMap<&str, Vec<BuildFile>> = BTreeMap::new();
    for file in build_files {
        by_directory
            .entry(file.directory())
            .or_default()
            .push(file.clone());
    }

    by_directory
        .into_values()
        .filter_map(|mut members| {
            members.sort();
            let canonical = members.first()?.clone();
            Some(BuildGroup { canonical, members })
        })
        .collect()
}

/// Canonical representatives only
pub fn canonical_build_files(groups: &[BuildGroup]) -> Vec<BuildFile> {
    groups.iter().map(|g| g.canonical.clone()).collect()
}
