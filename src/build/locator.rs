//! Build-definition file discovery

use super::dockerfile::file_copies_user_code;
use super::patterns::{is_build_file_name, is_excluded_path};
use crate::config::LocatorConfig;
use crate::detection::types::BuildFile;
use crate::error::{EngineError, Result};
use crate::fs::{check_snapshot_root, normalize_lexically, relative_to, FileSystem, SKIPPED_DIRS};
use std::path::Path;
use tracing::{debug, trace};

/// Every build-definition file under `root`, sorted by path.
///
/// Files under third-party or sample trees and near-empty placeholders are
/// left out. Unreadable subtrees are skipped.
pub fn locate_build_files<F: FileSystem>(
    fs: &F,
    root: &Path,
    config: &LocatorConfig,
) -> Result<Vec<BuildFile>> {
    check_snapshot_root(fs, root)?;

    let normalized_root = normalize_lexically(root);
    let files = fs
        .walk_files(root, SKIPPED_DIRS)
        .map_err(|source| EngineError::Io {
            path: root.to_path_buf(),
            source,
        })?;

    let mut build_files = Vec::new();
    for file in files {
        let Some(filename) = file.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_build_file_name(filename) {
            continue;
        }

        let path = normalize_lexically(&file);
        let Some(relative) = relative_to(&path, &normalized_root) else {
            continue;
        };
        if is_excluded_path(&relative) {
            trace!(path = %relative, "Skipping build file in excluded tree");
            continue;
        }

        match fs.metadata(&file) {
            Ok(meta) if meta.len() > config.empty_threshold => {}
            Ok(_) => {
                trace!(path = %relative, "Skipping empty build file");
                continue;
            }
            Err(e) => {
                debug!(path = %relative, error = %e, "Skipping unreadable build file");
                continue;
            }
        }

        let copies_code = file_copies_user_code(fs, &file);
        build_files.push(BuildFile {
            path,
            relative,
            copies_code,
        });
    }

    build_files.sort();
    debug!(count = build_files.len(), "Located build files");
    Ok(build_files)
}
