//! FileSystem abstraction for read-only snapshot access

mod mock;
mod real;
mod r#trait;

pub use mock::MockFileSystem;
pub use r#trait::{FileMetadata, FileSystem, FileType};
pub use real::RealFileSystem;

use crate::error::{EngineError, Result as EngineResult};
use std::path::{Component, Path, PathBuf};

/// Directories never walked while scanning a snapshot
pub const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// Ensures the snapshot root exists and is a directory
pub fn check_snapshot_root<F: FileSystem>(fs: &F, root: &Path) -> EngineResult<()> {
    if !fs.exists(root) {
        return Err(EngineError::RootNotFound(root.to_path_buf()));
    }
    if !fs.is_dir(root) {
        return Err(EngineError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if at_root && path.is_absolute() {
                    continue;
                }
                if at_root || normalized.ends_with("..") {
                    normalized.push("..");
                } else {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Snapshot-relative form of `path` with forward slashes, if it lies under `root`
pub fn relative_to(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/repo/./deploy/../orders")),
            PathBuf::from("/repo/orders")
        );
        assert_eq!(
            normalize_lexically(Path::new("/repo/a/b/../../c/./Dockerfile")),
            PathBuf::from("/repo/c/Dockerfile")
        );
    }

    #[test]
    fn test_normalize_lexically_escaping() {
        assert_eq!(
            normalize_lexically(Path::new("/repo/../../etc")),
            PathBuf::from("/etc")
        );
        assert_eq!(
            normalize_lexically(Path::new("a/../../b")),
            PathBuf::from("../b")
        );
    }

    #[test]
    fn test_check_snapshot_root() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("README.md", "hi");

        assert!(check_snapshot_root(&fs, Path::new("/repo")).is_ok());
        assert!(matches!(
            check_snapshot_root(&fs, Path::new("/missing")),
            Err(EngineError::RootNotFound(_))
        ));
        assert!(matches!(
            check_snapshot_root(&fs, Path::new("/repo/README.md")),
            Err(EngineError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/repo/services/api/Dockerfile"), Path::new("/repo")),
            Some("services/api/Dockerfile".to_string())
        );
        assert_eq!(relative_to(Path::new("/other/Dockerfile"), Path::new("/repo")), None);
    }
}
