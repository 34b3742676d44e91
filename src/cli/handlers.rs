use super::commands::{DetectArgs, ManifestsArgs};
use super::output::OutputFormatter;
use crate::config::MinerConfig;
use crate::detection::MicroserviceDetector;
use crate::fs::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub fn handle_detect(args: &DetectArgs) -> i32 {
    info!("Starting microservice identification");

    let root = match resolve_snapshot(args.repository_path.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    let config = detect_config(args);
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your MSMINER_* environment variables and command-line arguments.");
        return 1;
    }
    debug!(config = ?config.classifier, "Classifier configuration");

    let repo = args
        .repo
        .clone()
        .unwrap_or_else(|| directory_name(&root));

    let detector = MicroserviceDetector::new(RealFileSystem, config);
    let report = match detector.analyze(&args.owner, &repo, &root) {
        Ok(report) => report,
        Err(e) => {
            error!("Identification failed: {}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_report(&report, args.leftovers) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}

pub fn handle_manifests(args: &ManifestsArgs) -> i32 {
    let root = match resolve_snapshot(args.repository_path.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    let detector = MicroserviceDetector::new(RealFileSystem, MinerConfig::default());
    let candidates = match detector.rank_manifests(&root) {
        Ok(candidates) => candidates,
        Err(e) => {
            error!("Manifest ranking failed: {}", e);
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_manifests(&root, &candidates) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}

fn detect_config(args: &DetectArgs) -> MinerConfig {
    let mut config = MinerConfig::default();
    if let Some(tier) = args.min_confidence {
        config.classifier.min_confidence = tier;
    }
    if args.accept_unverified {
        config.classifier.accept_unverified = true;
    }
    if args.require_code_copy {
        config.classifier.require_code_copy = true;
    }
    config
}

/// Absolute, symlink-free snapshot root
fn resolve_snapshot(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    debug!(path = %path.display(), "Snapshot path");

    if !path.exists() {
        anyhow::bail!("Snapshot path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("Snapshot path is not a directory: {}", path.display());
    }

    RealFileSystem.canonicalize(&path)
}

fn directory_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use crate::detection::Confidence;
    use serial_test::serial;
    use tempfile::TempDir;

    fn detect_args(path: PathBuf) -> DetectArgs {
        DetectArgs {
            repository_path: Some(path),
            owner: "acme".to_string(),
            repo: None,
            format: OutputFormatArg::Json,
            min_confidence: Some(Confidence::BuildVerified),
            accept_unverified: true,
            require_code_copy: false,
            leftovers: false,
        }
    }

    #[test]
    fn test_resolve_snapshot() {
        let temp = TempDir::new().unwrap();
        let resolved = resolve_snapshot(Some(temp.path())).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolve_snapshot(Some(&temp.path().join("missing"))).is_err());
    }

    #[test]
    fn test_directory_name() {
        assert_eq!(directory_name(Path::new("/work/shop")), "shop");
        assert_eq!(directory_name(Path::new("/")), "");
    }

    #[test]
    #[serial]
    fn test_detect_config_overrides() {
        let config = detect_config(&detect_args(PathBuf::from("/tmp")));
        assert_eq!(config.classifier.min_confidence, Confidence::BuildVerified);
        assert!(config.classifier.accept_unverified);
    }

    #[test]
    #[serial]
    fn test_exit_codes() {
        let temp = TempDir::new().unwrap();
        assert_eq!(handle_detect(&detect_args(temp.path().to_path_buf())), 0);
        assert_eq!(handle_detect(&detect_args(temp.path().join("missing"))), 1);
    }
}
