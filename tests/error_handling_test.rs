//! Error handling integration tests
//!
//! Only a missing or non-directory snapshot root aborts a call. Malformed
//! manifests, invalid services and escaping paths degrade to empty or
//! partial results.

use msminer::compose::{try_collect_services, ComposeError};
use msminer::config::CollectorConfig;
use msminer::fs::RealFileSystem;
use msminer::{determine_microservices, ConfigError, EngineError, MicroserviceDetector, MinerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_root_not_found_error() {
    let missing = PathBuf::from("/nonexistent/snapshot/root");
    let result = determine_microservices("acme", "shop", &missing, &[]);

    match result {
        Err(EngineError::RootNotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected RootNotFound, got {:?}", other),
    }
}

#[test]
fn test_not_a_directory_error() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("snapshot.tar");
    fs::write(&file_path, "content").unwrap();

    let result = MicroserviceDetector::baseline().analyze("acme", "shop", &file_path);
    match result {
        Err(EngineError::NotADirectory(path)) => assert_eq!(path, file_path),
        other => panic!("Expected NotADirectory, got {:?}", other.map(|r| r.root)),
    }
}

#[test]
fn test_malformed_manifest_yields_no_microservices() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "docker-compose.yml", "services:\n  api: [unterminated\n");
    write(root, "api/Dockerfile", "FROM node\nCOPY . .\n");

    let report = MicroserviceDetector::baseline()
        .analyze("acme", "shop", root)
        .expect("malformed manifests are not fatal");
    assert!(report.manifest.is_some());
    assert!(report.containers.is_empty());
    assert!(report.classification.microservices.is_empty());
    assert_eq!(report.classification.leftover_build_files.len(), 1);
}

#[test]
fn test_manifest_errors_are_reported_by_try_collect() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "docker-compose.yml", "- just\n- a list\n");
    write(
        root,
        "deploy/docker-compose.yml",
        "services:\n  web:\n    extends: missing\n",
    );

    let config = CollectorConfig::default();
    let not_mapping = try_collect_services(&RealFileSystem, &root.join("docker-compose.yml"), &config);
    assert!(matches!(not_mapping, Err(ComposeError::NotAMapping(_))));

    let missing_base = try_collect_services(
        &RealFileSystem,
        &root.join("deploy/docker-compose.yml"),
        &config,
    );
    assert!(matches!(
        missing_base,
        Err(ComposeError::MissingBaseService { .. })
    ));
}

#[test]
fn test_escaping_build_context_is_dropped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("snapshot");
    write(
        &root,
        "docker-compose.yml",
        "services:\n  outside:\n    build: ../../elsewhere\n  api:\n    build: ./api\n",
    );
    write(&root, "api/Dockerfile", "FROM node\nCOPY . .\n");

    let report = MicroserviceDetector::baseline()
        .analyze("acme", "shop", &root)
        .unwrap();
    let names: Vec<&str> = report.containers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["api"]);
    assert_eq!(report.classification.microservices.len(), 1);
}

#[test]
fn test_invalid_service_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "docker-compose.yml",
        "services:\n  broken:\n    build: [1, 2]\n  api:\n    build: ./api\n",
    );
    write(root, "api/Dockerfile", "FROM node\nCOPY . .\n");

    let report = MicroserviceDetector::baseline()
        .analyze("acme", "shop", root)
        .unwrap();
    let names: Vec<&str> = report.declared.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["api"]);
}

#[test]
fn test_config_validation_errors() {
    let mut config = MinerConfig::baseline();
    config.collector.max_include_depth = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed(_))
    ));

    let mut config = MinerConfig::baseline();
    config.log_level = "loud".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed(_))
    ));

    assert!(matches!(
        msminer::config::parse_confidence("sometimes"),
        Err(ConfigError::ParseError { .. })
    ));
}
