use msminer::{MicroserviceDetector, MinerConfig, SnapshotReport};
use msminer::fs::RealFileSystem;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[allow(dead_code)]
pub const SCENARIOS: &[&str] = &[
    "auth-grouped",
    "extends",
    "include-merge",
    "longest-name",
    "manifest-selection",
    "name-match",
    "no-manifest",
    "orders-postgres",
    "payments-image",
];

#[allow(dead_code)]
pub fn get_msminer_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_msminer"))
}

/// Absolute path of a snapshot fixture
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/snapshots")
        .join(name)
}

#[allow(dead_code)]
pub fn analyze_fixture(name: &str) -> SnapshotReport {
    analyze_fixture_with(name, MinerConfig::baseline())
}

#[allow(dead_code)]
pub fn analyze_fixture_with(name: &str, config: MinerConfig) -> SnapshotReport {
    let root = fixture_path(name);
    MicroserviceDetector::new(RealFileSystem, config)
        .analyze("acme", "shop", &root)
        .unwrap_or_else(|e| panic!("Analysis of fixture '{}' failed: {}", name, e))
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ExpectedMicroservice {
    pub name: String,
    pub confidence: String,
    pub build: Option<String>,
}

/// Contents of a fixture's `expected.json`
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct Expected {
    pub microservices: Vec<ExpectedMicroservice>,
    pub leftover_containers: Vec<String>,
    pub leftover_build_files: Vec<String>,
}

#[allow(dead_code)]
pub fn load_expected(name: &str) -> Expected {
    let path = fixture_path(name).join("expected.json");
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read expected JSON: {}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse expected JSON {}: {}", path.display(), e))
}

/// Compares a report with the fixture's expectations, ignoring order
#[allow(dead_code)]
pub fn assert_matches_expected(report: &SnapshotReport, expected: &Expected, name: &str) {
    let classification = &report.classification;

    let actual: BTreeSet<(String, String, Option<String>)> = classification
        .microservices
        .iter()
        .map(|m| {
            (
                m.name.clone(),
                m.confidence.as_str().to_string(),
                m.build.as_ref().map(|b| b.relative.clone()),
            )
        })
        .collect();
    let wanted: BTreeSet<(String, String, Option<String>)> = expected
        .microservices
        .iter()
        .map(|m| (m.name.clone(), m.confidence.clone(), m.build.clone()))
        .collect();
    assert_eq!(actual, wanted, "Microservices mismatch for {}", name);

    let leftover_containers: BTreeSet<String> = classification
        .leftover_containers
        .iter()
        .map(|c| c.name.clone())
        .collect();
    let wanted_containers: BTreeSet<String> =
        expected.leftover_containers.iter().cloned().collect();
    assert_eq!(
        leftover_containers, wanted_containers,
        "Leftover containers mismatch for {}",
        name
    );

    let leftover_build_files: BTreeSet<String> = classification
        .leftover_build_files
        .iter()
        .map(|b| b.relative.clone())
        .collect();
    let wanted_build_files: BTreeSet<String> =
        expected.leftover_build_files.iter().cloned().collect();
    assert_eq!(
        leftover_build_files, wanted_build_files,
        "Leftover build files mismatch for {}",
        name
    );
}
