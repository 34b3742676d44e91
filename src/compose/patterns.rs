//! Manifest filename patterns and ranking rules

use std::path::Path;

/// Default manifest names, all equally canonical
pub const DEFAULT_MANIFEST_NAMES: &[&str] = &[
    "compose.yaml",
    "compose.yml",
    "docker-compose.yaml",
    "docker-compose.yml",
];

/// Filename affixes accepted beside the default names, most preferable first
pub const AFFIX_WHITELIST: &[&str] = &[
    "services", "base", "dev", "build", "stack", "prod", "stable", "deploy", "test",
];

/// Filename affixes that disqualify a manifest even when whitelisted affixes are present
pub const AFFIX_BLACKLIST: &[&str] = &["infra", "override"];

/// Directory keywords a manifest path may traverse
pub const DIR_KEYWORDS: &[&str] = &[
    // docker
    "docker",
    "compose",
    "swarm",
    // code directories
    "src",
    "services",
    // development phases
    "dev",
    "test",
    "staging",
    "deploy",
    "integration",
    "release",
    "prod",
    // miscellaneous
    "iac",
    "saas",
    "devops",
    "setup",
    "script",
    "complete",
    "etc",
];

/// Checks whether a file name looks like an orchestration manifest
pub fn is_manifest_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.contains("compose") && (lower.ends_with(".yml") || lower.ends_with(".yaml"))
}

/// Priority tier of a manifest file name (lower is preferable).
///
/// Returns `None` for names that must never be selected.
pub fn filename_tier(filename: &str) -> Option<usize> {
    let lower = filename.to_lowercase();

    if DEFAULT_MANIFEST_NAMES.contains(&lower.as_str()) {
        return Some(0);
    }

    if AFFIX_BLACKLIST.iter().any(|affix| lower.contains(affix)) {
        return None;
    }

    AFFIX_WHITELIST
        .iter()
        .position(|affix| lower.contains(affix))
        .map(|index| index + 1)
}

/// Checks whether every directory between the snapshot root and a manifest
/// contains one of the directory keywords. The snapshot root itself passes.
pub fn in_keyword_directories(relative_dir: &Path) -> bool {
    relative_dir.components().all(|component| {
        let folder = component.as_os_str().to_string_lossy().to_lowercase();
        DIR_KEYWORDS.iter().any(|keyword| folder.contains(keyword))
    })
}
