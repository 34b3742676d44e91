//! Build-definition file patterns and exclusion rules

/// Extensions of files that mention "Dockerfile" without being one
pub const EXCLUDED_EXTENSIONS: &[&str] = &[".sh", ".ps1", ".nanowin", ".txt", ".md"];

/// Path fragments marking third-party or sample build files
pub const EXCLUDED_PATH_FRAGMENTS: &[&str] = &["vendor", "external", "example", "demo"];

/// Extensions of configuration and script files copied next to user code
pub const CONFIG_EXTENSIONS: &[&str] = &[
    ".sh", ".xml", ".txt", ".yaml", ".yml", ".conf", ".config", ".cnf", ".cfg", ".cf", ".sql",
    ".crt", ".key",
];

/// Checks whether a file name follows a build-definition naming convention
pub fn is_build_file_name(filename: &str) -> bool {
    if filename.contains("Dockerfile")
        || filename.to_lowercase().ends_with(".dockerfile")
        || filename.starts_with("Containerfile")
    {
        let lower = filename.to_lowercase();
        return !EXCLUDED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
    }
    false
}

/// Checks whether a snapshot-relative path lies under a third-party or sample tree
pub fn is_excluded_path(relative: &str) -> bool {
    let lower = relative.to_lowercase();
    EXCLUDED_PATH_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

/// Checks whether a COPY/ADD source names configuration or scripts only
pub fn is_config_source(source: &str) -> bool {
    let lower = source.to_lowercase();
    CONFIG_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) || lower.contains("script")
}
