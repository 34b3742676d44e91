//! .env file parsing utilities

use crate::fs::FileSystem;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Variables available for manifest interpolation
pub type EnvVars = BTreeMap<String, String>;

/// Parses `KEY=VALUE` lines; later keys override earlier ones.
///
/// Supports `export` prefixes, blank lines, `#` comments, single and double
/// quotes, and trailing ` #` comments on unquoted values.
pub fn parse_env(content: &str) -> EnvVars {
    let line_re = Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_.-]*)\s*=\s*(.*)$")
        .expect("valid regex");

    let mut vars = EnvVars::new();
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(cap) = line_re.captures(line) {
            vars.insert(cap[1].to_string(), unquote(cap[2].trim_end()));
        }
    }
    vars
}

/// Reads and parses an env file; a missing or unreadable file yields no variables
pub fn load_env_file<F: FileSystem>(fs: &F, path: &Path) -> EnvVars {
    if !fs.is_file(path) {
        return EnvVars::new();
    }
    match fs.read_to_string(path) {
        Ok(content) => parse_env(&content),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Ignoring unreadable env file");
            EnvVars::new()
        }
    }
}

fn unquote(raw: &str) -> String {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == b'"' && last == b'"' {
            return raw[1..raw.len() - 1]
                .replace("\\n", "\n")
                .replace("\\\"", "\"");
        }
        if first == b'\'' && last == b'\'' {
            return raw[1..raw.len() - 1].to_string();
        }
    }
    match raw.find(" #") {
        Some(idx) => raw[..idx].trim_end().to_string(),
        None => raw.to_string(),
    }
}
