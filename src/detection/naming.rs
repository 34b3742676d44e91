//! Candidate microservice names derived from images and container names

use std::collections::BTreeSet;

/// Affixes commonly wrapped around a service name
pub const SERVICE_AFFIXES: &[&str] = &["srv", "microservice", "service"];

const SEPARATORS: &[char] = &['-', '_', '/'];

/// Lowercases and folds `_`, `.` and spaces into `-` so names and paths compare alike
pub fn normalize_name(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '_' | '.' | ' ' => '-',
            other => other,
        })
        .collect()
}

fn strip_prefixed(value: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return value.to_string();
    }
    let mut result = value.to_string();
    for sep in SEPARATORS {
        result = result.replace(&format!("{}{}", prefix, sep), "");
    }
    result
}

/// Candidate names from an image reference.
///
/// Handles `[registry-or-user/](owner[-_/])?(repo[-_/])?name`, and always
/// offers the last path segment.
pub fn image_candidates(image: &str, owner: &str, repo: &str) -> BTreeSet<String> {
    let image = image.to_lowercase();
    let owner = owner.to_lowercase();
    let repo = repo.to_lowercase();

    let image = match image.split_once('/') {
        Some((_, rest)) => rest.to_string(),
        None => image,
    };

    let mut names = BTreeSet::new();
    let has_owner = !owner.is_empty() && image.contains(&owner);
    let has_repo = !repo.is_empty() && image.contains(&repo);

    if has_owner {
        names.insert(strip_prefixed(&image, &owner));
    }
    if has_repo {
        names.insert(strip_prefixed(&image, &repo));
    }
    if has_owner && has_repo {
        names.insert(strip_prefixed(&strip_prefixed(&image, &repo), &owner));
    }
    if let Some(last) = image.rsplit('/').next() {
        names.insert(last.to_string());
    }
    names.insert(image);

    names.retain(|n| !n.is_empty());
    names
}

/// Candidate names from a container name or manifest key, with one
/// leading or trailing service affix removed
pub fn name_candidates(name: &str) -> BTreeSet<String> {
    let name = name.trim().to_lowercase();
    let mut names = BTreeSet::new();
    if name.is_empty() {
        return names;
    }

    if let Some(stripped) = strip_affix(&name) {
        if !stripped.is_empty() {
            names.insert(stripped);
        }
    }
    names.insert(name);
    names
}

fn strip_affix(name: &str) -> Option<String> {
    for affix in SERVICE_AFFIXES {
        if let Some(rest) = name.strip_prefix(affix) {
            if let Some(rest) = rest.strip_prefix(SEPARATORS) {
                return Some(rest.to_string());
            }
        }
    }
    for affix in SERVICE_AFFIXES {
        if let Some(rest) = name.strip_suffix(affix) {
            if let Some(rest) = rest.strip_suffix(SEPARATORS) {
                return Some(rest.to_string());
            }
        }
    }
    None
}

/// Candidates ordered longest first, normalized, duplicates removed
pub fn ordered_candidates<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = names
        .into_iter()
        .map(|n| normalize_name(&n))
        .filter(|n| !n.is_empty())
        .collect();
    let mut ordered: Vec<String> = unique.into_iter().collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    ordered
}
