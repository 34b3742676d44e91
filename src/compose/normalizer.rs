//! Declared services to snapshot-rooted containers

use super::collector::{BuildSpec, DeclaredService};
use crate::detection::types::Container;
use crate::fs::normalize_lexically;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const DEFAULT_BUILD_FILE: &str = "Dockerfile";

/// Strips tag and digest from an image reference, keeping a registry port
pub fn normalize_image(image: &str) -> Option<String> {
    let without_digest = image.trim().split('@').next().unwrap_or_default();
    let name = match without_digest.rfind(':') {
        Some(idx) if !without_digest[idx..].contains('/') => &without_digest[..idx],
        _ => without_digest,
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Whether a build context points outside the local checkout
pub fn is_remote_context(context: &str) -> bool {
    context.contains("://") || context.starts_with("git@") || context.starts_with("github.com/")
}

fn within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root) && !path.components().any(|c| c == Component::ParentDir)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolves build paths against the snapshot root and drops containers
/// left without image or build. Declaration order is preserved.
pub fn normalize(services: &[DeclaredService], root: &Path) -> Vec<Container> {
    let root = normalize_lexically(root);
    let mut containers = Vec::with_capacity(services.len());

    for service in services {
        let mut container = Container::new(service.name.clone());
        container.image = service.image.as_deref().and_then(normalize_image);
        container.container_name = non_empty(service.container_name.as_ref());

        if let Some(build) = &service.build {
            let (context, dockerfile) = resolve_build(&service.name, build, &root);
            container.build_context = context;
            container.build_dockerfile = dockerfile;
        }

        if container.has_identity() {
            containers.push(container);
        } else {
            debug!(service = %service.name, "Dropping container without image or local build");
        }
    }

    containers
}

fn resolve_build(service: &str, build: &BuildSpec, root: &Path) -> (Option<PathBuf>, Option<PathBuf>) {
    let context = build.context.as_deref().map(str::trim).unwrap_or(".");

    if is_remote_context(context) {
        debug!(service, context, "Ignoring remote build context");
        return (None, None);
    }
    if Path::new(context).is_absolute() {
        debug!(service, context, "Ignoring absolute build context");
        return (None, None);
    }

    let context_path = normalize_lexically(&build.base_dir.join(context));
    if !within_root(&context_path, root) {
        warn!(
            service,
            context = %context_path.display(),
            "Build context escapes the snapshot root"
        );
        return (None, None);
    }

    let dockerfile = build
        .dockerfile
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_BUILD_FILE);
    if Path::new(dockerfile).is_absolute() {
        debug!(service, dockerfile, "Ignoring absolute build-definition path");
        return (Some(context_path), None);
    }

    let dockerfile_path = normalize_lexically(&context_path.join(dockerfile));
    if !within_root(&dockerfile_path, root) {
        warn!(
            service,
            dockerfile = %dockerfile_path.display(),
            "Build-definition path escapes the snapshot root"
        );
        return (Some(context_path), None);
    }

    (Some(context_path), Some(dockerfile_path))
}
