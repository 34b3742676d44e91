use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Strength of the evidence linking a container to a build file.
///
/// Variants are declared weakest first so `Ord` follows evidence strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    /// Matched through the container name or manifest key
    BuildNameMatched,
    /// Matched through the image name
    BuildImageMatched,
    /// Explicit local build whose file is not present in the snapshot
    BuildUnverified,
    /// Explicit build path equal to a located build file
    BuildVerified,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::BuildNameMatched => "BUILD_NAME_MATCHED",
            Confidence::BuildImageMatched => "BUILD_IMAGE_MATCHED",
            Confidence::BuildUnverified => "BUILD_UNVERIFIED",
            Confidence::BuildVerified => "BUILD_VERIFIED",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized declared service
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Container {
    /// Manifest key
    pub name: String,
    /// Registry reference without tag or digest
    pub image: Option<String>,
    pub container_name: Option<String>,
    pub build_context: Option<PathBuf>,
    pub build_dockerfile: Option<PathBuf>,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            container_name: None,
            build_context: None,
            build_dockerfile: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_container_name(mut self, container_name: impl Into<String>) -> Self {
        self.container_name = Some(container_name.into());
        self
    }

    pub fn with_build(mut self, context: impl Into<PathBuf>, dockerfile: Option<PathBuf>) -> Self {
        self.build_context = Some(context.into());
        self.build_dockerfile = dockerfile;
        self
    }

    /// Name a matched microservice is reported under
    pub fn service_name(&self) -> &str {
        self.container_name.as_deref().unwrap_or(&self.name)
    }

    /// Most specific identifying string, used to order classification
    pub fn identifying_name(&self) -> &str {
        self.image.as_deref().unwrap_or_else(|| self.service_name())
    }

    pub fn has_identity(&self) -> bool {
        self.image.is_some() || self.build_context.is_some() || self.build_dockerfile.is_some()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(image) = &self.image {
            write!(f, " (image: {})", image)?;
        }
        Ok(())
    }
}

/// A build-definition file found in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BuildFile {
    pub path: PathBuf,
    /// Snapshot-relative path with forward slashes
    pub relative: String,
    /// Whether some COPY/ADD brings user code into the image
    pub copies_code: bool,
}

impl BuildFile {
    /// Snapshot-relative directory, empty for files at the root
    pub fn directory(&self) -> &str {
        self.relative
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }
}

impl fmt::Display for BuildFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative)
    }
}

/// Build files describing one logical build unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildGroup {
    pub canonical: BuildFile,
    /// All members in path order, canonical included
    pub members: Vec<BuildFile>,
}

impl BuildGroup {
    pub fn directory(&self) -> &str {
        self.canonical.directory()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.members.iter().any(|m| m.path == path)
    }

    /// Member a name-based match claims: the canonical one, or with
    /// `require_code_copy` the first member that copies user code
    pub fn representative(&self, require_code_copy: bool) -> Option<&BuildFile> {
        if !require_code_copy || self.canonical.copies_code {
            return Some(&self.canonical);
        }
        self.members.iter().find(|m| m.copies_code)
    }
}

/// A container attributed to a first-party build
#[derive(Debug, Clone, Serialize)]
pub struct Microservice {
    pub name: String,
    pub build: Option<BuildFile>,
    pub image: Option<String>,
    pub container_name: Option<String>,
    pub confidence: Confidence,
}

impl Microservice {
    fn identity(&self) -> (&str, Option<&BuildFile>, Option<&str>, Option<&str>) {
        (
            &self.name,
            self.build.as_ref(),
            self.image.as_deref(),
            self.container_name.as_deref(),
        )
    }
}

// Identity excludes confidence so the same service collapses across commits.
impl PartialEq for Microservice {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Microservice {}

impl Hash for Microservice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for Microservice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Microservice {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Display for Microservice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.confidence)?;
        if let Some(build) = &self.build {
            write!(f, " <- {}", build)?;
        }
        Ok(())
    }
}

/// Outcome of classifying one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub microservices: BTreeSet<Microservice>,
    pub leftover_containers: BTreeSet<Container>,
    pub leftover_build_files: BTreeSet<BuildFile>,
    /// Build files removed from the pool by a match, whole groups included
    pub consumed_build_files: BTreeSet<BuildFile>,
}

impl Classification {
    pub fn count(&self) -> usize {
        self.microservices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.microservices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_file(relative: &str) -> BuildFile {
        BuildFile {
            path: PathBuf::from("/repo").join(relative),
            relative: relative.to_string(),
            copies_code: true,
        }
    }

    #[test]
    fn test_confidence_order() {
        assert!(Confidence::BuildVerified > Confidence::BuildUnverified);
        assert!(Confidence::BuildUnverified > Confidence::BuildImageMatched);
        assert!(Confidence::BuildImageMatched > Confidence::BuildNameMatched);
        assert_eq!(Confidence::BuildVerified.to_string(), "BUILD_VERIFIED");
        assert_eq!(
            serde_json::to_string(&Confidence::BuildImageMatched).unwrap(),
            "\"BUILD_IMAGE_MATCHED\""
        );
    }

    #[test]
    fn test_container_names() {
        let db = Container::new("db").with_image("postgres");
        assert_eq!(db.identifying_name(), "postgres");
        assert_eq!(db.service_name(), "db");

        let api = Container::new("api").with_container_name("user-api");
        assert_eq!(api.identifying_name(), "user-api");
        assert_eq!(api.service_name(), "user-api");
        assert!(!api.has_identity());
    }

    #[test]
    fn test_build_file_directory() {
        assert_eq!(build_file("services/auth/Dockerfile").directory(), "services/auth");
        assert_eq!(build_file("Dockerfile").directory(), "");
    }

    #[test]
    fn test_group_representative() {
        let mut canonical = build_file("auth/Dockerfile");
        canonical.copies_code = false;
        let dev = build_file("auth/Dockerfile.dev");
        let group = BuildGroup {
            canonical: canonical.clone(),
            members: vec![canonical.clone(), dev.clone()],
        };

        assert_eq!(group.representative(false), Some(&canonical));
        assert_eq!(group.representative(true), Some(&dev));
        assert!(group.contains(Path::new("/repo/auth/Dockerfile.dev")));
    }

    #[test]
    fn test_microservice_identity_ignores_confidence() {
        let a = Microservice {
            name: "orders".to_string(),
            build: Some(build_file("orders/Dockerfile")),
            image: None,
            container_name: None,
            confidence: Confidence::BuildVerified,
        };
        let b = Microservice {
            confidence: Confidence::BuildNameMatched,
            ..a.clone()
        };
        let c = Microservice {
            name: "billing".to_string(),
            ..a.clone()
        };

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: BTreeSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
