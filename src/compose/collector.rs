//! Declared-service collection from a manifest and everything it pulls in
//!
//! A manifest may `include` other manifests and its services may `extends`
//! services of the same or another file. Both are resolved recursively and
//! merged field by field; the including file and the extending service win.

use super::env_file::{load_env_file, EnvVars};
use super::error::ComposeError;
use super::interpolate::interpolate_value;
use crate::config::CollectorConfig;
use crate::fs::{normalize_lexically, FileSystem};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Build section of a declared service, paths still as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSpec {
    /// Build context, relative to `base_dir` unless absolute or remote
    pub context: Option<String>,
    /// Build-definition file, relative to the context unless absolute
    pub dockerfile: Option<String>,
    /// Directory the context is resolved against
    pub base_dir: PathBuf,
}

impl BuildSpec {
    fn overlay(self, over: BuildSpec) -> BuildSpec {
        let (context, base_dir) = match (over.context, self.context) {
            (Some(context), _) => (Some(context), over.base_dir),
            (None, Some(context)) => (Some(context), self.base_dir),
            (None, None) => (None, over.base_dir),
        };
        BuildSpec {
            context,
            dockerfile: over.dockerfile.or(self.dockerfile),
            base_dir,
        }
    }
}

/// One service entry as declared, after include/extends resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredService {
    pub name: String,
    pub image: Option<String>,
    pub container_name: Option<String>,
    pub build: Option<BuildSpec>,
    pub project_dir: PathBuf,
}

impl DeclaredService {
    /// Field-wise merge where `over` wins and `self` fills the gaps
    fn overlay(self, over: DeclaredService) -> DeclaredService {
        let build = match (self.build, over.build) {
            (Some(base), Some(top)) => Some(base.overlay(top)),
            (base, top) => top.or(base),
        };
        DeclaredService {
            name: over.name,
            image: over.image.or(self.image),
            container_name: over.container_name.or(self.container_name),
            build,
            project_dir: over.project_dir,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ManifestDef {
    #[serde(default)]
    include: Vec<IncludeDef>,
    #[serde(default)]
    services: Option<Mapping>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IncludeDef {
    Path(String),
    Long {
        path: OneOrMany,
        #[serde(default)]
        project_directory: Option<String>,
        #[serde(default)]
        env_file: Option<OneOrMany>,
    },
}

/// A YAML scalar taken as text, so `image: 5` or `container_name: 2048` still parse
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_yaml::Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
            Scalar::Bool(flag) => flag.to_string(),
        }
    }
}

fn scalar_text(value: Option<Scalar>) -> Option<String> {
    value.map(Scalar::into_string)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServiceDef {
    image: Option<Scalar>,
    container_name: Option<Scalar>,
    build: Option<BuildDef>,
    extends: Option<ExtendsDef>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BuildDef {
    Context(Scalar),
    Long {
        #[serde(default)]
        context: Option<Scalar>,
        #[serde(default)]
        dockerfile: Option<Scalar>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExtendsDef {
    Service(String),
    Long {
        service: String,
        #[serde(default)]
        file: Option<String>,
    },
}

impl ExtendsDef {
    fn parts(&self) -> (&str, Option<&str>) {
        match self {
            ExtendsDef::Service(service) => (service, None),
            ExtendsDef::Long { service, file } => (service, file.as_deref()),
        }
    }
}

/// Per-file context while walking a manifest tree
struct FileScope<'a> {
    path: &'a Path,
    project_dir: &'a Path,
    services: &'a Mapping,
    env: &'a EnvVars,
    depth: usize,
}

/// Collects declared services, reading through a [`FileSystem`]
pub struct ServiceCollector<'a, F: FileSystem> {
    fs: &'a F,
    config: &'a CollectorConfig,
}

impl<'a, F: FileSystem> ServiceCollector<'a, F> {
    pub fn new(fs: &'a F, config: &'a CollectorConfig) -> Self {
        Self { fs, config }
    }

    /// Services of `manifest` in declaration order, included services first
    pub fn collect(&self, manifest: &Path) -> Result<Vec<DeclaredService>, ComposeError> {
        let manifest = normalize_lexically(manifest);
        let project_dir = manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let env_files = vec![self.config.env_file.clone()];

        let mut include_stack = Vec::new();
        self.collect_file(&manifest, &project_dir, &env_files, 0, &mut include_stack)
    }

    fn collect_file(
        &self,
        path: &Path,
        project_dir: &Path,
        env_files: &[String],
        depth: usize,
        include_stack: &mut Vec<PathBuf>,
    ) -> Result<Vec<DeclaredService>, ComposeError> {
        if depth > self.config.max_include_depth {
            return Err(ComposeError::IncludeTooDeep {
                path: path.to_path_buf(),
                limit: self.config.max_include_depth,
            });
        }
        if include_stack.iter().any(|p| p == path) {
            return Err(ComposeError::IncludeCycle(path.to_path_buf()));
        }
        include_stack.push(path.to_path_buf());

        let mut env = EnvVars::new();
        for env_file in env_files {
            env.extend(load_env_file(self.fs, &project_dir.join(env_file)));
        }

        let doc = self.load_document(path, &env)?;
        let manifest: ManifestDef =
            serde_yaml::from_value(doc).map_err(|source| ComposeError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut collected: Vec<DeclaredService> = Vec::new();

        for include in manifest.include {
            let (paths, include_project_dir, include_env_files) = match include {
                IncludeDef::Path(p) => (vec![p], None, None),
                IncludeDef::Long {
                    path,
                    project_directory,
                    env_file,
                } => (path.into_vec(), project_directory, env_file),
            };

            for included in paths {
                let included_path = normalize_lexically(&project_dir.join(&included));
                let included_project_dir = match &include_project_dir {
                    Some(dir) => normalize_lexically(&project_dir.join(dir)),
                    None => included_path
                        .parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_default(),
                };
                let included_env_files = include_env_files
                    .clone()
                    .map(OneOrMany::into_vec)
                    .unwrap_or_else(|| vec![self.config.env_file.clone()]);

                debug!(
                    manifest = %path.display(),
                    include = %included_path.display(),
                    "Following manifest include"
                );
                let services = self.collect_file(
                    &included_path,
                    &included_project_dir,
                    &included_env_files,
                    depth + 1,
                    include_stack,
                )?;
                for service in services {
                    merge_into(&mut collected, service);
                }
            }
        }

        let services = manifest.services.unwrap_or_default();
        let scope = FileScope {
            path,
            project_dir,
            services: &services,
            env: &env,
            depth,
        };

        for (key, value) in &services {
            let Some(name) = key.as_str() else {
                warn!(manifest = %path.display(), "Skipping service with non-string name");
                continue;
            };

            let mut visiting = Vec::new();
            match self.resolve_service(name, value, &scope, &mut visiting) {
                Ok(service) => merge_into(&mut collected, service),
                Err(e @ ComposeError::InvalidService { .. }) => {
                    warn!(service = name, error = %e, "Skipping invalid service");
                }
                Err(e) => return Err(e),
            }
        }

        include_stack.pop();
        Ok(collected)
    }

    fn resolve_service(
        &self,
        name: &str,
        value: &Value,
        scope: &FileScope<'_>,
        visiting: &mut Vec<(PathBuf, String)>,
    ) -> Result<DeclaredService, ComposeError> {
        let key = (scope.path.to_path_buf(), name.to_string());
        if visiting.contains(&key) {
            return Err(ComposeError::ExtendsCycle {
                service: name.to_string(),
                path: scope.path.to_path_buf(),
            });
        }
        visiting.push(key);

        let def = parse_service(name, scope.path, value)?;
        let own = DeclaredService {
            name: name.to_string(),
            image: scalar_text(def.image),
            container_name: scalar_text(def.container_name),
            build: def.build.map(|build| match build {
                BuildDef::Context(context) => BuildSpec {
                    context: Some(context.into_string()),
                    dockerfile: None,
                    base_dir: scope.project_dir.to_path_buf(),
                },
                BuildDef::Long {
                    context,
                    dockerfile,
                } => BuildSpec {
                    context: scalar_text(context),
                    dockerfile: scalar_text(dockerfile),
                    base_dir: scope.project_dir.to_path_buf(),
                },
            }),
            project_dir: scope.project_dir.to_path_buf(),
        };

        let resolved = match &def.extends {
            None => own,
            Some(extends) => {
                let (base_name, file) = extends.parts();
                let base = match file {
                    None => {
                        let base_value = scope.services.get(base_name).ok_or_else(|| {
                            ComposeError::MissingBaseService {
                                service: name.to_string(),
                                base: base_name.to_string(),
                                path: scope.path.to_path_buf(),
                            }
                        })?;
                        self.resolve_service(base_name, base_value, scope, visiting)?
                    }
                    Some(file) => self.resolve_external(name, base_name, file, scope, visiting)?,
                };
                base.overlay(own)
            }
        };

        visiting.pop();
        Ok(resolved)
    }

    fn resolve_external(
        &self,
        name: &str,
        base_name: &str,
        file: &str,
        scope: &FileScope<'_>,
        visiting: &mut Vec<(PathBuf, String)>,
    ) -> Result<DeclaredService, ComposeError> {
        if Path::new(file).is_absolute() {
            return Err(ComposeError::AbsoluteExtendsFile {
                service: name.to_string(),
                file: file.to_string(),
            });
        }

        let manifest_dir = scope.path.parent().unwrap_or(scope.project_dir);
        let external = normalize_lexically(&manifest_dir.join(file));
        if scope.depth + 1 > self.config.max_include_depth {
            return Err(ComposeError::IncludeTooDeep {
                path: external,
                limit: self.config.max_include_depth,
            });
        }

        let doc = self.load_document(&external, scope.env)?;
        let external_def: ManifestDef =
            serde_yaml::from_value(doc).map_err(|source| ComposeError::Parse {
                path: external.clone(),
                source,
            })?;
        let services = external_def.services.unwrap_or_default();
        let base_value =
            services
                .get(base_name)
                .ok_or_else(|| ComposeError::MissingBaseService {
                    service: name.to_string(),
                    base: base_name.to_string(),
                    path: external.clone(),
                })?;

        let external_dir = external
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let external_scope = FileScope {
            path: &external,
            project_dir: &external_dir,
            services: &services,
            env: scope.env,
            depth: scope.depth + 1,
        };

        let mut base = self.resolve_service(base_name, base_value, &external_scope, visiting)?;
        base.project_dir = scope.project_dir.to_path_buf();
        Ok(base)
    }

    fn load_document(&self, path: &Path, env: &EnvVars) -> Result<Value, ComposeError> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| ComposeError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut doc: Value = serde_yaml::from_str(&content).map_err(|source| ComposeError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !doc.is_mapping() {
            return Err(ComposeError::NotAMapping(path.to_path_buf()));
        }

        doc.apply_merge().map_err(|source| ComposeError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        interpolate_value(&mut doc, env);
        Ok(doc)
    }
}

fn parse_service(name: &str, path: &Path, value: &Value) -> Result<ServiceDef, ComposeError> {
    if value.is_null() {
        return Ok(ServiceDef::default());
    }
    serde_yaml::from_value(value.clone()).map_err(|source| ComposeError::InvalidService {
        service: name.to_string(),
        path: path.to_path_buf(),
        source,
    })
}

fn merge_into(collected: &mut Vec<DeclaredService>, service: DeclaredService) {
    match collected.iter().position(|s| s.name == service.name) {
        Some(index) => {
            let existing = collected.remove(index);
            collected.insert(index, existing.overlay(service));
        }
        None => collected.push(service),
    }
}

/// Collects services, or reports why the manifest is malformed
pub fn try_collect_services<F: FileSystem>(
    fs: &F,
    manifest: &Path,
    config: &CollectorConfig,
) -> Result<Vec<DeclaredService>, ComposeError> {
    ServiceCollector::new(fs, config).collect(manifest)
}

/// Collects services; a malformed manifest is logged and yields no services
pub fn collect_services<F: FileSystem>(
    fs: &F,
    manifest: &Path,
    config: &CollectorConfig,
) -> Vec<DeclaredService> {
    match try_collect_services(fs, manifest, config) {
        Ok(services) => {
            debug!(
                manifest = %manifest.display(),
                count = services.len(),
                "Collected declared services"
            );
            services
        }
        Err(e) => {
            warn!(manifest = %manifest.display(), error = %e, "Treating malformed manifest as absent");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn collect(fs: &MockFileSystem, manifest: &str) -> Result<Vec<DeclaredService>, ComposeError> {
        try_collect_services(fs, Path::new(manifest), &CollectorConfig::default())
    }

    fn by_name<'a>(services: &'a [DeclaredService], name: &str) -> &'a DeclaredService {
        services
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("service {} not collected", name))
    }

    #[test]
    fn test_basic_services() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "docker-compose.yml",
            r#"
version: "3.8"
services:
  db:
    image: postgres:14
  orders:
    build:
      context: ./orders
      dockerfile: Dockerfile.prod
    container_name: orders-app
  web:
    build: ./web
"#,
        );

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["db", "orders", "web"]);

        assert_eq!(services[0].image.as_deref(), Some("postgres:14"));
        assert!(services[0].build.is_none());

        let orders = &services[1];
        assert_eq!(orders.container_name.as_deref(), Some("orders-app"));
        let build = orders.build.as_ref().unwrap();
        assert_eq!(build.context.as_deref(), Some("./orders"));
        assert_eq!(build.dockerfile.as_deref(), Some("Dockerfile.prod"));
        assert_eq!(build.base_dir, PathBuf::from("/mock"));

        let web = services[2].build.as_ref().unwrap();
        assert_eq!(web.context.as_deref(), Some("./web"));
        assert_eq!(web.dockerfile, None);
    }

    #[test]
    fn test_null_service_and_unknown_fields() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "compose.yaml",
            "services:\n  worker:\n  api:\n    image: acme/api\n    ports: [\"80:80\"]\n",
        );

        let services = collect(&fs, "/mock/compose.yaml").unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "worker");
        assert_eq!(services[0].image, None);
    }

    #[test]
    fn test_scalar_fields_are_stringified() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "docker-compose.yml",
            "services:\n  game:\n    image: 5\n    container_name: 2048\n    build:\n      context: 2048\n  api:\n    image: acme/api\n",
        );

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        assert_eq!(services.len(), 2);
        let game = &services[0];
        assert_eq!(game.image.as_deref(), Some("5"));
        assert_eq!(game.container_name.as_deref(), Some("2048"));
        assert_eq!(game.build.as_ref().unwrap().context.as_deref(), Some("2048"));
    }

    #[test]
    fn test_nested_default_image() {
        let fs = MockFileSystem::new();
        fs.add_file(".env", "DEF=acme/base\n");
        fs.add_file("docker-compose.yml", "services:\n  api:\n    image: ${IMG:-${DEF}}\n");

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        assert_eq!(services[0].image.as_deref(), Some("acme/base"));
    }

    #[test]
    fn test_interpolates_from_env_file() {
        let fs = MockFileSystem::new();
        fs.add_file(".env", "OWNER=acme\nCTX=./svc\n");
        fs.add_file(
            "docker-compose.yml",
            "services:\n  api:\n    image: ${OWNER}/api:${TAG:-latest}\n    build: $CTX\n",
        );

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        assert_eq!(services[0].image.as_deref(), Some("acme/api:latest"));
        assert_eq!(
            services[0].build.as_ref().unwrap().context.as_deref(),
            Some("./svc")
        );
    }

    #[test]
    fn test_include_merges_per_field() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "docker-compose.yml",
            r#"
include:
  - deploy/base-compose.yml
services:
  api:
    container_name: api-main
  gateway:
    image: nginx
"#,
        );
        fs.add_file(
            "deploy/base-compose.yml",
            r#"
services:
  api:
    image: acme/api
    container_name: api-base
    build: ../api
  cache:
    image: redis
"#,
        );

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["api", "cache", "gateway"]);

        let api = by_name(&services, "api");
        assert_eq!(api.image.as_deref(), Some("acme/api"));
        assert_eq!(api.container_name.as_deref(), Some("api-main"));
        let build = api.build.as_ref().unwrap();
        assert_eq!(build.context.as_deref(), Some("../api"));
        assert_eq!(build.base_dir, PathBuf::from("/mock/deploy"));
    }

    #[test]
    fn test_include_long_syntax() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "compose.yaml",
            r#"
include:
  - path:
      - infra/one.yml
      - infra/two.yml
    project_directory: services
    env_file: vars.env
"#,
        );
        fs.add_file("infra/one.yml", "services:\n  one:\n    build: ./one\n");
        fs.add_file("infra/two.yml", "services:\n  two:\n    image: acme/${NAME}\n");
        fs.add_file("services/vars.env", "NAME=two\n");

        let services = collect(&fs, "/mock/compose.yaml").unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(
            services[0].build.as_ref().unwrap().base_dir,
            PathBuf::from("/mock/services")
        );
        assert_eq!(services[1].image.as_deref(), Some("acme/two"));
    }

    #[test]
    fn test_include_cycle_is_malformed() {
        let fs = MockFileSystem::new();
        fs.add_file("a-compose.yml", "include: [b-compose.yml]\nservices: {}\n");
        fs.add_file("b-compose.yml", "include: [a-compose.yml]\nservices: {}\n");

        assert!(matches!(
            collect(&fs, "/mock/a-compose.yml"),
            Err(ComposeError::IncludeCycle(_))
        ));
    }

    #[test]
    fn test_include_depth_limit() {
        let fs = MockFileSystem::new();
        fs.add_file("compose.yml", "include: [l1/compose.yml]\n");
        fs.add_file("l1/compose.yml", "include: [../l2/compose.yml]\n");
        fs.add_file("l2/compose.yml", "services:\n  deep:\n    image: x\n");

        let config = CollectorConfig {
            max_include_depth: 1,
            ..CollectorConfig::default()
        };
        let err = try_collect_services(&fs, Path::new("/mock/compose.yml"), &config).unwrap_err();
        assert!(matches!(err, ComposeError::IncludeTooDeep { limit: 1, .. }));

        let ok = collect(&fs, "/mock/compose.yml").unwrap();
        assert_eq!(ok[0].name, "deep");
    }

    #[test]
    fn test_extends_same_file() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "docker-compose.yml",
            r#"
services:
  base:
    image: acme/base
    build:
      context: ./common
      dockerfile: Dockerfile.base
  api:
    extends: base
    build:
      dockerfile: Dockerfile.api
  worker:
    extends:
      service: api
    container_name: worker
"#,
        );

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        let api = by_name(&services, "api");
        assert_eq!(api.image.as_deref(), Some("acme/base"));
        let build = api.build.as_ref().unwrap();
        assert_eq!(build.context.as_deref(), Some("./common"));
        assert_eq!(build.dockerfile.as_deref(), Some("Dockerfile.api"));

        let worker = by_name(&services, "worker");
        assert_eq!(worker.container_name.as_deref(), Some("worker"));
        assert_eq!(
            worker.build.as_ref().unwrap().dockerfile.as_deref(),
            Some("Dockerfile.api")
        );
    }

    #[test]
    fn test_extends_external_file_keeps_its_directory() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "docker-compose.yml",
            "services:\n  api:\n    extends:\n      file: common/services.yml\n      service: app\n",
        );
        fs.add_file(
            "common/services.yml",
            "services:\n  app:\n    image: acme/app\n    build: ./app\n",
        );

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        let api = &services[0];
        assert_eq!(api.image.as_deref(), Some("acme/app"));
        assert_eq!(api.project_dir, PathBuf::from("/mock"));
        assert_eq!(
            api.build.as_ref().unwrap().base_dir,
            PathBuf::from("/mock/common")
        );
    }

    #[test]
    fn test_extends_errors() {
        let fs = MockFileSystem::new();
        fs.add_file("missing.yml", "services:\n  a:\n    extends: ghost\n");
        fs.add_file(
            "absolute.yml",
            "services:\n  a:\n    extends:\n      file: /etc/compose.yml\n      service: b\n",
        );
        fs.add_file(
            "cycle.yml",
            "services:\n  a:\n    extends: b\n  b:\n    extends: a\n",
        );

        assert!(matches!(
            collect(&fs, "/mock/missing.yml"),
            Err(ComposeError::MissingBaseService { .. })
        ));
        assert!(matches!(
            collect(&fs, "/mock/absolute.yml"),
            Err(ComposeError::AbsoluteExtendsFile { .. })
        ));
        assert!(matches!(
            collect(&fs, "/mock/cycle.yml"),
            Err(ComposeError::ExtendsCycle { .. })
        ));
    }

    #[test]
    fn test_malformed_manifests() {
        let fs = MockFileSystem::new();
        fs.add_file("broken.yml", "services:\n  a: [unclosed\n");
        fs.add_file("list.yml", "- a\n- b\n");
        fs.add_file("empty.yml", "");

        assert!(matches!(
            collect(&fs, "/mock/broken.yml"),
            Err(ComposeError::Parse { .. })
        ));
        assert!(matches!(
            collect(&fs, "/mock/list.yml"),
            Err(ComposeError::NotAMapping(_))
        ));
        assert!(collect(&fs, "/mock/empty.yml").is_err());
        assert!(collect_services(&fs, Path::new("/mock/broken.yml"), &CollectorConfig::default()).is_empty());
    }

    #[test]
    fn test_invalid_service_is_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "docker-compose.yml",
            "services:\n  bad:\n    image: [not, a, string]\n  good:\n    image: acme/good\n",
        );

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "good");
    }

    #[test]
    fn test_yaml_merge_keys() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "docker-compose.yml",
            r#"
x-defaults: &defaults
  build: ./shared
services:
  api:
    <<: *defaults
    image: acme/api
"#,
        );

        let services = collect(&fs, "/mock/docker-compose.yml").unwrap();
        assert_eq!(
            services[0].build.as_ref().unwrap().context.as_deref(),
            Some("./shared")
        );
    }
}
