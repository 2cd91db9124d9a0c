//! Locating and parsing `darth-infra.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::models::{
    Bucket, Database, EnvironmentOverride, LoadBalancer, Project, ProjectDraft, Secret, Service,
    DEFAULT_REGION, DEFAULT_VPC_NAME, PROD_ENVIRONMENT,
};

/// File name of the project configuration document.
pub const CONFIG_FILENAME: &str = "darth-infra.toml";

/// On-disk shape of the configuration document.
#[derive(Debug, Deserialize)]
struct Document {
    project: ProjectSection,
    #[serde(default)]
    services: Vec<Service>,
    #[serde(default)]
    rds: Option<Database>,
    #[serde(default)]
    s3_buckets: Vec<Bucket>,
    #[serde(default)]
    alb: LoadBalancer,
    #[serde(default)]
    secrets: Vec<Secret>,
    /// Per-environment overrides, keyed by environment name.
    #[serde(default)]
    environments: BTreeMap<String, EnvironmentOverride>,
}

#[derive(Debug, Deserialize)]
struct ProjectSection {
    name: String,
    #[serde(default = "default_region")]
    aws_region: String,
    #[serde(default = "default_vpc_name")]
    vpc_name: String,
    #[serde(default = "default_environments")]
    environments: Vec<String>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_vpc_name() -> String {
    DEFAULT_VPC_NAME.to_string()
}

fn default_environments() -> Vec<String> {
    vec![PROD_ENVIRONMENT.to_string()]
}

impl From<Document> for ProjectDraft {
    fn from(doc: Document) -> Self {
        ProjectDraft {
            name: doc.project.name,
            aws_region: doc.project.aws_region,
            vpc_name: doc.project.vpc_name,
            environments: doc.project.environments,
            tags: doc.project.tags,
            services: doc.services,
            rds: doc.rds,
            s3_buckets: doc.s3_buckets,
            alb: doc.alb,
            secrets: doc.secrets,
            environment_overrides: doc.environments,
        }
    }
}

/// Reader for configuration documents.
pub struct ConfigReader;

impl ConfigReader {
    /// Find `darth-infra.toml` by walking up the directory tree from `start`.
    pub fn find(start: impl AsRef<Path>) -> ConfigResult<PathBuf> {
        let start = start.as_ref();
        let mut current = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                debug!("Found config at {:?}", candidate);
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ConfigError::NotFound {
                    file: CONFIG_FILENAME,
                    start: start.to_path_buf(),
                });
            }
        }
    }

    /// Load a project from `path`, or from the document found above the
    /// current directory when no path is given.
    pub fn load(path: Option<&Path>) -> ConfigResult<Project> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::find(std::env::current_dir()?)?,
        };
        info!("Loading configuration from {:?}", path);

        let content = fs::read_to_string(&path)?;
        Self::parse_str(&content)
    }

    /// Parse a document and apply defaults without validating it.
    pub fn parse_draft(content: &str) -> ConfigResult<ProjectDraft> {
        let document: Document = toml::from_str(content)?;
        Ok(document.into())
    }

    /// Parse a document, apply defaults and validate the result.
    pub fn parse_str(content: &str) -> ConfigResult<Project> {
        let project = Project::new(Self::parse_draft(content)?)?;
        debug!(
            "Parsed project '{}' ({} service(s))",
            project.name(),
            project.services().len()
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::models::{AlbMode, Architecture, LaunchType, SecretSource};

    #[test]
    fn test_parse_applies_defaults() {
        let project = ConfigReader::parse_str(
            r#"
[project]
name = "webapp"

[[services]]
name = "web"
port = 8000
domain = "app.example.com"

[rds]
database_name = "app"

[[secrets]]
name = "DJANGO_SECRET_KEY"
"#,
        )
        .unwrap();

        assert_eq!(project.aws_region(), "us-east-1");
        assert_eq!(project.vpc_name(), "artshumrc-prod-standard");
        assert_eq!(project.environments(), ["prod"]);

        let web = project.service("web").unwrap();
        assert_eq!(web.dockerfile, "Dockerfile");
        assert_eq!(web.build_context, ".");
        assert_eq!(web.health_check_path, "/health");
        assert_eq!((web.cpu, web.memory_mib, web.desired_count), (256, 512, 1));
        assert!(web.enable_exec);
        assert!(!web.enable_service_discovery);
        assert_eq!(web.launch_type, LaunchType::Fargate);

        let rds = project.rds().unwrap();
        assert_eq!(rds.instance_type, "t4g.micro");
        assert_eq!(rds.allocated_storage_gb, 20);
        assert_eq!(rds.engine_version, "15");
        assert_eq!(rds.backup_retention_days, 7);

        assert_eq!(project.alb().mode, AlbMode::Shared);

        let secret = project.secret("DJANGO_SECRET_KEY").unwrap();
        assert_eq!(secret.source, SecretSource::Generate);
        assert_eq!(secret.length, 50);
        assert!(secret.generate_once);
    }

    #[test]
    fn test_service_without_port_is_worker() {
        let project = ConfigReader::parse_str(
            r#"
[project]
name = "webapp"

[[services]]
name = "celery"
command = "celery -A app worker"
"#,
        )
        .unwrap();

        assert!(project.service("celery").unwrap().is_worker());
    }

    #[test]
    fn test_missing_required_fields() {
        for doc in [
            "[project]\naws_region = \"eu-west-1\"\n",
            "[project]\nname = \"x\"\n\n[[services]]\nport = 80\n",
            "[project]\nname = \"x\"\n\n[rds]\ninstance_type = \"t4g.small\"\n",
            "[project]\nname = \"x\"\n\n[[s3_buckets]]\ncors = true\n",
            "[project]\nname = \"x\"\n\n[[secrets]]\nsource = \"env\"\n",
            "[[services]]\nname = \"web\"\n",
        ] {
            let err = ConfigReader::parse_str(doc).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "{doc}: {err}");
        }
    }

    #[test]
    fn test_unknown_enum_values_rejected() {
        for doc in [
            "[project]\nname = \"x\"\n\n[[services]]\nname = \"w\"\nlaunch_type = \"lambda\"\n",
            "[project]\nname = \"x\"\n\n[[services]]\nname = \"w\"\narchitecture = \"riscv\"\n",
            "[project]\nname = \"x\"\n\n[[secrets]]\nname = \"K\"\nsource = \"vault\"\n",
            "[project]\nname = \"x\"\n\n[alb]\nmode = \"both\"\n",
        ] {
            let err = ConfigReader::parse_str(doc).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "{doc}: {err}");
        }
    }

    #[test]
    fn test_parse_runs_validation() {
        let err = ConfigReader::parse_str(
            r#"
[project]
name = "webapp"
environments = ["dev"]
"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::MissingProdEnvironment)
        ));
    }

    #[test]
    fn test_parse_draft_skips_validation() {
        let draft = ConfigReader::parse_draft(
            r#"
[project]
name = "webapp"
environments = ["dev"]

[[services]]
name = "web"
s3_access = ["missing"]
"#,
        )
        .unwrap();

        assert_eq!(draft.environments, vec!["dev"]);
        assert_eq!(draft.services[0].s3_access, vec!["missing"]);
        assert!(ConfigReader::parse_draft("[project]\n").is_err());
    }

    #[test]
    fn test_parse_ec2_service_derives_architecture() {
        let project = ConfigReader::parse_str(
            r#"
[project]
name = "search"
environments = ["dev", "prod"]

[[services]]
name = "opensearch"
image = "opensearchproject/opensearch:2"
port = 9200
launch_type = "ec2"
ec2_instance_type = "r7g.large"

[[services.ebs_volumes]]
name = "data"
size_gb = 100
mount_path = "/usr/share/opensearch/data"

[environments.dev]
instance_type_override = "t4g.small"

[environments.dev.ec2_instance_type_override]
opensearch = "t4g.large"
"#,
        )
        .unwrap();

        assert_eq!(project.environments(), ["prod", "dev"]);
        let svc = project.service("opensearch").unwrap();
        assert_eq!(svc.architecture, Some(Architecture::Arm64));
        assert_eq!(svc.ebs_volumes[0].device_name, "/dev/xvdf");
        assert_eq!(svc.ebs_volumes[0].volume_type, "gp3");
        assert_eq!(svc.ebs_volumes[0].filesystem_type, "ext4");

        let dev = project.environment_override("dev").unwrap();
        assert_eq!(dev.ec2_instance_type_override["opensearch"], "t4g.large");
    }
}
