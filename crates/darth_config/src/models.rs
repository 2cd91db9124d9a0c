//! Data models for darth-infra projects.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default AWS region for new projects.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Name tag of the VPC projects deploy into unless told otherwise.
pub const DEFAULT_VPC_NAME: &str = "artshumrc-prod-standard";

/// The environment every project must declare.
pub const PROD_ENVIRONMENT: &str = "prod";

mod defaults {
    use super::{Database, Secret, Service, Volume};

    pub fn yes() -> bool {
        true
    }

    pub fn secret_length() -> u32 {
        Secret::DEFAULT_LENGTH
    }

    pub fn db_instance_type() -> String {
        Database::DEFAULT_INSTANCE_TYPE.to_string()
    }

    pub fn db_storage_gb() -> u32 {
        Database::DEFAULT_STORAGE_GB
    }

    pub fn db_engine_version() -> String {
        Database::DEFAULT_ENGINE_VERSION.to_string()
    }

    pub fn db_backup_retention_days() -> u32 {
        Database::DEFAULT_BACKUP_RETENTION_DAYS
    }

    pub fn device_name() -> String {
        Volume::DEFAULT_DEVICE_NAME.to_string()
    }

    pub fn volume_type() -> String {
        Volume::DEFAULT_VOLUME_TYPE.to_string()
    }

    pub fn filesystem_type() -> String {
        Volume::DEFAULT_FILESYSTEM.to_string()
    }

    pub fn dockerfile() -> String {
        Service::DEFAULT_DOCKERFILE.to_string()
    }

    pub fn build_context() -> String {
        Service::DEFAULT_BUILD_CONTEXT.to_string()
    }

    pub fn health_check_path() -> String {
        Service::DEFAULT_HEALTH_CHECK_PATH.to_string()
    }

    pub fn cpu() -> u32 {
        Service::DEFAULT_CPU
    }

    pub fn memory_mib() -> u32 {
        Service::DEFAULT_MEMORY_MIB
    }

    pub fn desired_count() -> u32 {
        Service::DEFAULT_DESIRED_COUNT
    }
}

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ConfigError::Parse(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

/// How a secret value is sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    /// Random value created once per environment.
    #[default]
    Generate,
    /// Existing Secrets Manager secret named in the deployer's environment.
    Env,
}

string_enum!(SecretSource { Generate => "generate", Env => "env" });

/// Whether to look up a shared ALB or provision a dedicated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbMode {
    #[default]
    Shared,
    Dedicated,
}

string_enum!(AlbMode { Shared => "shared", Dedicated => "dedicated" });

/// ECS launch type for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchType {
    #[default]
    Fargate,
    Ec2,
}

string_enum!(LaunchType { Fargate => "fargate", Ec2 => "ec2" });

/// CPU architecture for EC2-backed tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "arm64")]
    Arm64,
}

string_enum!(Architecture { X86_64 => "x86_64", Arm64 => "arm64" });

/// A secret injected into containers as an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Environment variable name, e.g. `DJANGO_SECRET_KEY`.
    pub name: String,
    #[serde(default)]
    pub source: SecretSource,
    /// Character length for generated values.
    #[serde(default = "defaults::secret_length")]
    pub length: u32,
    #[serde(default = "defaults::yes")]
    pub generate_once: bool,
}

impl Secret {
    pub const DEFAULT_LENGTH: u32 = 50;

    /// A secret generated once per environment.
    pub fn generated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: SecretSource::Generate,
            length: Self::DEFAULT_LENGTH,
            generate_once: true,
        }
    }

    /// A secret imported from the deployer's environment.
    pub fn from_env(name: impl Into<String>) -> Self {
        Self {
            source: SecretSource::Env,
            ..Self::generated(name)
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn with_generate_once(mut self, generate_once: bool) -> Self {
        self.generate_once = generate_once;
        self
    }
}

/// An S3 bucket provisioned per environment as `{project}-{env}-{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    #[serde(default)]
    pub public_read: bool,
    /// Put a CloudFront distribution in front of the bucket.
    #[serde(default)]
    pub cloudfront: bool,
    #[serde(default)]
    pub cors: bool,
}

impl Bucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_read: false,
            cloudfront: false,
            cors: false,
        }
    }

    pub fn with_public_read(mut self, public_read: bool) -> Self {
        self.public_read = public_read;
        self
    }

    pub fn with_cloudfront(mut self, cloudfront: bool) -> Self {
        self.cloudfront = cloudfront;
        self
    }

    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }
}

/// RDS PostgreSQL instance shared by the project's services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub database_name: String,
    #[serde(default = "defaults::db_instance_type")]
    pub instance_type: String,
    #[serde(default = "defaults::db_storage_gb")]
    pub allocated_storage_gb: u32,
    /// Services that receive connection environment variables.
    #[serde(default)]
    pub expose_to: Vec<String>,
    #[serde(default = "defaults::db_engine_version")]
    pub engine_version: String,
    #[serde(default = "defaults::db_backup_retention_days")]
    pub backup_retention_days: u32,
}

impl Database {
    pub const DEFAULT_INSTANCE_TYPE: &'static str = "t4g.micro";
    pub const DEFAULT_STORAGE_GB: u32 = 20;
    pub const DEFAULT_ENGINE_VERSION: &'static str = "15";
    pub const DEFAULT_BACKUP_RETENTION_DAYS: u32 = 7;

    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            instance_type: Self::DEFAULT_INSTANCE_TYPE.to_string(),
            allocated_storage_gb: Self::DEFAULT_STORAGE_GB,
            expose_to: Vec::new(),
            engine_version: Self::DEFAULT_ENGINE_VERSION.to_string(),
            backup_retention_days: Self::DEFAULT_BACKUP_RETENTION_DAYS,
        }
    }

    pub fn with_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = instance_type.into();
        self
    }

    pub fn with_storage_gb(mut self, gb: u32) -> Self {
        self.allocated_storage_gb = gb;
        self
    }

    pub fn expose_to(mut self, service: impl Into<String>) -> Self {
        self.expose_to.push(service.into());
        self
    }

    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = version.into();
        self
    }

    pub fn with_backup_retention_days(mut self, days: u32) -> Self {
        self.backup_retention_days = days;
        self
    }
}

/// A Linux ulimit set on a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ulimit {
    /// Ulimit name, e.g. `nofile`.
    pub name: String,
    pub soft_limit: i64,
    pub hard_limit: i64,
}

impl Ulimit {
    pub fn new(name: impl Into<String>, soft_limit: i64, hard_limit: i64) -> Self {
        Self {
            name: name.into(),
            soft_limit,
            hard_limit,
        }
    }
}

/// An EBS volume attached to an EC2-backed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    pub size_gb: u32,
    pub mount_path: String,
    #[serde(default = "defaults::device_name")]
    pub device_name: String,
    #[serde(default = "defaults::volume_type")]
    pub volume_type: String,
    #[serde(default = "defaults::filesystem_type")]
    pub filesystem_type: String,
}

impl Volume {
    pub const DEFAULT_DEVICE_NAME: &'static str = "/dev/xvdf";
    pub const DEFAULT_VOLUME_TYPE: &'static str = "gp3";
    pub const DEFAULT_FILESYSTEM: &'static str = "ext4";

    pub fn new(name: impl Into<String>, size_gb: u32, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_gb,
            mount_path: mount_path.into(),
            device_name: Self::DEFAULT_DEVICE_NAME.to_string(),
            volume_type: Self::DEFAULT_VOLUME_TYPE.to_string(),
            filesystem_type: Self::DEFAULT_FILESYSTEM.to_string(),
        }
    }

    pub fn with_device_name(mut self, device: impl Into<String>) -> Self {
        self.device_name = device.into();
        self
    }

    pub fn with_volume_type(mut self, volume_type: impl Into<String>) -> Self {
        self.volume_type = volume_type.into();
        self
    }

    pub fn with_filesystem(mut self, filesystem: impl Into<String>) -> Self {
        self.filesystem_type = filesystem.into();
        self
    }
}

/// Application Load Balancer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    pub mode: AlbMode,
    /// Name of the existing ALB looked up in shared mode.
    pub shared_alb_name: String,
    pub certificate_arn: Option<String>,
}

impl LoadBalancer {
    pub fn shared(name: impl Into<String>) -> Self {
        Self {
            mode: AlbMode::Shared,
            shared_alb_name: name.into(),
            certificate_arn: None,
        }
    }

    pub fn dedicated(certificate_arn: impl Into<String>) -> Self {
        Self {
            mode: AlbMode::Dedicated,
            shared_alb_name: String::new(),
            certificate_arn: Some(certificate_arn.into()),
        }
    }
}

/// A single ECS service (container) running on Fargate or EC2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default = "defaults::dockerfile")]
    pub dockerfile: String,
    #[serde(default = "defaults::build_context")]
    pub build_context: String,
    /// Externally hosted image; when set the image is not built or pushed.
    #[serde(default)]
    pub image: Option<String>,
    /// Container port behind the ALB. `None` marks a background worker, which
    /// is also what a document without a `port` key means.
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "defaults::health_check_path")]
    pub health_check_path: String,
    #[serde(default = "defaults::cpu")]
    pub cpu: u32,
    #[serde(default = "defaults::memory_mib")]
    pub memory_mib: u32,
    #[serde(default = "defaults::desired_count")]
    pub desired_count: u32,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub secrets: Vec<String>,
    #[serde(default)]
    pub s3_access: Vec<String>,
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default)]
    pub ulimits: Vec<Ulimit>,
    #[serde(default = "defaults::yes")]
    pub enable_exec: bool,
    #[serde(default)]
    pub launch_type: LaunchType,
    #[serde(default)]
    pub ec2_instance_type: Option<String>,
    #[serde(default)]
    pub architecture: Option<Architecture>,
    /// EC2 user data script, relative to the project root.
    #[serde(default)]
    pub user_data_script: Option<String>,
    #[serde(default)]
    pub ebs_volumes: Vec<Volume>,
    #[serde(default)]
    pub enable_service_discovery: bool,
}

impl Service {
    pub const DEFAULT_DOCKERFILE: &'static str = "Dockerfile";
    pub const DEFAULT_BUILD_CONTEXT: &'static str = ".";
    pub const DEFAULT_PORT: u16 = 8000;
    pub const DEFAULT_HEALTH_CHECK_PATH: &'static str = "/health";
    pub const DEFAULT_CPU: u32 = 256;
    pub const DEFAULT_MEMORY_MIB: u32 = 512;
    pub const DEFAULT_DESIRED_COUNT: u32 = 1;

    /// A Fargate web service listening on the default port.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dockerfile: Self::DEFAULT_DOCKERFILE.to_string(),
            build_context: Self::DEFAULT_BUILD_CONTEXT.to_string(),
            image: None,
            port: Some(Self::DEFAULT_PORT),
            health_check_path: Self::DEFAULT_HEALTH_CHECK_PATH.to_string(),
            cpu: Self::DEFAULT_CPU,
            memory_mib: Self::DEFAULT_MEMORY_MIB,
            desired_count: Self::DEFAULT_DESIRED_COUNT,
            command: None,
            domain: None,
            secrets: Vec::new(),
            s3_access: Vec::new(),
            environment_variables: BTreeMap::new(),
            ulimits: Vec::new(),
            enable_exec: true,
            launch_type: LaunchType::Fargate,
            ec2_instance_type: None,
            architecture: None,
            user_data_script: None,
            ebs_volumes: Vec::new(),
            enable_service_discovery: false,
        }
    }

    /// A service without a port, never registered with the ALB.
    pub fn worker(name: impl Into<String>) -> Self {
        Self::new(name).with_port(None)
    }

    pub fn with_dockerfile(mut self, dockerfile: impl Into<String>) -> Self {
        self.dockerfile = dockerfile.into();
        self
    }

    pub fn with_build_context(mut self, context: impl Into<String>) -> Self {
        self.build_context = context.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn with_health_check_path(mut self, path: impl Into<String>) -> Self {
        self.health_check_path = path.into();
        self
    }

    pub fn with_resources(mut self, cpu: u32, memory_mib: u32) -> Self {
        self.cpu = cpu;
        self.memory_mib = memory_mib;
        self
    }

    pub fn with_desired_count(mut self, count: u32) -> Self {
        self.desired_count = count;
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secrets.push(secret.into());
        self
    }

    pub fn with_s3_access(mut self, bucket: impl Into<String>) -> Self {
        self.s3_access.push(bucket.into());
        self
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment_variables.insert(key.into(), value.into());
        self
    }

    pub fn with_ulimit(mut self, ulimit: Ulimit) -> Self {
        self.ulimits.push(ulimit);
        self
    }

    pub fn with_exec(mut self, enabled: bool) -> Self {
        self.enable_exec = enabled;
        self
    }

    /// Switch to the EC2 launch type on the given instance type.
    pub fn on_ec2(mut self, instance_type: impl Into<String>) -> Self {
        self.launch_type = LaunchType::Ec2;
        self.ec2_instance_type = Some(instance_type.into());
        self
    }

    pub fn with_launch_type(mut self, launch_type: LaunchType) -> Self {
        self.launch_type = launch_type;
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = Some(architecture);
        self
    }

    pub fn with_user_data_script(mut self, path: impl Into<String>) -> Self {
        self.user_data_script = Some(path.into());
        self
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.ebs_volumes.push(volume);
        self
    }

    pub fn with_service_discovery(mut self, enabled: bool) -> Self {
        self.enable_service_discovery = enabled;
        self
    }

    pub fn is_worker(&self) -> bool {
        self.port.is_none()
    }

    pub fn is_ec2(&self) -> bool {
        self.launch_type == LaunchType::Ec2
    }
}

/// Per-environment deviations from base service and database settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentOverride {
    /// Service name to domain for this environment.
    pub domain_overrides: BTreeMap<String, String>,
    /// RDS instance type for this environment.
    pub instance_type_override: Option<String>,
    /// Service name to EC2 instance type for this environment.
    pub ec2_instance_type_override: BTreeMap<String, String>,
}

impl EnvironmentOverride {
    pub fn with_domain(mut self, service: impl Into<String>, domain: impl Into<String>) -> Self {
        self.domain_overrides.insert(service.into(), domain.into());
        self
    }

    pub fn with_db_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type_override = Some(instance_type.into());
        self
    }

    pub fn with_ec2_instance_type(
        mut self,
        service: impl Into<String>,
        instance_type: impl Into<String>,
    ) -> Self {
        self.ec2_instance_type_override
            .insert(service.into(), instance_type.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.domain_overrides.is_empty()
            && self.instance_type_override.is_none()
            && self.ec2_instance_type_override.is_empty()
    }
}

/// Unvalidated project fields, as assembled by a parser or a wizard.
///
/// Turning a draft into a [`Project`] runs every invariant check; see
/// [`Project::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub aws_region: String,
    pub vpc_name: String,
    pub environments: Vec<String>,
    pub tags: BTreeMap<String, String>,
    pub services: Vec<Service>,
    pub rds: Option<Database>,
    pub s3_buckets: Vec<Bucket>,
    pub alb: LoadBalancer,
    pub secrets: Vec<Secret>,
    pub environment_overrides: BTreeMap<String, EnvironmentOverride>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            aws_region: DEFAULT_REGION.to_string(),
            vpc_name: DEFAULT_VPC_NAME.to_string(),
            environments: vec![PROD_ENVIRONMENT.to_string()],
            tags: BTreeMap::new(),
            services: Vec::new(),
            rds: None,
            s3_buckets: Vec::new(),
            alb: LoadBalancer::default(),
            secrets: Vec::new(),
            environment_overrides: BTreeMap::new(),
        }
    }
}

/// A validated project configuration. Written to and read from `darth-infra.toml`.
///
/// Instances only exist after every invariant has passed, so fields are
/// read-only; call [`Project::into_draft`] to edit and revalidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub(crate) draft: ProjectDraft,
}

impl Project {
    pub fn name(&self) -> &str {
        &self.draft.name
    }

    pub fn aws_region(&self) -> &str {
        &self.draft.aws_region
    }

    pub fn vpc_name(&self) -> &str {
        &self.draft.vpc_name
    }

    /// Environment names; `prod` is always first.
    pub fn environments(&self) -> &[String] {
        &self.draft.environments
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.draft.tags
    }

    pub fn services(&self) -> &[Service] {
        &self.draft.services
    }

    pub fn rds(&self) -> Option<&Database> {
        self.draft.rds.as_ref()
    }

    pub fn s3_buckets(&self) -> &[Bucket] {
        &self.draft.s3_buckets
    }

    pub fn alb(&self) -> &LoadBalancer {
        &self.draft.alb
    }

    pub fn secrets(&self) -> &[Secret] {
        &self.draft.secrets
    }

    pub fn environment_overrides(&self) -> &BTreeMap<String, EnvironmentOverride> {
        &self.draft.environment_overrides
    }

    pub fn environment_override(&self, env: &str) -> Option<&EnvironmentOverride> {
        self.draft.environment_overrides.get(env)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.draft.services.iter().find(|s| s.name == name)
    }

    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.draft.s3_buckets.iter().find(|b| b.name == name)
    }

    pub fn secret(&self, name: &str) -> Option<&Secret> {
        self.draft.secrets.iter().find(|s| s.name == name)
    }

    pub fn has_cloudfront(&self) -> bool {
        self.draft.s3_buckets.iter().any(|b| b.cloudfront)
    }

    pub fn has_ec2(&self) -> bool {
        self.draft.services.iter().any(Service::is_ec2)
    }

    pub fn has_ebs(&self) -> bool {
        self.draft.services.iter().any(|s| !s.ebs_volumes.is_empty())
    }

    pub fn has_service_discovery(&self) -> bool {
        self.draft.services.iter().any(|s| s.enable_service_discovery)
    }

    /// Release the fields for editing. The result must be validated again.
    pub fn into_draft(self) -> ProjectDraft {
        self.draft
    }
}

impl AsRef<ProjectDraft> for Project {
    fn as_ref(&self) -> &ProjectDraft {
        &self.draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_string_forms() {
        assert_eq!(LaunchType::Ec2.as_str(), "ec2");
        assert_eq!("fargate".parse::<LaunchType>().unwrap(), LaunchType::Fargate);
        assert_eq!("arm64".parse::<Architecture>().unwrap(), Architecture::Arm64);
        assert_eq!(AlbMode::Dedicated.to_string(), "dedicated");
        assert_eq!("env".parse::<SecretSource>().unwrap(), SecretSource::Env);
    }

    #[test]
    fn test_unknown_enum_string_is_parse_error() {
        let err = "lambda".parse::<LaunchType>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("lambda"));

        // Case matters: the document format only knows the lowercase forms.
        assert!("EC2".parse::<LaunchType>().is_err());
    }

    #[test]
    fn test_service_defaults() {
        let svc = Service::new("web");
        assert_eq!(svc.port, Some(8000));
        assert_eq!(svc.cpu, 256);
        assert_eq!(svc.memory_mib, 512);
        assert!(svc.enable_exec);
        assert_eq!(svc.launch_type, LaunchType::Fargate);
        assert!(Service::worker("celery").is_worker());
    }

    #[test]
    fn test_secret_constructors() {
        let generated = Secret::generated("DJANGO_SECRET_KEY");
        assert_eq!(generated.source, SecretSource::Generate);
        assert_eq!(generated.length, 50);
        assert!(generated.generate_once);

        let imported = Secret::from_env("API_TOKEN");
        assert_eq!(imported.source, SecretSource::Env);
    }
}
