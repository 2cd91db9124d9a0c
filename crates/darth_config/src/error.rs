//! Error types for the configuration model.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while locating, parsing or resolving a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find {file} in {start:?} or any parent directory")]
    NotFound { file: &'static str, start: PathBuf },

    #[error("Invalid configuration document: {0}")]
    Parse(String),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No RDS database configured")]
    NoDatabase,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string().trim_end().to_string())
    }
}

/// A violated project invariant, naming the offending entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Project name cannot be empty")]
    MissingProjectName,

    #[error("Project name '{0}' must be kebab-case: lowercase letters, digits and hyphens, starting with a letter")]
    InvalidProjectName(String),

    #[error("'prod' must be in the environments list")]
    MissingProdEnvironment,

    #[error("Environment '{0}' is listed more than once")]
    DuplicateEnvironment(String),

    #[error("Service names must be unique: '{0}' is declared more than once")]
    DuplicateService(String),

    #[error("S3 bucket names must be unique: '{0}' is declared more than once")]
    DuplicateBucket(String),

    #[error("Service '{service}' uses EC2 launch type but has no ec2_instance_type configured")]
    MissingInstanceType { service: String },

    #[error("Service '{service}' uses Fargate launch type but has ebs_volumes configured (EBS is EC2-only)")]
    VolumesRequireEc2 { service: String },

    #[error("RDS expose_to references unknown service '{service}'")]
    UnknownExposeTarget { service: String },

    #[error("Service '{service}' references unknown S3 bucket '{bucket}'")]
    UnknownBucket { service: String, bucket: String },

    #[error("Service '{service}' references unknown secret '{secret}'")]
    UnknownSecret { service: String, secret: String },

    #[error("Secret '{secret}' sets generate_once=false, which is not supported")]
    RegenerateUnsupported { secret: String },

    #[error("Service '{service}' exposes a port but has no domain")]
    PortWithoutDomain { service: String },
}

impl ValidationError {
    /// Name of the entity the violation is reported against.
    pub fn entity(&self) -> &str {
        match self {
            ValidationError::MissingProjectName => "project",
            ValidationError::MissingProdEnvironment => "prod",
            ValidationError::InvalidProjectName(name)
            | ValidationError::DuplicateEnvironment(name)
            | ValidationError::DuplicateService(name)
            | ValidationError::DuplicateBucket(name) => name,
            ValidationError::MissingInstanceType { service }
            | ValidationError::VolumesRequireEc2 { service }
            | ValidationError::UnknownExposeTarget { service }
            | ValidationError::UnknownBucket { service, .. }
            | ValidationError::UnknownSecret { service, .. }
            | ValidationError::PortWithoutDomain { service } => service,
            ValidationError::RegenerateUnsupported { secret } => secret,
        }
    }
}
