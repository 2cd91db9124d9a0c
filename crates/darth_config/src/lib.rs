//! # darth_config
//!
//! Typed project configuration for darth-infra.
//!
//! A project describes one deployable application: its ECS services, an
//! optional RDS database, S3 buckets, the ALB, injected secrets and
//! per-environment overrides. It is persisted as `darth-infra.toml`.
//!
//! ## Features
//!
//! - **Validation**: a [`Project`] only exists once every invariant holds
//! - **Codec**: parse `darth-infra.toml` with defaults, dump it back canonically
//! - **Resolvers**: per-environment domains and instance types, CPU architecture
//! - **Builder**: screen-by-screen assembly for interactive front ends
//!
//! ## Example
//!
//! ```rust,no_run
//! use darth_config::{ProjectBuilder, Service};
//!
//! let project = ProjectBuilder::new("my-webapp")
//!     .environments(["dev", "prod"])
//!     .service(Service::new("django").with_domain("app.example.com"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(project.environments()[0], "prod");
//! let text = darth_config::dump(&project);
//! assert_eq!(darth_config::parse_str(&text).unwrap(), project);
//! ```

use std::path::{Path, PathBuf};

pub mod builder;
pub mod error;
pub mod models;
pub mod reader;
pub mod resolve;
pub mod validator;
pub mod writer;

pub use builder::ProjectBuilder;
pub use error::{ConfigError, ConfigResult, ValidationError};
pub use models::*;
pub use reader::{ConfigReader, CONFIG_FILENAME};
pub use resolve::{
    resolve_architecture, resolve_db_instance_type, resolve_domain, resolve_ec2_instance_type,
};
pub use validator::{ProjectValidator, ValidationReport};
pub use writer::ConfigWriter;

/// Locate `darth-infra.toml` in `start` or any parent directory.
pub fn find(start: impl AsRef<Path>) -> ConfigResult<PathBuf> {
    ConfigReader::find(start)
}

/// Load and validate a project. Without a path the document is searched for
/// from the current directory upwards.
pub fn load(path: Option<&Path>) -> ConfigResult<Project> {
    ConfigReader::load(path)
}

/// Parse and validate a document held in memory.
pub fn parse_str(content: &str) -> ConfigResult<Project> {
    ConfigReader::parse_str(content)
}

/// Serialize a project to canonical document text.
pub fn dump(project: &Project) -> String {
    ConfigWriter::dump(project)
}

/// Write the canonical document to `path`.
pub fn save(project: &Project, path: impl AsRef<Path>) -> ConfigResult<()> {
    ConfigWriter::save(project, path)
}
