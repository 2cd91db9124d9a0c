//! # darth_scaffold
//!
//! Turns a validated darth-infra [`Project`] into an AWS CDK (Python) project.
//!
//! Generation is a pure function of the project: the same configuration
//! always yields the same file set with the same contents. Optional
//! constructs (RDS, S3, CloudFront) are only emitted when the project uses
//! them; see [`ScaffoldPlan`].
//!
//! Rendering goes through the [`TemplateRenderer`] trait. The default
//! [`HandlebarsRenderer`] carries the template set inside the binary.

use std::path::{Path, PathBuf};

use darth_config::Project;

pub mod context;
pub mod error;
pub mod plan;
pub mod renderer;
pub mod scaffold;

pub use context::{EnvironmentContext, RenderContext, ServiceContext, ServiceEnvironmentContext};
pub use error::{RenderError, ScaffoldError, ScaffoldResult};
pub use plan::{RenderJob, ScaffoldPlan};
pub use renderer::{HandlebarsRenderer, TemplateRenderer};
pub use scaffold::{ProjectScaffold, SCHEMA_FILENAME};

/// Generate a project into `output_dir` with the built-in templates.
pub fn generate(project: &Project, output_dir: impl AsRef<Path>) -> ScaffoldResult<PathBuf> {
    ProjectScaffold::with_builtin_templates()?.generate(project, output_dir)
}
