//! Error types for project generation.

use std::path::PathBuf;
use thiserror::Error;

use darth_config::ConfigError;

/// Result type alias for scaffold operations.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Opaque error returned by a template renderer.
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while generating a project.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Template rendering failed for {template}: {source}")]
    Render {
        template: String,
        #[source]
        source: RenderError,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("User data script not found: {0:?}")]
    MissingBootScript(PathBuf),

    #[error("User data script path must be relative and stay inside the project: {0}")]
    UnsafeScriptPath(String),

    #[error("Failed to build template context: {0}")]
    Context(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
