//! Writing a generated CDK project to disk.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use darth_config::{Project, CONFIG_FILENAME};
use tracing::{debug, info, warn};

use crate::context::RenderContext;
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::plan::ScaffoldPlan;
use crate::renderer::{HandlebarsRenderer, TemplateRenderer};

/// File name of the JSON schema copied next to the configuration.
pub const SCHEMA_FILENAME: &str = "darth-infra.schema.json";

/// JSON schema for `darth-infra.toml`.
pub const SCHEMA: &str = include_str!("../schema/darth-infra.schema.json");

/// Generates a CDK project from a validated [`Project`].
pub struct ProjectScaffold<R = HandlebarsRenderer> {
    renderer: R,
    source_root: Option<PathBuf>,
    strict_boot_scripts: bool,
}

impl ProjectScaffold<HandlebarsRenderer> {
    /// Scaffold using the built-in templates.
    pub fn with_builtin_templates() -> ScaffoldResult<Self> {
        Ok(Self::new(HandlebarsRenderer::new()?))
    }
}

impl<R: TemplateRenderer> ProjectScaffold<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            source_root: None,
            strict_boot_scripts: false,
        }
    }

    /// Directory user data scripts are copied from. Defaults to the current
    /// working directory.
    pub fn with_source_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_root = Some(dir.into());
        self
    }

    /// Fail instead of skipping when a user data script does not exist.
    pub fn with_strict_boot_scripts(mut self, strict: bool) -> Self {
        self.strict_boot_scripts = strict;
        self
    }

    /// Render the project into `output_dir` and return its absolute path.
    ///
    /// Stops at the first failure. Files written before it stay on disk.
    pub fn generate(&self, project: &Project, output_dir: impl AsRef<Path>) -> ScaffoldResult<PathBuf> {
        let scripts = boot_scripts(project)?;

        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).map_err(|source| ScaffoldError::Write {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let output_dir = output_dir.canonicalize()?;

        info!("Generating project {} into {:?}", project.name(), output_dir);

        let context = RenderContext::new(project)?.to_value()?;
        let plan = ScaffoldPlan::for_project(project);

        for job in plan.jobs() {
            let content = self
                .renderer
                .render(job.template, &context)
                .map_err(|source| ScaffoldError::Render {
                    template: job.template.to_string(),
                    source,
                })?;
            write_file(&output_dir.join(&job.output), &content)?;
        }

        write_file(&output_dir.join(CONFIG_FILENAME), &darth_config::dump(project))?;
        write_file(&output_dir.join(SCHEMA_FILENAME), SCHEMA)?;

        self.copy_boot_scripts(&scripts, &output_dir)?;

        info!(
            "Generated {} files for {}",
            plan.len() + 2,
            project.name()
        );
        Ok(output_dir)
    }

    fn copy_boot_scripts(&self, scripts: &[&Path], output_dir: &Path) -> ScaffoldResult<()> {
        if scripts.is_empty() {
            return Ok(());
        }

        let source_root = match &self.source_root {
            Some(dir) => dir.clone(),
            None => env::current_dir()?,
        };

        for &relative in scripts {
            let from = source_root.join(relative);
            let to = output_dir.join(relative);

            if !from.is_file() {
                if self.strict_boot_scripts {
                    return Err(ScaffoldError::MissingBootScript(from));
                }
                warn!("User data script {:?} not found, skipping", from);
                continue;
            }

            // Copying a file onto itself truncates it.
            if to.is_file() && from.canonicalize()? == to.canonicalize()? {
                debug!("User data script {:?} already in place", relative);
                continue;
            }

            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent).map_err(|source| ScaffoldError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::copy(&from, &to).map_err(|source| ScaffoldError::Copy {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            debug!("Copied: {:?}", relative);
        }

        Ok(())
    }
}

/// User data scripts of every service, checked before anything is written.
fn boot_scripts(project: &Project) -> ScaffoldResult<Vec<&Path>> {
    project
        .services()
        .iter()
        .filter_map(|s| s.user_data_script.as_deref())
        .map(checked_relative)
        .collect()
}

/// Accept only relative paths that cannot leave the directory they are joined to.
fn checked_relative(script: &str) -> ScaffoldResult<&Path> {
    let path = Path::new(script);
    let mut normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal = true,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) | Component::ParentDir => {
                return Err(ScaffoldError::UnsafeScriptPath(script.to_string()));
            }
        }
    }
    if !normal {
        return Err(ScaffoldError::UnsafeScriptPath(script.to_string()));
    }
    Ok(path)
}

fn write_file(path: &Path, content: &str) -> ScaffoldResult<()> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    };
    write().map_err(|source| ScaffoldError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_relative() {
        assert!(checked_relative("scripts/boot.sh").is_ok());
        assert!(checked_relative("./boot.sh").is_ok());
        assert!(matches!(
            checked_relative("/etc/passwd"),
            Err(ScaffoldError::UnsafeScriptPath(_))
        ));
        assert!(matches!(
            checked_relative("../outside.sh"),
            Err(ScaffoldError::UnsafeScriptPath(_))
        ));
        assert!(matches!(
            checked_relative("scripts/../../x.sh"),
            Err(ScaffoldError::UnsafeScriptPath(_))
        ));
        assert!(checked_relative("").is_err());
        assert!(checked_relative(".").is_err());
    }

    #[test]
    fn test_schema_is_json() {
        let schema: serde_json::Value = serde_json::from_str(SCHEMA).unwrap();
        assert_eq!(schema["title"], "darth-infra configuration");
        assert!(schema["properties"]["services"].is_object());
    }
}
