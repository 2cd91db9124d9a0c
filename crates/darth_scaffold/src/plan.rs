//! Which templates are rendered for a project, and where they land.

use std::path::{Path, PathBuf};

use darth_config::Project;

/// Top-level files and the stacks package, always rendered.
const CORE_TEMPLATES: &[&str] = &[
    "app.py",
    "cdk.json",
    "pyproject.toml",
    "README.md",
    "stacks/__init__.py",
    "stacks/main_stack.py",
    "stacks/constructs/__init__.py",
];

/// Constructs every project needs.
const ALWAYS_CONSTRUCTS: &[&str] = &[
    "stacks/constructs/ecr_repository.py",
    "stacks/constructs/ecs_service.py",
    "stacks/constructs/alb.py",
    "stacks/constructs/secrets.py",
];

pub const RDS_CONSTRUCT: &str = "stacks/constructs/rds_database.py";
pub const S3_CONSTRUCT: &str = "stacks/constructs/s3_bucket.py";
pub const CLOUDFRONT_CONSTRUCT: &str = "stacks/constructs/cloudfront_distribution.py";

/// A single template to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub template: &'static str,
    /// Path relative to the output directory.
    pub output: PathBuf,
}

impl RenderJob {
    fn new(template: &'static str) -> Self {
        Self {
            template,
            output: template.split('/').collect(),
        }
    }
}

/// Ordered render jobs for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    jobs: Vec<RenderJob>,
}

impl ScaffoldPlan {
    pub fn for_project(project: &Project) -> Self {
        let mut jobs: Vec<RenderJob> = CORE_TEMPLATES
            .iter()
            .chain(ALWAYS_CONSTRUCTS)
            .copied()
            .map(RenderJob::new)
            .collect();

        if project.rds().is_some() {
            jobs.push(RenderJob::new(RDS_CONSTRUCT));
        }
        if !project.s3_buckets().is_empty() {
            jobs.push(RenderJob::new(S3_CONSTRUCT));
        }
        if project.has_cloudfront() {
            jobs.push(RenderJob::new(CLOUDFRONT_CONSTRUCT));
        }

        Self { jobs }
    }

    pub fn jobs(&self) -> &[RenderJob] {
        &self.jobs
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.jobs.iter().map(|j| j.output.as_path())
    }

    pub fn contains(&self, output: impl AsRef<Path>) -> bool {
        let output = output.as_ref();
        self.outputs().any(|o| o == output)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
