//! Step-by-step project assembly for interactive front ends.
//!
//! A wizard collects the project one screen at a time. Each screen hands its
//! typed record to the [`ProjectBuilder`]; nothing is checked until
//! [`ProjectBuilder::build`], which runs the full validation once and also
//! applies the rules only the wizard enforces.

use tracing::info;

use crate::error::ValidationError;
use crate::models::{
    Bucket, Database, EnvironmentOverride, LoadBalancer, Project, ProjectDraft, Secret, Service,
};

/// Accumulates a project across wizard screens.
#[derive(Debug, Clone, Default)]
pub struct ProjectBuilder {
    draft: ProjectDraft,
}

impl ProjectBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            draft: ProjectDraft::new(name),
        }
    }

    /// Resume editing an existing project.
    pub fn from_project(project: Project) -> Self {
        Self {
            draft: project.into_draft(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.draft.name = name.into();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.draft.aws_region = region.into();
        self
    }

    pub fn vpc(mut self, vpc_name: impl Into<String>) -> Self {
        self.draft.vpc_name = vpc_name.into();
        self
    }

    pub fn environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft.environments = environments.into_iter().map(Into::into).collect();
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.draft.tags.insert(key.into(), value.into());
        self
    }

    /// Add a service, replacing any earlier one with the same name.
    pub fn service(mut self, service: Service) -> Self {
        match self.draft.services.iter_mut().find(|s| s.name == service.name) {
            Some(existing) => *existing = service,
            None => self.draft.services.push(service),
        }
        self
    }

    pub fn remove_service(mut self, name: &str) -> Self {
        self.draft.services.retain(|s| s.name != name);
        self
    }

    pub fn database(mut self, database: Option<Database>) -> Self {
        self.draft.rds = database;
        self
    }

    /// Add a bucket, replacing any earlier one with the same name.
    pub fn bucket(mut self, bucket: Bucket) -> Self {
        match self.draft.s3_buckets.iter_mut().find(|b| b.name == bucket.name) {
            Some(existing) => *existing = bucket,
            None => self.draft.s3_buckets.push(bucket),
        }
        self
    }

    pub fn load_balancer(mut self, alb: LoadBalancer) -> Self {
        self.draft.alb = alb;
        self
    }

    /// Add a secret, replacing any earlier one with the same name.
    pub fn secret(mut self, secret: Secret) -> Self {
        match self.draft.secrets.iter_mut().find(|s| s.name == secret.name) {
            Some(existing) => *existing = secret,
            None => self.draft.secrets.push(secret),
        }
        self
    }

    pub fn environment_override(mut self, env: impl Into<String>, overrides: EnvironmentOverride) -> Self {
        self.draft.environment_overrides.insert(env.into(), overrides);
        self
    }

    /// The draft as assembled so far, for review screens.
    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    /// Validate everything and produce the project.
    pub fn build(self) -> Result<Project, Vec<ValidationError>> {
        let mut errors = Vec::new();

        // The model accepts a port without a domain; the wizard does not.
        for svc in &self.draft.services {
            if svc.port.is_some() && svc.domain.as_deref().map_or(true, str::is_empty) {
                errors.push(ValidationError::PortWithoutDomain {
                    service: svc.name.clone(),
                });
            }
        }

        let project = match Project::from_draft(self.draft) {
            Ok(project) if errors.is_empty() => project,
            Ok(_) => return Err(errors),
            Err(model_errors) => {
                errors.extend(model_errors);
                return Err(errors);
            }
        };

        info!(
            "Built project '{}' with {} service(s)",
            project.name(),
            project.services().len()
        );
        Ok(project)
    }
}
