//! Project invariant checks.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{ConfigResult, ValidationError};
use crate::models::{LaunchType, Project, ProjectDraft, SecretSource, PROD_ENVIRONMENT};
use crate::resolve::resolve_architecture;

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Validator for project drafts.
///
/// Every check is an independent predicate over the assembled draft, so the
/// order they run in does not affect the outcome.
pub struct ProjectValidator;

impl ProjectValidator {
    /// Run every check against a draft without modifying it. Warnings are
    /// returned, not logged.
    pub fn validate(draft: &ProjectDraft) -> ValidationReport {
        let mut report = ValidationReport::new();

        report.merge(Self::validate_project(draft));
        report.merge(Self::validate_environments(draft));
        report.merge(Self::validate_services(draft));
        report.merge(Self::validate_buckets(draft));
        report.merge(Self::validate_secrets(draft));
        report.merge(Self::validate_references(draft));
        report.merge(Self::validate_overrides(draft));
        report
    }

    /// Apply the normalizations a valid draft receives: `prod` moves to the
    /// front of the environment list and EC2 services without an explicit
    /// architecture get one derived from their instance type.
    pub fn normalize(draft: &mut ProjectDraft) {
        if let Some(pos) = draft.environments.iter().position(|e| e == PROD_ENVIRONMENT) {
            if pos != 0 {
                let prod = draft.environments.remove(pos);
                draft.environments.insert(0, prod);
            }
        }

        for svc in &mut draft.services {
            if svc.launch_type != LaunchType::Ec2 || svc.architecture.is_some() {
                continue;
            }
            if let Some(instance_type) = &svc.ec2_instance_type {
                let arch = resolve_architecture(instance_type);
                debug!("Derived architecture {} for service '{}'", arch, svc.name);
                svc.architecture = Some(arch);
            }
        }
    }

    /// Check the project name. It is spliced into resource names and
    /// generated source files.
    pub fn validate_project(draft: &ProjectDraft) -> ValidationReport {
        let mut report = ValidationReport::new();

        if draft.name.trim().is_empty() {
            report.add_error(ValidationError::MissingProjectName);
        } else if !is_kebab_case(&draft.name) {
            report.add_error(ValidationError::InvalidProjectName(draft.name.clone()));
        }

        report
    }

    /// Check the environment list.
    pub fn validate_environments(draft: &ProjectDraft) -> ValidationReport {
        let mut report = ValidationReport::new();

        if !draft.environments.iter().any(|e| e == PROD_ENVIRONMENT) {
            report.add_error(ValidationError::MissingProdEnvironment);
        }

        for name in duplicates(draft.environments.iter().map(String::as_str)) {
            report.add_error(ValidationError::DuplicateEnvironment(name));
        }

        report
    }

    /// Check per-service rules.
    pub fn validate_services(draft: &ProjectDraft) -> ValidationReport {
        let mut report = ValidationReport::new();

        for name in duplicates(draft.services.iter().map(|s| s.name.as_str())) {
            report.add_error(ValidationError::DuplicateService(name));
        }

        for svc in &draft.services {
            match svc.launch_type {
                LaunchType::Ec2 => {
                    if svc.ec2_instance_type.as_deref().map_or(true, str::is_empty) {
                        report.add_error(ValidationError::MissingInstanceType {
                            service: svc.name.clone(),
                        });
                    }
                }
                LaunchType::Fargate => {
                    if !svc.ebs_volumes.is_empty() {
                        report.add_error(ValidationError::VolumesRequireEc2 {
                            service: svc.name.clone(),
                        });
                    }
                    if svc.user_data_script.is_some() {
                        report.add_warning(format!(
                            "Service '{}' sets user_data_script but runs on Fargate; the script is only used on EC2",
                            svc.name
                        ));
                    }
                }
            }
        }

        report
    }

    /// Check bucket names.
    pub fn validate_buckets(draft: &ProjectDraft) -> ValidationReport {
        let mut report = ValidationReport::new();

        for name in duplicates(draft.s3_buckets.iter().map(|b| b.name.as_str())) {
            report.add_error(ValidationError::DuplicateBucket(name));
        }

        report
    }

    /// Check secret definitions.
    pub fn validate_secrets(draft: &ProjectDraft) -> ValidationReport {
        let mut report = ValidationReport::new();

        for secret in &draft.secrets {
            if secret.source == SecretSource::Generate && !secret.generate_once {
                report.add_error(ValidationError::RegenerateUnsupported {
                    secret: secret.name.clone(),
                });
            }
        }

        report
    }

    /// Check that every cross-reference names an existing entity.
    pub fn validate_references(draft: &ProjectDraft) -> ValidationReport {
        let mut report = ValidationReport::new();

        let service_names: HashSet<&str> = draft.services.iter().map(|s| s.name.as_str()).collect();
        let bucket_names: HashSet<&str> = draft.s3_buckets.iter().map(|b| b.name.as_str()).collect();
        let secret_names: HashSet<&str> = draft.secrets.iter().map(|s| s.name.as_str()).collect();

        if let Some(rds) = &draft.rds {
            for svc_name in &rds.expose_to {
                if !service_names.contains(svc_name.as_str()) {
                    report.add_error(ValidationError::UnknownExposeTarget {
                        service: svc_name.clone(),
                    });
                }
            }
        }

        for svc in &draft.services {
            for bucket in &svc.s3_access {
                if !bucket_names.contains(bucket.as_str()) {
                    report.add_error(ValidationError::UnknownBucket {
                        service: svc.name.clone(),
                        bucket: bucket.clone(),
                    });
                }
            }
            for secret in &svc.secrets {
                if !secret_names.contains(secret.as_str()) {
                    report.add_error(ValidationError::UnknownSecret {
                        service: svc.name.clone(),
                        secret: secret.clone(),
                    });
                }
            }
        }

        report
    }

    /// Overrides that point nowhere are harmless but almost always typos.
    pub fn validate_overrides(draft: &ProjectDraft) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (env, overrides) in &draft.environment_overrides {
            if !draft.environments.contains(env) {
                report.add_warning(format!(
                    "Overrides for environment '{}' which is not in the environments list",
                    env
                ));
            }
            let services = overrides
                .domain_overrides
                .keys()
                .chain(overrides.ec2_instance_type_override.keys());
            for svc_name in services {
                if !draft.services.iter().any(|s| &s.name == svc_name) {
                    report.add_warning(format!(
                        "Environment '{}' overrides unknown service '{}'",
                        env, svc_name
                    ));
                }
            }
            if overrides.instance_type_override.is_some() && draft.rds.is_none() {
                report.add_warning(format!(
                    "Environment '{}' overrides the RDS instance type but no database is configured",
                    env
                ));
            }
        }

        report
    }
}

impl Project {
    /// Validate a draft and build the project from it.
    ///
    /// Fails with the first violated invariant; nothing is normalized unless
    /// every check passes.
    pub fn new(draft: ProjectDraft) -> ConfigResult<Self> {
        Self::from_draft(draft).map_err(|mut errors| errors.swap_remove(0).into())
    }

    /// Like [`Project::new`] but reports every violation.
    pub fn from_draft(mut draft: ProjectDraft) -> Result<Self, Vec<ValidationError>> {
        let report = ProjectValidator::validate(&draft);
        if !report.is_valid() {
            return Err(report.errors);
        }
        for warning in &report.warnings {
            warn!("{}", warning);
        }

        ProjectValidator::normalize(&mut draft);
        Ok(Self { draft })
    }
}

impl TryFrom<ProjectDraft> for Project {
    type Error = crate::error::ConfigError;

    fn try_from(draft: ProjectDraft) -> ConfigResult<Self> {
        Project::new(draft)
    }
}

/// Names occurring more than once, each reported once in first-seen order.
fn duplicates<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut dupes = Vec::new();

    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            dupes.push(name.to_string());
        }
    }

    dupes
}

fn is_kebab_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use crate::models::{Architecture, Secret, Service};

    fn draft() -> ProjectDraft {
        let mut draft = ProjectDraft::new("webapp");
        draft.services.push(Service::new("web").with_domain("app.example.com"));
        draft
    }

    #[test]
    fn test_duplicates_reported_once() {
        let names = ["a", "b", "a", "a", "c", "b"];
        assert_eq!(duplicates(names.into_iter()), vec!["a", "b"]);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut d = draft();
        d.environments = vec!["dev".to_string()];
        d.services.push(Service::new("web"));
        d.secrets.push(Secret::generated("KEY").with_generate_once(false));

        let report = ProjectValidator::validate(&d);
        assert!(!report.is_valid());
        assert!(report.errors.contains(&ValidationError::MissingProdEnvironment));
        assert!(report
            .errors
            .contains(&ValidationError::DuplicateService("web".to_string())));
        assert!(report.errors.contains(&ValidationError::RegenerateUnsupported {
            secret: "KEY".to_string()
        }));
    }

    #[test]
    fn test_env_secret_may_regenerate() {
        let mut d = draft();
        d.secrets.push(Secret::from_env("TOKEN").with_generate_once(false));
        assert!(ProjectValidator::validate(&d).is_valid());
    }

    #[test]
    fn test_normalize_derives_architecture_for_ec2_only() {
        let mut d = draft();
        d.services.push(Service::new("search").on_ec2("c7g.large"));
        d.services.push(
            Service::new("batch")
                .on_ec2("c7g.large")
                .with_architecture(Architecture::X86_64),
        );

        ProjectValidator::normalize(&mut d);

        assert_eq!(d.services[0].architecture, None);
        assert_eq!(d.services[1].architecture, Some(Architecture::Arm64));
        // Explicit values are never replaced.
        assert_eq!(d.services[2].architecture, Some(Architecture::X86_64));
    }

    #[test]
    fn test_project_name_format() {
        for name in ["webapp", "my-webapp", "app2", "a"] {
            let mut d = draft();
            d.name = name.to_string();
            assert!(ProjectValidator::validate(&d).is_valid(), "{name}");
        }

        for name in ["My-App", "my_app", "2fast", "web-", "a\"b", "-web"] {
            let mut d = draft();
            d.name = name.to_string();
            assert_eq!(
                ProjectValidator::validate(&d).errors,
                vec![ValidationError::InvalidProjectName(name.to_string())]
            );
        }

        let mut d = draft();
        d.name = "  ".to_string();
        assert_eq!(
            ProjectValidator::validate(&d).errors,
            vec![ValidationError::MissingProjectName]
        );
    }

    #[test]
    fn test_override_warnings() {
        let mut d = draft();
        d.environment_overrides.insert(
            "staging".to_string(),
            crate::models::EnvironmentOverride::default().with_domain("ghost", "x.example.com"),
        );

        let report = ProjectValidator::validate(&d);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logs_of(f: impl FnOnce()) -> String {
        let captured = CapturedLogs::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_warnings_logged_once_by_project_construction() {
        let mut d = draft();
        d.environment_overrides.insert(
            "staging".to_string(),
            crate::models::EnvironmentOverride::default(),
        );

        let validated = logs_of(|| {
            assert_eq!(ProjectValidator::validate(&d).warnings.len(), 1);
        });
        assert!(!validated.contains("staging"));

        let built = logs_of(|| {
            Project::from_draft(d.clone()).unwrap();
        });
        assert_eq!(built.matches("staging").count(), 1);
    }
}
