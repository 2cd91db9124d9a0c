//! Values derived from a project rather than stored in it.

use crate::error::{ConfigError, ConfigResult};
use crate::models::{Architecture, Project, PROD_ENVIRONMENT};

/// Graviton / ARM instance families.
const ARM_FAMILIES: &[&str] = &[
    "a1", "t4g", "m6g", "m6gd", "m7g", "m7gd", "c6g", "c6gd", "c6gn", "c7g", "c7gd", "c7gn",
    "r6g", "r6gd", "r7g", "r7gd", "x2gd", "im4gn", "is4gen", "g5g", "hpc7g",
];

/// Infer the CPU architecture from an EC2 instance type such as `c7g.large`.
pub fn resolve_architecture(instance_type: &str) -> Architecture {
    let family = instance_type.split('.').next().unwrap_or(instance_type);
    if ARM_FAMILIES.contains(&family) {
        Architecture::Arm64
    } else {
        Architecture::X86_64
    }
}

/// Domain a service answers on in `env`.
///
/// An explicit environment override wins; otherwise prod uses the base domain
/// and every other environment prefixes it with `{env}-`. Services without a
/// base domain (and unknown services) resolve to `None`.
pub fn resolve_domain(project: &Project, service_name: &str, env: &str) -> Option<String> {
    let base = project.service(service_name)?.domain.as_deref()?;

    if let Some(domain) = project
        .environment_override(env)
        .and_then(|o| o.domain_overrides.get(service_name))
    {
        return Some(domain.clone());
    }

    if env == PROD_ENVIRONMENT {
        Some(base.to_string())
    } else {
        Some(format!("{}-{}", env, base))
    }
}

/// RDS instance type for `env`, honouring the environment override.
pub fn resolve_db_instance_type(project: &Project, env: &str) -> ConfigResult<String> {
    let rds = project.rds().ok_or(ConfigError::NoDatabase)?;

    let instance_type = project
        .environment_override(env)
        .and_then(|o| o.instance_type_override.as_deref())
        .unwrap_or(&rds.instance_type);

    Ok(instance_type.to_string())
}

/// EC2 instance type a service runs on in `env`, if it has one.
pub fn resolve_ec2_instance_type(project: &Project, service_name: &str, env: &str) -> Option<String> {
    let service = project.service(service_name)?;

    project
        .environment_override(env)
        .and_then(|o| o.ec2_instance_type_override.get(service_name))
        .or(service.ec2_instance_type.as_ref())
        .cloned()
}

/// ECS cluster name for an environment.
pub fn cluster_name(project: &Project, env: &str) -> String {
    format!("{}-{}", project.name(), env)
}

/// ECS service name for a service in an environment.
pub fn service_name(project: &Project, env: &str, service: &str) -> String {
    format!("{}-{}-{}", project.name(), env, service)
}

/// CloudFormation stack name for an environment.
pub fn stack_name(project: &Project, env: &str) -> String {
    format!("{}-ecs-{}", project.name(), env)
}

/// Physical S3 bucket name for a logical bucket in an environment.
pub fn bucket_name(project: &Project, env: &str, bucket: &str) -> String {
    format!("{}-{}-{}", project.name(), env, bucket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_architecture() {
        assert_eq!(resolve_architecture("t4g.micro"), Architecture::Arm64);
        assert_eq!(resolve_architecture("c7g.large"), Architecture::Arm64);
        assert_eq!(resolve_architecture("is4gen.xlarge"), Architecture::Arm64);
        assert_eq!(resolve_architecture("t3.medium"), Architecture::X86_64);
        assert_eq!(resolve_architecture("m5.large"), Architecture::X86_64);
    }

    #[test]
    fn test_resolve_architecture_matches_whole_family_only() {
        // "t4" is not an ARM family even though "t4g" is.
        assert_eq!(resolve_architecture("t4.micro"), Architecture::X86_64);
        assert_eq!(resolve_architecture("t4g"), Architecture::Arm64);
        assert_eq!(resolve_architecture(""), Architecture::X86_64);
    }
}
