//! Template context built from a validated project.

use std::collections::BTreeMap;

use darth_config::resolve::{bucket_name, cluster_name, service_name, stack_name};
use darth_config::{
    resolve_architecture, resolve_db_instance_type, resolve_domain, resolve_ec2_instance_type,
    AlbMode, Architecture, Bucket, Database, LoadBalancer, Project, Secret, Service,
    PROD_ENVIRONMENT,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::ScaffoldResult;
use crate::renderer::{to_pascal_case, to_snake_case};

/// Everything a template may reference.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext<'a> {
    pub project_name: &'a str,
    pub project_name_snake: String,
    pub project_name_pascal: String,
    pub aws_region: &'a str,
    pub vpc_name: &'a str,
    pub environments: &'a [String],
    pub tags: &'a BTreeMap<String, String>,
    pub services: Vec<ServiceContext<'a>>,
    pub rds: Option<&'a Database>,
    pub s3_buckets: &'a [Bucket],
    pub alb: &'a LoadBalancer,
    pub dedicated_alb: bool,
    pub secrets: &'a [Secret],
    pub has_rds: bool,
    pub has_s3: bool,
    pub has_cloudfront: bool,
    pub has_ec2: bool,
    pub has_ebs: bool,
    pub has_service_discovery: bool,
    /// Resolved values keyed by environment name.
    pub environment_settings: BTreeMap<String, EnvironmentContext>,
}

/// A service plus the flags templates branch on.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceContext<'a> {
    #[serde(flatten)]
    pub service: &'a Service,
    pub is_ec2: bool,
    pub is_worker: bool,
    /// False when the service runs an externally hosted image.
    pub builds_image: bool,
    pub has_db_access: bool,
    pub has_volumes: bool,
}

/// Values resolved for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentContext {
    pub name: String,
    pub is_prod: bool,
    pub cluster_name: String,
    pub stack_name: String,
    pub db_instance_type: Option<String>,
    pub services: BTreeMap<String, ServiceEnvironmentContext>,
    /// Logical bucket name to physical bucket name.
    pub buckets: BTreeMap<String, String>,
}

/// Values resolved for one service in one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEnvironmentContext {
    pub ecs_service_name: String,
    pub domain: Option<String>,
    /// Routed through the load balancer: needs both a port and a domain.
    pub alb_target: bool,
    pub ec2_instance_type: Option<String>,
    pub architecture: Option<Architecture>,
}

impl<'a> RenderContext<'a> {
    pub fn new(project: &'a Project) -> ScaffoldResult<Self> {
        let expose_to: &[String] = project.rds().map(|db| db.expose_to.as_slice()).unwrap_or(&[]);

        let services = project
            .services()
            .iter()
            .map(|service| ServiceContext {
                service,
                is_ec2: service.is_ec2(),
                is_worker: service.is_worker(),
                builds_image: service.image.is_none(),
                has_db_access: expose_to.contains(&service.name),
                has_volumes: !service.ebs_volumes.is_empty(),
            })
            .collect();

        let mut environment_settings = BTreeMap::new();
        for env in project.environments() {
            environment_settings.insert(env.clone(), EnvironmentContext::new(project, env)?);
        }

        Ok(Self {
            project_name: project.name(),
            project_name_snake: to_snake_case(project.name()),
            project_name_pascal: to_pascal_case(project.name()),
            aws_region: project.aws_region(),
            vpc_name: project.vpc_name(),
            environments: project.environments(),
            tags: project.tags(),
            services,
            rds: project.rds(),
            s3_buckets: project.s3_buckets(),
            alb: project.alb(),
            dedicated_alb: project.alb().mode == AlbMode::Dedicated,
            secrets: project.secrets(),
            has_rds: project.rds().is_some(),
            has_s3: !project.s3_buckets().is_empty(),
            has_cloudfront: project.has_cloudfront(),
            has_ec2: project.has_ec2(),
            has_ebs: project.has_ebs(),
            has_service_discovery: project.has_service_discovery(),
            environment_settings,
        })
    }

    pub fn to_value(&self) -> ScaffoldResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl EnvironmentContext {
    pub fn new(project: &Project, env: &str) -> ScaffoldResult<Self> {
        let db_instance_type = match project.rds() {
            Some(_) => Some(resolve_db_instance_type(project, env)?),
            None => None,
        };

        let services = project
            .services()
            .iter()
            .map(|svc| {
                let ec2_instance_type = resolve_ec2_instance_type(project, &svc.name, env);
                let overridden = project
                    .environment_override(env)
                    .is_some_and(|o| o.ec2_instance_type_override.contains_key(&svc.name));
                // An overridden instance type may belong to another family.
                let architecture = match (&ec2_instance_type, overridden) {
                    (Some(instance_type), true) => Some(resolve_architecture(instance_type)),
                    _ => svc.architecture,
                };
                let domain = resolve_domain(project, &svc.name, env);
                let resolved = ServiceEnvironmentContext {
                    ecs_service_name: service_name(project, env, &svc.name),
                    alb_target: svc.port.is_some()
                        && domain.as_deref().is_some_and(|d| !d.is_empty()),
                    domain,
                    ec2_instance_type,
                    architecture,
                };
                (svc.name.clone(), resolved)
            })
            .collect();

        let buckets = project
            .s3_buckets()
            .iter()
            .map(|b| (b.name.clone(), bucket_name(project, env, &b.name)))
            .collect();

        Ok(Self {
            name: env.to_string(),
            is_prod: env == PROD_ENVIRONMENT,
            cluster_name: cluster_name(project, env),
            stack_name: stack_name(project, env),
            db_instance_type,
            services,
            buckets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darth_config::{EnvironmentOverride, ProjectBuilder, Volume};

    fn project() -> Project {
        ProjectBuilder::new("my-webapp")
            .environments(["dev", "prod"])
            .service(Service::new("django").with_domain("app.example.com"))
            .service(
                Service::worker("indexer")
                    .on_ec2("t3.large")
                    .with_volume(Volume::new("data", 100, "/data")),
            )
            .database(Some(Database::new("app").expose_to("django")))
            .bucket(Bucket::new("media").with_cloudfront(true))
            .environment_override(
                "dev",
                EnvironmentOverride::default()
                    .with_db_instance_type("t4g.small")
                    .with_ec2_instance_type("indexer", "c7g.large"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_flags() {
        let project = project();
        let ctx = RenderContext::new(&project).unwrap();

        assert!(ctx.has_rds);
        assert!(ctx.has_s3);
        assert!(ctx.has_cloudfront);
        assert!(ctx.has_ec2);
        assert!(ctx.has_ebs);
        assert!(!ctx.has_service_discovery);
        assert!(!ctx.dedicated_alb);
        assert_eq!(ctx.project_name_snake, "my_webapp");
        assert_eq!(ctx.project_name_pascal, "MyWebapp");

        assert!(ctx.services[0].has_db_access);
        assert!(!ctx.services[1].has_db_access);
        assert!(ctx.services[1].is_worker);
        assert!(ctx.services[1].has_volumes);
    }

    #[test]
    fn test_environment_settings() {
        let project = project();
        let ctx = RenderContext::new(&project).unwrap();

        let prod = &ctx.environment_settings["prod"];
        assert!(prod.is_prod);
        assert_eq!(prod.cluster_name, "my-webapp-prod");
        assert_eq!(prod.stack_name, "my-webapp-ecs-prod");
        assert_eq!(prod.db_instance_type.as_deref(), Some("t4g.micro"));
        assert_eq!(prod.services["django"].domain.as_deref(), Some("app.example.com"));
        assert_eq!(prod.services["indexer"].architecture, Some(Architecture::X86_64));
        assert!(prod.services["django"].alb_target);
        assert!(!prod.services["indexer"].alb_target);
        assert_eq!(prod.buckets["media"], "my-webapp-prod-media");

        let dev = &ctx.environment_settings["dev"];
        assert!(!dev.is_prod);
        assert_eq!(dev.db_instance_type.as_deref(), Some("t4g.small"));
        assert_eq!(dev.services["django"].domain.as_deref(), Some("dev-app.example.com"));
        assert_eq!(dev.services["django"].ecs_service_name, "my-webapp-dev-django");
        assert_eq!(dev.services["indexer"].ec2_instance_type.as_deref(), Some("c7g.large"));
        assert_eq!(dev.services["indexer"].architecture, Some(Architecture::Arm64));
    }

    #[test]
    fn test_json_shape() {
        let project = project();
        let value = RenderContext::new(&project).unwrap().to_value().unwrap();

        // Service fields are flattened next to the derived flags.
        assert_eq!(value["services"][0]["name"], "django");
        assert_eq!(value["services"][0]["port"], 8000);
        assert_eq!(value["services"][1]["port"], Value::Null);
        assert_eq!(value["services"][1]["launch_type"], "ec2");
        assert_eq!(value["services"][1]["is_ec2"], true);
        assert_eq!(value["alb"]["mode"], "shared");
        assert_eq!(value["environment_settings"]["dev"]["services"]["indexer"]["architecture"], "arm64");
    }

    #[test]
    fn test_port_without_domain_is_not_alb_target() {
        let project = Project::new(
            ProjectBuilder::new("api")
                .service(Service::new("web"))
                .draft()
                .clone(),
        )
        .unwrap();

        let prod = EnvironmentContext::new(&project, "prod").unwrap();
        assert_eq!(prod.services["web"].domain, None);
        assert!(!prod.services["web"].alb_target);
    }

    #[test]
    fn test_without_database() {
        let project = ProjectBuilder::new("api")
            .service(Service::worker("jobs"))
            .build()
            .unwrap();
        let ctx = RenderContext::new(&project).unwrap();

        assert!(!ctx.has_rds);
        assert!(ctx.rds.is_none());
        assert_eq!(ctx.environment_settings["prod"].db_instance_type, None);
        assert!(ctx.environment_settings["prod"].buckets.is_empty());
    }
}
