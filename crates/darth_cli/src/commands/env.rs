//! Env command - Print the values resolved for one environment.

use anyhow::{bail, Result};
use clap::Args;

use darth_scaffold::EnvironmentContext;

use super::ConfigArgs;

#[derive(Args)]
pub struct EnvArgs {
    /// Environment name, e.g. prod
    pub environment: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn execute(args: EnvArgs) -> Result<()> {
    let project = args.config.load()?;

    if !project.environments().contains(&args.environment) {
        bail!(
            "Unknown environment '{}' (configured: {})",
            args.environment,
            project.environments().join(", ")
        );
    }

    let resolved = EnvironmentContext::new(&project, &args.environment)?;

    println!("🌍 {} / {}", project.name(), resolved.name);
    println!("   Stack:    {}", resolved.stack_name);
    println!("   Cluster:  {}", resolved.cluster_name);
    if let Some(instance_type) = &resolved.db_instance_type {
        println!("   Database: {}", instance_type);
    }

    println!();
    println!("   Services:");
    for (name, svc) in &resolved.services {
        println!("   - {} ({})", name, svc.ecs_service_name);
        if let Some(domain) = &svc.domain {
            println!("       domain:        {}", domain);
        }
        if let Some(instance_type) = &svc.ec2_instance_type {
            println!("       instance type: {}", instance_type);
        }
        if let Some(arch) = svc.architecture {
            println!("       architecture:  {}", arch);
        }
    }

    if !resolved.buckets.is_empty() {
        println!();
        println!("   Buckets:");
        for (name, bucket) in &resolved.buckets {
            println!("   - {} → {}", name, bucket);
        }
    }

    Ok(())
}
