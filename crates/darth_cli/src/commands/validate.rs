//! Validate command - Check a configuration document.

use std::fs;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use darth_config::{ConfigError, ConfigReader, ProjectValidator};

use super::ConfigArgs;

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let path = args.config.path()?;
    info!("Validating {}", path.display());

    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut draft = ConfigReader::parse_draft(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    println!("📋 Validating {}...", path.display());

    let mut report = ProjectValidator::validate(&draft);
    // Only the wizard enforces this; documents written by hand may omit it.
    for svc in draft.services.iter().filter(|s| !s.is_worker() && s.domain.is_none()) {
        report.add_warning(format!(
            "Service '{}' has a port but no domain; it will not be reachable through the ALB",
            svc.name
        ));
    }

    for warning in &report.warnings {
        println!("   ⚠️  {}", warning);
    }

    if !report.is_valid() {
        println!("   ❌ Validation failed:");
        for error in &report.errors {
            println!("      - {}", error);
        }
        let count = report.errors.len();
        let first = report.errors.swap_remove(0);
        return Err(anyhow::Error::new(ConfigError::Validation(first))
            .context(format!("{} validation error(s) in {}", count, path.display())));
    }

    // prod first in the summary
    ProjectValidator::normalize(&mut draft);
    println!("   ✅ Configuration is valid");
    println!();
    println!("   Project:       {}", draft.name);
    println!("   Region:        {}", draft.aws_region);
    println!("   Environments:  {}", draft.environments.join(", "));
    println!("   Services:      {}", draft.services.len());
    println!(
        "   Database:      {}",
        draft
            .rds
            .as_ref()
            .map(|db| db.database_name.as_str())
            .unwrap_or("none")
    );
    println!("   Buckets:       {}", draft.s3_buckets.len());
    println!("   Secrets:       {}", draft.secrets.len());

    Ok(())
}
