//! CLI command definitions.
//!
//! Each subcommand loads `darth-infra.toml` and works on the validated
//! project read-only. Building, pushing and deploying are left to the
//! generated CDK project and the usual AWS tooling.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use darth_config::{ConfigReader, Project};

pub mod env;
pub mod generate;
pub mod show;
pub mod validate;

/// darth-infra - ECS infrastructure from a single TOML file
#[derive(Parser)]
#[command(name = "darth-infra")]
#[command(version, about = "darth-infra - ECS infrastructure from a single TOML file")]
#[command(long_about = r#"
darth-infra turns darth-infra.toml into an AWS CDK (Python) project that
deploys the configured ECS services, database, buckets and secrets.

COMMANDS:
  validate   → Check darth-infra.toml against every invariant
  show       → Print the canonical form of darth-infra.toml
  env        → Print the values resolved for one environment
  generate   → Generate the CDK project

EXIT CODES:
  0 - Success
  1 - General error
  2 - Configuration not found
  3 - Parse or validation failure
  4 - Template error
  5 - Filesystem error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate darth-infra.toml
    Validate(validate::ValidateArgs),

    /// Print the canonical configuration document
    Show(show::ShowArgs),

    /// Print resolved values for an environment
    Env(env::EnvArgs),

    /// Generate the CDK project
    Generate(generate::GenerateArgs),
}

/// Where to read the configuration from.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to darth-infra.toml (searched for upwards from the current directory by default)
    #[arg(short, long, env = "DARTH_INFRA_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    /// The configuration path given on the command line, or the one found
    /// above the current directory.
    pub fn path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => {
                let cwd = std::env::current_dir()?;
                Ok(ConfigReader::find(cwd)?)
            }
        }
    }

    pub fn load(&self) -> Result<Project> {
        let path = self.path()?;
        ConfigReader::load(Some(path.as_path()))
            .with_context(|| format!("Failed to load {}", path.display()))
    }
}
