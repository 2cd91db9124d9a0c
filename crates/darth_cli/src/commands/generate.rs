//! Generate command - Render the CDK project.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use walkdir::WalkDir;

use darth_scaffold::ProjectScaffold;

use super::ConfigArgs;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output directory for the generated project
    #[arg(short, long, default_value = "infra", env = "DARTH_INFRA_OUTPUT")]
    pub output: PathBuf,

    /// Fail when a user data script is missing instead of skipping it
    #[arg(long)]
    pub strict_scripts: bool,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let project = args.config.load()?;
    info!("Generating CDK project for {}", project.name());

    let output = ProjectScaffold::with_builtin_templates()?
        .with_strict_boot_scripts(args.strict_scripts)
        .generate(&project, &args.output)
        .with_context(|| format!("Failed to generate project into {}", args.output.display()))?;

    println!("✅ Generated {} in {}", project.name(), output.display());
    println!();

    let mut files: Vec<PathBuf> = WalkDir::new(&output)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(&output).ok().map(|p| p.to_path_buf()))
        .collect();
    files.sort();
    for file in &files {
        println!("   📄 {}", file.display());
    }

    println!();
    println!("Next steps:");
    println!("   cd {}", args.output.display());
    println!("   pip install -e .");
    println!("   cdk deploy -c env=<environment>");

    Ok(())
}
