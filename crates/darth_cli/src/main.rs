//! darth-infra CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Configuration not found
//! - 3: Parse or validation failure
//! - 4: Template error
//! - 5: Filesystem error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use darth_config::ConfigError;
use darth_scaffold::ScaffoldError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const CONFIG_NOT_FOUND: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const FILESYSTEM_ERROR: u8 = 5;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "darth=debug,info"
    } else if cli.quiet {
        "darth=warn,warn"
    } else {
        "darth=info,warn"
    };
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Show(args) => commands::show::execute(args),
        Commands::Env(args) => commands::env::execute(args),
        Commands::Generate(args) => commands::generate::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(err);
        }
        if let Some(err) = cause.downcast_ref::<ScaffoldError>() {
            return match err {
                ScaffoldError::Render { .. } | ScaffoldError::Context(_) => ExitCodes::TEMPLATE_ERROR,
                ScaffoldError::Write { .. }
                | ScaffoldError::Copy { .. }
                | ScaffoldError::MissingBootScript(_)
                | ScaffoldError::Io(_) => ExitCodes::FILESYSTEM_ERROR,
                ScaffoldError::UnsafeScriptPath(_) => ExitCodes::VALIDATION_FAILURE,
                ScaffoldError::Config(inner) => config_exit_code(inner),
            };
        }
    }
    ExitCodes::GENERAL_ERROR
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::NotFound { .. } => ExitCodes::CONFIG_NOT_FOUND,
        ConfigError::Parse(_) | ConfigError::Validation(_) => ExitCodes::VALIDATION_FAILURE,
        ConfigError::Io(_) => ExitCodes::FILESYSTEM_ERROR,
        ConfigError::NoDatabase => ExitCodes::GENERAL_ERROR,
    }
}
