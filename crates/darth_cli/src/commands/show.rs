//! Show command - Print the canonical configuration document.

use anyhow::Result;
use clap::Args;

use super::ConfigArgs;

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn execute(args: ShowArgs) -> Result<()> {
    let project = args.config.load()?;
    print!("{}", darth_config::dump(&project));
    Ok(())
}
