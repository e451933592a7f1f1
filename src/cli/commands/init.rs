use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::config::{Config, CONFIG_FILENAME};
use crate::cli::InitArgs;

pub fn execute_init(args: InitArgs) -> Result<()> {
    if Path::new(CONFIG_FILENAME).exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            CONFIG_FILENAME
        );
    }

    let config = Config::default();
    config.save()?;

    eprintln!("Created {}", CONFIG_FILENAME);
    eprintln!("  listen: {}", config.listen);
    eprintln!("  log_format: {:?}", config.log_format);
    eprintln!();
    eprintln!("Next: txstats serve");

    Ok(())
}
