//! Config file command

use std::path::Path;

use anyhow::Context;
use razergenie::config::GenieConfig;

use super::CommandResult;

/// Print the effective config; with `init`, also write it if the file is missing
pub fn config(config: &GenieConfig, path: &Path, init: bool) -> CommandResult {
    if init {
        if path.exists() {
            println!("{} already exists, leaving it alone", path.display());
        } else {
            config
                .save(path)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
