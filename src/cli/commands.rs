//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::Path;

use crate::config::{ConfigLoader, get_config_value, paths};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Show configuration file path
    Path,
    /// Print the merged configuration as YAML
    Show,
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., "export.prefix", "shell.maxSuggestions")
        key: String,
    },
    /// Validate configuration
    Validate,
}

/// Handle configuration subcommands
///
/// `explicit` is the `--config` file, if any.
pub fn handle_config_command(cmd: ConfigSubcommand, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
        }
        ConfigSubcommand::Show => {
            let config = ConfigLoader::load(explicit).context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Get { key } => {
            let config = ConfigLoader::load(explicit).context("Failed to load configuration")?;
            println!("{}", get_config_value(&config, &key)?);
        }
        ConfigSubcommand::Validate => {
            ConfigLoader::load(explicit).context("Configuration validation failed")?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
