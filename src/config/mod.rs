//! Configuration system for rbiam
//!
//! Layered YAML configuration: built-in defaults, the root config file, an
//! explicit `--config` file, then environment overrides.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{ClusterConfig, Config, ExportConfig, GraphConfig, IdentityConfig, ShellConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "export.prefix" => Ok(config.export.prefix.clone()),
        "export.outputDir" => Ok(config.export.output_dir.display().to_string()),
        "identity.awsCli" => Ok(config.identity.aws_cli.clone()),
        "identity.profile" => Ok(config.identity.profile.clone().unwrap_or_default()),
        "identity.region" => Ok(config.identity.region.clone().unwrap_or_default()),
        "cluster.context" => Ok(config.cluster.context.clone().unwrap_or_default()),
        "shell.maxSuggestions" => Ok(config.shell.max_suggestions.to_string()),
        "shell.color" => Ok(config.shell.color.to_string()),
        "graph.serviceAccountColor" => Ok(config.graph.service_account_color.clone()),
        "graph.secretColor" => Ok(config.graph.secret_color.clone()),
        "graph.podColor" => Ok(config.graph.pod_color.clone()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let config = Config::default();
        assert_eq!(get_config_value(&config, "export.prefix").unwrap(), "rbiam-trace");
        assert_eq!(get_config_value(&config, "shell.maxSuggestions").unwrap(), "30");
        assert_eq!(get_config_value(&config, "identity.profile").unwrap(), "");
        assert!(get_config_value(&config, "ui.skin").is_err());
    }
}
