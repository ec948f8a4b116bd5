//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Explicit config file (`--config`)
    /// 3. Root config
    /// 4. Built-in defaults
    ///
    /// Command-line flags are applied by the caller on top of the result.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        Self::load_with_env(explicit, |name| std::env::var(name).ok())
    }

    /// Same as [`ConfigLoader::load`], reading overrides through `env`
    pub fn load_with_env(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Config> {
        let mut layers = Vec::new();

        let root = paths::root_config_path();
        if root.exists() {
            layers.push(Self::read_layer(&root)?);
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
            }
            layers.push(Self::read_layer(path)?);
        }

        let config = Self::merge_layers(layers)?;
        let config = Self::apply_env_overrides(config, env);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Check values that parse but cannot be used
    pub fn validate(config: &Config) -> Result<()> {
        if config.export.prefix.trim().is_empty() {
            return Err(anyhow::anyhow!("export.prefix must not be empty"));
        }

        if config.shell.max_suggestions == 0 {
            return Err(anyhow::anyhow!("shell.maxSuggestions must be at least 1"));
        }

        for (key, value) in [
            ("graph.serviceAccountColor", &config.graph.service_account_color),
            ("graph.secretColor", &config.graph.secret_color),
            ("graph.podColor", &config.graph.pod_color),
        ] {
            csscolorparser::parse(value)
                .with_context(|| format!("{} is not a valid colour: {}", key, value))?;
        }

        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    fn read_layer(path: &Path) -> Result<Value> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Deep-merge YAML layers over the defaults, later layers winning
    fn merge_layers(layers: Vec<Value>) -> Result<Config> {
        let mut merged =
            serde_yaml::to_value(Self::load_defaults()).context("Failed to serialize defaults")?;
        for layer in layers {
            merge_value(&mut merged, layer);
        }
        serde_yaml::from_value(merged).context("Invalid configuration value")
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config, env: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(prefix) = env("RBIAM_EXPORT_PREFIX") {
            config.export.prefix = prefix;
        }

        if let Some(dir) = env("RBIAM_OUTPUT_DIR") {
            config.export.output_dir = PathBuf::from(dir);
        }

        if let Some(profile) = env("AWS_PROFILE").filter(|p| !p.is_empty()) {
            config.identity.profile = Some(profile);
        }

        config
    }
}

fn merge_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
