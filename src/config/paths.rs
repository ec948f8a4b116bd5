//! Configuration file location
//!
//! `RBIAM_CONFIG_DIR` wins; otherwise the platform config directory from
//! `directories` (`$XDG_CONFIG_HOME` or `~/.config` on Linux) plus `rbiam`.

use directories::BaseDirs;
use std::path::PathBuf;

const CONFIG_DIR_ENV: &str = "RBIAM_CONFIG_DIR";
const CONFIG_FILE: &str = "config.yaml";

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    resolve_config_dir(std::env::var(CONFIG_DIR_ENV).ok())
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn resolve_config_dir(explicit: Option<String>) -> PathBuf {
    match explicit.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        // No home directory: fall back to the working directory
        None => BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("rbiam"))
            .unwrap_or_else(|| PathBuf::from("rbiam")),
    }
}
