//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.
//! Every field has a default, so an empty or partial file is always valid YAML
//! for this schema.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Trace artifact naming and placement
    #[serde(default)]
    pub export: ExportConfig,

    /// AWS CLI invocation
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Kubernetes connection
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Interactive shell behaviour
    #[serde(default)]
    pub shell: ShellConfig,

    /// Relationship graph styling
    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// File name prefix, artifacts are named `{prefix}-{unix-seconds}.{ext}`
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Directory export artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityConfig {
    /// Path or name of the AWS CLI executable
    #[serde(default = "default_aws_cli")]
    pub aws_cli: String,

    /// Named AWS profile, ambient profile when unset
    #[serde(default)]
    pub profile: Option<String>,

    /// AWS region, ambient region when unset
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Kubeconfig context, current context when unset
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShellConfig {
    /// Upper bound on keys listed by a suggestion prompt
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Colour shell output
    #[serde(default = "default_true")]
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphConfig {
    #[serde(default = "default_service_account_color")]
    pub service_account_color: String,

    #[serde(default = "default_secret_color")]
    pub secret_color: String,

    #[serde(default = "default_pod_color")]
    pub pod_color: String,
}

// Default value functions
fn default_prefix() -> String {
    "rbiam-trace".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_aws_cli() -> String {
    "aws".to_string()
}

fn default_max_suggestions() -> usize {
    30
}

fn default_true() -> bool {
    true
}

fn default_service_account_color() -> String {
    "#1BFF9F".to_string()
}

fn default_secret_color() -> String {
    "#F9ED49".to_string()
}

fn default_pod_color() -> String {
    "#4260FA".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            aws_cli: default_aws_cli(),
            profile: None,
            region: None,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            color: default_true(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            service_account_color: default_service_account_color(),
            secret_color: default_secret_color(),
            pod_color: default_pod_color(),
        }
    }
}
