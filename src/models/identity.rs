//! Cloud identity records
//!
//! Lean versions of the IAM and STS response shapes. Field names follow the
//! AWS wire format (PascalCase) so the CLI output deserializes directly and
//! the raw export stays recognizable to anyone used to the AWS tooling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::key::Keyed;

/// A key/value tag attached to an IAM entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// The identity of whoever issues the requests (STS)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallerIdentity {
    pub account: String,
    pub user_id: String,
    pub arn: String,
}

/// The IAM user issuing the requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub user_name: String,
    pub user_id: String,
    pub arn: String,
    pub path: String,
    pub create_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// An IAM role, keyed by its ARN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub role_name: String,
    pub role_id: String,
    pub arn: String,
    pub path: String,
    /// Trust policy; the CLI serves it decoded, the raw API URL-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_policy_document: Option<serde_json::Value>,
    /// Maximum session duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_session_duration: Option<u32>,
    pub create_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl Keyed for Role {
    fn key(&self) -> String {
        self.arn.clone()
    }
}

/// A managed IAM policy, keyed by its ARN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    pub policy_name: String,
    pub policy_id: String,
    pub arn: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version_id: Option<String>,
    /// Number of entities the policy is attached to
    #[serde(default)]
    pub attachment_count: u32,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl Keyed for Policy {
    fn key(&self) -> String {
        self.arn.clone()
    }
}

/// Render an assume-role policy document for display
///
/// Documents served URL-encoded as a JSON string are decoded first; anything
/// that still fails to decode is shown verbatim.
pub fn render_policy_document(document: &serde_json::Value) -> String {
    match document {
        serde_json::Value::String(raw) => {
            let decoded = percent_decode(raw);
            serde_json::from_str::<serde_json::Value>(&decoded)
                .map(|value| value.to_string())
                .unwrap_or(decoded)
        }
        other => other.to_string(),
    }
}

fn percent_decode(raw: &str) -> String {
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| {
            if value.is_empty() {
                key.into_owned()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
