//! Cluster RBAC records
//!
//! Lean views of the core/v1 objects the access graph cares about. They are
//! flat (no nested `metadata`) and only carry the fields used to
//! correlate identities: who runs as which service account, and which secrets
//! that service account or pod can reach.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::key::{Keyed, compose_key};

/// Reference to another object, possibly in a different namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,
}

/// Reference to an object inside the same namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    #[serde(default)]
    pub name: String,
}

/// A Kubernetes service account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub secrets: Vec<ObjectReference>,
    #[serde(default)]
    pub image_pull_secrets: Vec<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automount_service_account_token: Option<bool>,
}

impl Keyed for ServiceAccount {
    fn key(&self) -> String {
        compose_key(&self.namespace, &self.name)
    }
}

/// A Kubernetes secret
///
/// `data` holds the base64 text exactly as the API serves it; nothing is
/// decoded at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub namespace: String,
    pub name: String,
    #[serde(rename = "type")]
    pub secret_type: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub string_data: BTreeMap<String, String>,
}

impl Keyed for Secret {
    fn key(&self) -> String {
        compose_key(&self.namespace, &self.name)
    }
}

/// A Kubernetes pod
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    pub namespace: String,
    pub name: String,
    pub spec: PodSpec,
    pub status: PodStatus,
}

impl Pod {
    /// Composite key of the service account this pod declares it runs as
    pub fn service_account_key(&self) -> String {
        compose_key(&self.namespace, &self.spec.service_account_name)
    }
}

impl Keyed for Pod {
    fn key(&self) -> String {
        compose_key(&self.namespace, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
    pub service_account_name: String,
    #[serde(default)]
    pub image_pull_secrets: Vec<LocalObjectReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: Vec<EnvVar>,
}

/// Environment variable; `value_from` names the source when not literal
/// (for example `secretKeyRef:db-creds/password`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

/// Name of the kubeconfig context the cluster data came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterContext {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod(namespace: &str, name: &str, service_account: &str) -> Pod {
        Pod {
            namespace: namespace.to_string(),
            name: name.to_string(),
            spec: PodSpec {
                service_account_name: service_account.to_string(),
                ..Default::default()
            },
            status: PodStatus::default(),
        }
    }

    #[test]
    fn test_cluster_keys_are_namespaced() {
        let p = pod("ns1", "web-0", "sa1");
        assert_eq!(p.key(), "ns1:web-0");
        assert_eq!(p.service_account_key(), "ns1:sa1");

        let sa = ServiceAccount {
            namespace: "default".to_string(),
            name: "s3-echoer".to_string(),
            secrets: vec![],
            image_pull_secrets: vec![],
            automount_service_account_token: None,
        };
        assert_eq!(sa.key(), "default:s3-echoer");
    }

    #[test]
    fn test_secret_type_serializes_as_type() {
        let secret = Secret {
            namespace: "default".to_string(),
            name: "token".to_string(),
            secret_type: "Opaque".to_string(),
            data: BTreeMap::new(),
            string_data: BTreeMap::new(),
        };
        let json = serde_json::to_value(&secret).unwrap();
        assert_eq!(json["type"], "Opaque");
        assert_eq!(json["namespace"], "default");
    }
}
