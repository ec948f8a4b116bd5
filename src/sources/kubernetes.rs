//! Kubernetes RBAC facts via kube-rs
//!
//! Connects using the default kubeconfig loading strategy:
//! 1. In-cluster config (if running in a pod)
//! 2. KUBECONFIG environment variable
//! 3. ~/.kube/config
//!
//! An explicit context name overrides the kubeconfig's `current-context`.
//! The client is created lazily on the first fetch, so a missing kubeconfig
//! surfaces as a per-collection failure rather than a startup failure.
//!
//! Typed objects are converted to the lean records through their JSON form,
//! which keeps the mapping independent of the k8s-openapi field types.

use async_trait::async_trait;
use k8s_openapi::api::core::v1 as corev1;
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tokio::sync::OnceCell;

use super::ClusterSource;
use crate::error::SourceError;
use crate::models::{
    Container, EnvVar, LocalObjectReference, ObjectReference, Pod, PodSpec, PodStatus, Secret,
    ServiceAccount, Volume,
};

/// Service account assumed by pods that do not declare one
const DEFAULT_SERVICE_ACCOUNT: &str = "default";

/// Cluster source backed by the Kubernetes API
pub struct KubeClusterSource {
    context: Option<String>,
    client: OnceCell<Client>,
}

impl KubeClusterSource {
    pub fn new(context: Option<String>) -> Self {
        Self {
            context,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Client, SourceError> {
        self.client
            .get_or_try_init(|| create_client(self.context.as_deref()))
            .await
    }

    /// List every object of a kind across all namespaces and decode each one
    /// into its wire shape
    async fn list_all<K, W>(&self, resource: &str) -> Result<Vec<W>, SourceError>
    where
        K: kube::Resource + Clone + DeserializeOwned + serde::Serialize + std::fmt::Debug,
        <K as kube::Resource>::DynamicType: Default,
        W: DeserializeOwned,
    {
        let client = self.client().await?;
        let api: Api<K> = Api::all(client.clone());
        let list = api.list(&ListParams::default()).await?;
        tracing::debug!("Fetched {} {}", list.items.len(), resource);

        list.items
            .iter()
            .map(|item| {
                serde_json::to_value(item)
                    .and_then(serde_json::from_value)
                    .map_err(|source| SourceError::Decode {
                        command: format!("list {}", resource),
                        source,
                    })
            })
            .collect()
    }
}

/// Build a client for the given context, or for the inferred configuration
async fn create_client(context: Option<&str>) -> Result<Client, SourceError> {
    let config = match context {
        Some(context) => {
            tracing::debug!("Initializing Kubernetes client for context {}", context);
            Config::from_kubeconfig(&KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            })
            .await
            .map_err(|e| SourceError::Kubeconfig(e.to_string()))?
        }
        None => {
            tracing::debug!("Initializing Kubernetes client");
            Config::infer()
                .await
                .map_err(|e| SourceError::Kubeconfig(e.to_string()))?
        }
    };

    let client = Client::try_from(config)?;
    Ok(client)
}

#[async_trait]
impl ClusterSource for KubeClusterSource {
    async fn active_context(&self) -> Result<String, SourceError> {
        if let Some(context) = &self.context {
            return Ok(context.clone());
        }
        let kubeconfig = Kubeconfig::read().map_err(|e| SourceError::Kubeconfig(e.to_string()))?;
        kubeconfig.current_context.ok_or_else(|| {
            SourceError::Kubeconfig("kubeconfig has no current-context".to_string())
        })
    }

    async fn service_accounts(&self) -> Result<Vec<ServiceAccount>, SourceError> {
        let wire: Vec<WireServiceAccount> = self
            .list_all::<corev1::ServiceAccount, _>("serviceaccounts")
            .await?;
        Ok(wire.into_iter().map(ServiceAccount::from).collect())
    }

    async fn secrets(&self) -> Result<Vec<Secret>, SourceError> {
        let wire: Vec<WireSecret> = self.list_all::<corev1::Secret, _>("secrets").await?;
        Ok(wire.into_iter().map(Secret::from).collect())
    }

    async fn pods(&self) -> Result<Vec<Pod>, SourceError> {
        let wire: Vec<WirePod> = self.list_all::<corev1::Pod, _>("pods").await?;
        Ok(wire.into_iter().map(Pod::from).collect())
    }
}

// Wire shapes: the subset of the core/v1 JSON this tool reads.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireMeta {
    name: String,
    namespace: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireServiceAccount {
    #[serde(default)]
    metadata: WireMeta,
    #[serde(default)]
    secrets: Vec<ObjectReference>,
    #[serde(default)]
    image_pull_secrets: Vec<LocalObjectReference>,
    #[serde(default)]
    automount_service_account_token: Option<bool>,
}

impl From<WireServiceAccount> for ServiceAccount {
    fn from(wire: WireServiceAccount) -> Self {
        Self {
            namespace: wire.metadata.namespace,
            name: wire.metadata.name,
            secrets: wire.secrets,
            image_pull_secrets: wire.image_pull_secrets,
            automount_service_account_token: wire.automount_service_account_token,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSecret {
    #[serde(default)]
    metadata: WireMeta,
    #[serde(default, rename = "type")]
    secret_type: Option<String>,
    #[serde(default)]
    data: BTreeMap<String, String>,
    #[serde(default)]
    string_data: BTreeMap<String, String>,
}

impl From<WireSecret> for Secret {
    fn from(wire: WireSecret) -> Self {
        Self {
            namespace: wire.metadata.namespace,
            name: wire.metadata.name,
            secret_type: wire.secret_type.unwrap_or_else(|| "Opaque".to_string()),
            data: wire.data,
            string_data: wire.string_data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WirePod {
    #[serde(default)]
    metadata: WireMeta,
    #[serde(default)]
    spec: WirePodSpec,
    #[serde(default)]
    status: WirePodStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WirePodSpec {
    containers: Vec<WireContainer>,
    volumes: Vec<WireVolume>,
    service_account_name: Option<String>,
    service_account: Option<String>,
    image_pull_secrets: Vec<LocalObjectReference>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireContainer {
    name: String,
    image: Option<String>,
    command: Vec<String>,
    args: Vec<String>,
    env: Vec<WireEnvVar>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireEnvVar {
    name: String,
    value: Option<String>,
    value_from: Option<WireEnvVarSource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireEnvVarSource {
    secret_key_ref: Option<WireKeySelector>,
    config_map_key_ref: Option<WireKeySelector>,
    field_ref: Option<WireFieldSelector>,
    resource_field_ref: Option<WireResourceSelector>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireKeySelector {
    name: String,
    key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireFieldSelector {
    field_path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireResourceSelector {
    resource: String,
}

impl WireEnvVarSource {
    fn describe(&self) -> Option<String> {
        if let Some(r) = &self.secret_key_ref {
            return Some(format!("secretKeyRef:{}/{}", r.name, r.key));
        }
        if let Some(r) = &self.config_map_key_ref {
            return Some(format!("configMapKeyRef:{}/{}", r.name, r.key));
        }
        if let Some(r) = &self.field_ref {
            return Some(format!("fieldRef:{}", r.field_path));
        }
        self.resource_field_ref
            .as_ref()
            .map(|r| format!("resourceFieldRef:{}", r.resource))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireVolume {
    name: String,
    secret: Option<WireSecretVolume>,
    config_map: Option<WireConfigMapVolume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireSecretVolume {
    secret_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireConfigMapVolume {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePodStatus {
    #[serde(rename = "hostIP")]
    host_ip: Option<String>,
    #[serde(rename = "podIP")]
    pod_ip: Option<String>,
    phase: Option<String>,
}

impl From<WirePod> for Pod {
    fn from(wire: WirePod) -> Self {
        let spec = wire.spec;
        // serviceAccount is the deprecated alias of serviceAccountName
        let service_account_name = spec
            .service_account_name
            .or(spec.service_account)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_ACCOUNT.to_string());

        Self {
            namespace: wire.metadata.namespace,
            name: wire.metadata.name,
            spec: PodSpec {
                containers: spec
                    .containers
                    .into_iter()
                    .map(|c| Container {
                        name: c.name,
                        image: c.image,
                        command: c.command,
                        args: c.args,
                        env: c
                            .env
                            .into_iter()
                            .map(|e| EnvVar {
                                value_from: e.value_from.as_ref().and_then(|v| v.describe()),
                                name: e.name,
                                value: e.value,
                            })
                            .collect(),
                    })
                    .collect(),
                volumes: spec
                    .volumes
                    .into_iter()
                    .map(|v| Volume {
                        name: v.name,
                        secret_name: v.secret.and_then(|s| s.secret_name),
                        config_map_name: v.config_map.and_then(|c| c.name),
                    })
                    .collect(),
                service_account_name,
                image_pull_secrets: spec.image_pull_secrets,
            },
            status: PodStatus {
                host_ip: wire.status.host_ip,
                pod_ip: wire.status.pod_ip,
                phase: wire.status.phase,
            },
        }
    }
}
