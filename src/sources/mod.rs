//! Source adapters
//!
//! The access graph is assembled from two independent authorization domains.
//! Each is reached through a trait so synchronization can be exercised
//! without a cloud account or a cluster:
//! - [`IdentitySource`]: IAM users, roles, policies and the STS caller
//! - [`ClusterSource`]: Kubernetes service accounts, secrets, pods and the
//!   active kubeconfig context

mod aws_cli;
mod kubernetes;

pub use aws_cli::AwsCliIdentitySource;
pub use kubernetes::KubeClusterSource;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::models::{CallerIdentity, Pod, Policy, Role, Secret, ServiceAccount, User};

/// Cloud identity facts (IAM/STS)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// The IAM user issuing the requests
    async fn user(&self) -> Result<User, SourceError>;

    /// The STS caller identity
    async fn caller_identity(&self) -> Result<CallerIdentity, SourceError>;

    /// Every role in the account
    async fn roles(&self) -> Result<Vec<Role>, SourceError>;

    /// Managed policies that are attached to at least one entity
    async fn attached_policies(&self) -> Result<Vec<Policy>, SourceError>;
}

/// Cluster RBAC facts (Kubernetes core/v1)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterSource: Send + Sync {
    /// Name of the active kubeconfig context
    async fn active_context(&self) -> Result<String, SourceError>;

    /// Service accounts across all namespaces
    async fn service_accounts(&self) -> Result<Vec<ServiceAccount>, SourceError>;

    /// Secrets across all namespaces
    async fn secrets(&self) -> Result<Vec<Secret>, SourceError>;

    /// Pods across all namespaces
    async fn pods(&self) -> Result<Vec<Pod>, SourceError>;
}
