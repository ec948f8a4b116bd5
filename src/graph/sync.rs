//! Synchronization: one full pull from both sources
//!
//! Baseline identity facts are fetched first and in a fixed order (user,
//! caller identity, roles, attached policies). Every later correlation
//! assumes they exist, so the first failure aborts with no graph.
//!
//! Cluster facts are best effort. Each of the four fetches may fail on its
//! own; the affected collection stays empty and a warning is recorded.

use crate::error::{
    BaselineStep, ClusterCollection, FatalIdentityError, RecoverableSourceError, SourceError,
};
use crate::graph::AccessGraph;
use crate::models::ClusterContext;
use crate::sources::{ClusterSource, IdentitySource};

/// A freshly built graph plus the cluster fetches that failed along the way
#[derive(Debug)]
pub struct SyncOutcome {
    pub graph: AccessGraph,
    pub warnings: Vec<RecoverableSourceError>,
}

fn baseline<T>(
    step: BaselineStep,
    result: Result<T, SourceError>,
) -> Result<T, FatalIdentityError> {
    result.map_err(|source| FatalIdentityError { step, source })
}

fn optional<T: Default>(
    collection: ClusterCollection,
    result: Result<T, SourceError>,
    warnings: &mut Vec<RecoverableSourceError>,
) -> T {
    match result {
        Ok(value) => value,
        Err(source) => {
            tracing::warn!("Can't get {}: {}", collection, source);
            warnings.push(RecoverableSourceError { collection, source });
            T::default()
        }
    }
}

/// Build a new access graph from the identity and cluster sources
pub async fn synchronize(
    identity: &dyn IdentitySource,
    cluster: &dyn ClusterSource,
) -> Result<SyncOutcome, FatalIdentityError> {
    let user = baseline(BaselineStep::User, identity.user().await)?;
    let caller = baseline(BaselineStep::CallerIdentity, identity.caller_identity().await)?;
    let roles = baseline(BaselineStep::Roles, identity.roles().await)?;
    let policies = baseline(BaselineStep::Policies, identity.attached_policies().await)?;

    let mut warnings = Vec::new();
    let active_context = optional(
        ClusterCollection::Context,
        cluster.active_context().await.map(Some),
        &mut warnings,
    )
    .map(|name| ClusterContext { name });
    let service_accounts = optional(
        ClusterCollection::ServiceAccounts,
        cluster.service_accounts().await,
        &mut warnings,
    );
    let secrets = optional(
        ClusterCollection::Secrets,
        cluster.secrets().await,
        &mut warnings,
    );
    let pods = optional(ClusterCollection::Pods, cluster.pods().await, &mut warnings);

    let graph = AccessGraph::new(user, caller)
        .with_roles(roles)
        .with_policies(policies)
        .with_active_context(active_context)
        .with_service_accounts(service_accounts)
        .with_secrets(secrets)
        .with_pods(pods);

    tracing::info!(
        "Synchronized access graph: {} ({} warnings)",
        graph.summary(),
        warnings.len()
    );

    Ok(SyncOutcome { graph, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallerIdentity, Pod, PodSpec, PodStatus, ServiceAccount, User};
    use crate::sources::{MockClusterSource, MockIdentitySource};
    use chrono::{TimeZone, Utc};

    fn user() -> User {
        User {
            user_name: "dev".to_string(),
            user_id: "AIDA1".to_string(),
            arn: "arn:aws:iam::1:user/dev".to_string(),
            path: "/".to_string(),
            create_date: Utc.with_ymd_and_hms(2019, 7, 25, 10, 0, 0).unwrap(),
            tags: vec![],
        }
    }

    fn caller() -> CallerIdentity {
        CallerIdentity {
            account: "1".to_string(),
            user_id: "AIDA1".to_string(),
            arn: "arn:aws:iam::1:user/dev".to_string(),
        }
    }

    fn identity_ok() -> MockIdentitySource {
        let mut identity = MockIdentitySource::new();
        identity.expect_user().returning(|| Ok(user()));
        identity.expect_caller_identity().returning(|| Ok(caller()));
        identity.expect_roles().returning(|| Ok(vec![]));
        identity.expect_attached_policies().returning(|| Ok(vec![]));
        identity
    }

    fn sa(namespace: &str, name: &str) -> ServiceAccount {
        ServiceAccount {
            namespace: namespace.to_string(),
            name: name.to_string(),
            secrets: vec![],
            image_pull_secrets: vec![],
            automount_service_account_token: None,
        }
    }

    fn unavailable(msg: &str) -> SourceError {
        SourceError::Unavailable(msg.to_string())
    }

    #[tokio::test]
    async fn test_baseline_failure_is_fatal_and_stops_fetching() {
        let mut identity = MockIdentitySource::new();
        identity.expect_user().returning(|| Ok(user()));
        identity
            .expect_caller_identity()
            .returning(|| Err(unavailable("expired token")));
        identity.expect_roles().never();
        identity.expect_attached_policies().never();

        let mut cluster = MockClusterSource::new();
        cluster.expect_active_context().never();
        cluster.expect_service_accounts().never();
        cluster.expect_secrets().never();
        cluster.expect_pods().never();

        let err = synchronize(&identity, &cluster).await.unwrap_err();
        assert_eq!(err.step, BaselineStep::CallerIdentity);
        assert_eq!(err.to_string(), "Can't get caller identity: expired token");
    }

    #[tokio::test]
    async fn test_pod_failure_leaves_other_collections_intact() {
        let identity = identity_ok();
        let mut cluster = MockClusterSource::new();
        cluster
            .expect_active_context()
            .returning(|| Ok("dev-cluster".to_string()));
        cluster
            .expect_service_accounts()
            .returning(|| Ok(vec![sa("ns1", "sa1")]));
        cluster.expect_secrets().returning(|| Ok(vec![]));
        cluster
            .expect_pods()
            .returning(|| Err(unavailable("forbidden")));

        let outcome = synchronize(&identity, &cluster).await.unwrap();
        assert!(outcome.graph.pods().is_empty());
        assert!(outcome.graph.service_account("ns1:sa1").is_some());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].collection, ClusterCollection::Pods);
        assert_eq!(
            outcome.graph.active_context().map(|c| c.name.as_str()),
            Some("dev-cluster")
        );
    }

    #[tokio::test]
    async fn test_every_cluster_fetch_is_attempted_after_failures() {
        let identity = identity_ok();
        let mut cluster = MockClusterSource::new();
        cluster
            .expect_active_context()
            .times(1)
            .returning(|| Err(unavailable("no kubeconfig")));
        cluster
            .expect_service_accounts()
            .times(1)
            .returning(|| Err(unavailable("no kubeconfig")));
        cluster
            .expect_secrets()
            .times(1)
            .returning(|| Err(unavailable("no kubeconfig")));
        cluster.expect_pods().times(1).returning(|| {
            Ok(vec![Pod {
                namespace: "ns1".to_string(),
                name: "web-0".to_string(),
                spec: PodSpec {
                    service_account_name: "sa1".to_string(),
                    ..Default::default()
                },
                status: PodStatus::default(),
            }])
        });

        let outcome = synchronize(&identity, &cluster).await.unwrap();
        assert!(outcome.graph.active_context().is_none());
        assert!(outcome.graph.service_accounts().is_empty());
        assert!(outcome.graph.secrets().is_empty());
        assert!(outcome.graph.pod("ns1:web-0").is_some());
        let collections: Vec<_> = outcome.warnings.iter().map(|w| w.collection).collect();
        assert_eq!(
            collections,
            vec![
                ClusterCollection::Context,
                ClusterCollection::ServiceAccounts,
                ClusterCollection::Secrets
            ]
        );
    }
}
