//! Shared fixtures and in-memory sources for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use rbiam::error::{BaselineStep, ClusterCollection, SourceError};
use rbiam::models::{
    CallerIdentity, Container, ObjectReference, Pod, PodSpec, PodStatus, Policy, Role, Secret,
    ServiceAccount, User,
};
use rbiam::shell::LineSource;
use rbiam::sources::{ClusterSource, IdentitySource};

pub fn user() -> User {
    User {
        user_name: "dev".to_string(),
        user_id: "AIDAEXAMPLE".to_string(),
        arn: "arn:aws:iam::123456789012:user/dev".to_string(),
        path: "/".to_string(),
        create_date: Utc.with_ymd_and_hms(2019, 7, 1, 8, 0, 0).unwrap(),
        tags: vec![],
    }
}

pub fn caller() -> CallerIdentity {
    CallerIdentity {
        account: "123456789012".to_string(),
        user_id: "AIDAEXAMPLE".to_string(),
        arn: "arn:aws:iam::123456789012:user/dev".to_string(),
    }
}

pub fn role(name: &str) -> Role {
    Role {
        role_name: name.to_string(),
        role_id: format!("AROA{}", name.to_uppercase()),
        arn: format!("arn:aws:iam::123456789012:role/{}", name),
        path: "/".to_string(),
        assume_role_policy_document: Some(serde_json::json!({
            "Version": "2012-10-17",
            "Statement": [{"Effect": "Allow", "Principal": {"Service": "ec2.amazonaws.com"}, "Action": "sts:AssumeRole"}]
        })),
        max_session_duration: Some(3600),
        create_date: Utc.with_ymd_and_hms(2019, 7, 25, 10, 22, 30).unwrap(),
        description: None,
        tags: vec![],
    }
}

pub fn policy(name: &str) -> Policy {
    Policy {
        policy_name: name.to_string(),
        policy_id: format!("ANPA{}", name.to_uppercase()),
        arn: format!("arn:aws:iam::aws:policy/{}", name),
        path: "/".to_string(),
        default_version_id: Some("v1".to_string()),
        attachment_count: 2,
        create_date: Utc.with_ymd_and_hms(2018, 6, 5, 22, 20, 40).unwrap(),
        update_date: Utc.with_ymd_and_hms(2019, 2, 1, 9, 0, 0).unwrap(),
    }
}

pub fn service_account(namespace: &str, name: &str, secrets: &[&str]) -> ServiceAccount {
    ServiceAccount {
        namespace: namespace.to_string(),
        name: name.to_string(),
        secrets: secrets
            .iter()
            .map(|s| ObjectReference {
                kind: None,
                namespace: None,
                name: s.to_string(),
                field_path: None,
            })
            .collect(),
        image_pull_secrets: vec![],
        automount_service_account_token: None,
    }
}

pub fn secret(namespace: &str, name: &str) -> Secret {
    let mut data = BTreeMap::new();
    data.insert("token".to_string(), "c2VjcmV0".to_string());
    Secret {
        namespace: namespace.to_string(),
        name: name.to_string(),
        secret_type: "kubernetes.io/service-account-token".to_string(),
        data,
        string_data: BTreeMap::new(),
    }
}

pub fn pod(namespace: &str, name: &str, service_account: &str) -> Pod {
    Pod {
        namespace: namespace.to_string(),
        name: name.to_string(),
        spec: PodSpec {
            containers: vec![Container {
                name: "main".to_string(),
                image: Some("busybox:1.36".to_string()),
                ..Default::default()
            }],
            service_account_name: service_account.to_string(),
            ..Default::default()
        },
        status: PodStatus {
            phase: Some("Running".to_string()),
            ..Default::default()
        },
    }
}

/// Identity facts served by [`FakeIdentity`]
#[derive(Debug, Clone)]
pub struct IdentityState {
    pub roles: Vec<Role>,
    pub policies: Vec<Policy>,
    pub fail: Option<BaselineStep>,
    pub calls: Vec<BaselineStep>,
}

impl Default for IdentityState {
    fn default() -> Self {
        Self {
            roles: vec![role("eks-node"), role("s3-reader")],
            policies: vec![policy("AmazonS3ReadOnlyAccess")],
            fail: None,
            calls: vec![],
        }
    }
}

/// In-memory identity source; clones share state so tests can change it later
#[derive(Debug, Clone, Default)]
pub struct FakeIdentity(pub Arc<Mutex<IdentityState>>);

impl FakeIdentity {
    pub fn state(&self) -> std::sync::MutexGuard<'_, IdentityState> {
        self.0.lock().unwrap()
    }

    fn step<T>(
        &self,
        step: BaselineStep,
        value: impl FnOnce(&IdentityState) -> T,
    ) -> Result<T, SourceError> {
        let mut state = self.state();
        state.calls.push(step);
        if state.fail == Some(step) {
            return Err(SourceError::Unavailable("access denied".to_string()));
        }
        Ok(value(&*state))
    }
}

#[async_trait]
impl IdentitySource for FakeIdentity {
    async fn user(&self) -> Result<User, SourceError> {
        self.step(BaselineStep::User, |_| user())
    }

    async fn caller_identity(&self) -> Result<CallerIdentity, SourceError> {
        self.step(BaselineStep::CallerIdentity, |_| caller())
    }

    async fn roles(&self) -> Result<Vec<Role>, SourceError> {
        self.step(BaselineStep::Roles, |s| s.roles.clone())
    }

    async fn attached_policies(&self) -> Result<Vec<Policy>, SourceError> {
        self.step(BaselineStep::Policies, |s| s.policies.clone())
    }
}

/// Cluster facts served by [`FakeCluster`]
#[derive(Debug, Clone)]
pub struct ClusterState {
    pub context: String,
    pub service_accounts: Vec<ServiceAccount>,
    pub secrets: Vec<Secret>,
    pub pods: Vec<Pod>,
    pub fail: Vec<ClusterCollection>,
}

impl Default for ClusterState {
    fn default() -> Self {
        Self {
            context: "dev-cluster".to_string(),
            service_accounts: vec![
                service_account("ns1", "sa1", &["sa1-token"]),
                service_account("ns1", "sa2", &[]),
                service_account("ns2", "sa1", &[]),
            ],
            secrets: vec![secret("ns1", "sa1-token"), secret("ns2", "db-creds")],
            pods: vec![pod("ns1", "web-0", "sa1"), pod("ns2", "worker-0", "sa1")],
            fail: vec![],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeCluster(pub Arc<Mutex<ClusterState>>);

impl FakeCluster {
    pub fn state(&self) -> std::sync::MutexGuard<'_, ClusterState> {
        self.0.lock().unwrap()
    }

    fn fetch<T>(
        &self,
        collection: ClusterCollection,
        value: impl FnOnce(&ClusterState) -> T,
    ) -> Result<T, SourceError> {
        let state = self.state();
        if state.fail.contains(&collection) {
            return Err(SourceError::Unavailable("forbidden".to_string()));
        }
        Ok(value(&*state))
    }
}

#[async_trait]
impl ClusterSource for FakeCluster {
    async fn active_context(&self) -> Result<String, SourceError> {
        self.fetch(ClusterCollection::Context, |s| s.context.clone())
    }

    async fn service_accounts(&self) -> Result<Vec<ServiceAccount>, SourceError> {
        self.fetch(ClusterCollection::ServiceAccounts, |s| {
            s.service_accounts.clone()
        })
    }

    async fn secrets(&self) -> Result<Vec<Secret>, SourceError> {
        self.fetch(ClusterCollection::Secrets, |s| s.secrets.clone())
    }

    async fn pods(&self) -> Result<Vec<Pod>, SourceError> {
        self.fetch(ClusterCollection::Pods, |s| s.pods.clone())
    }
}

/// Scripted operator input
pub struct ScriptedLines {
    lines: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedLines {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            prompts: vec![],
        }
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
