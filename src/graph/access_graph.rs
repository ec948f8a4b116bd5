//! The access graph read model
//!
//! Holds the combined IAM and RBAC facts of one synchronization. Collections
//! are only ever populated through [`Keyed`], so every map key is derived
//! from the record it indexes. Lookups return `Option`; a missing key is never
//! papered over with an empty record.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::LookupError;
use crate::models::{
    CallerIdentity, ClusterContext, EntryKind, Keyed, Pod, Policy, Role, Secret, ServiceAccount,
    User,
};
use crate::trace::HistoryEntry;

fn index<T: Keyed>(items: impl IntoIterator<Item = T>) -> BTreeMap<String, T> {
    items.into_iter().map(|item| (item.key(), item)).collect()
}

/// Combined IAM and RBAC access control facts
#[derive(Debug, Clone, PartialEq)]
pub struct AccessGraph {
    caller: CallerIdentity,
    user: User,
    active_context: Option<ClusterContext>,
    roles: BTreeMap<String, Role>,
    policies: BTreeMap<String, Policy>,
    service_accounts: BTreeMap<String, ServiceAccount>,
    secrets: BTreeMap<String, Secret>,
    pods: BTreeMap<String, Pod>,
}

impl AccessGraph {
    /// Create a graph holding only the baseline caller facts
    pub fn new(user: User, caller: CallerIdentity) -> Self {
        Self {
            caller,
            user,
            active_context: None,
            roles: BTreeMap::new(),
            policies: BTreeMap::new(),
            service_accounts: BTreeMap::new(),
            secrets: BTreeMap::new(),
            pods: BTreeMap::new(),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = index(roles);
        self
    }

    pub fn with_policies(mut self, policies: impl IntoIterator<Item = Policy>) -> Self {
        self.policies = index(policies);
        self
    }

    pub fn with_active_context(mut self, context: Option<ClusterContext>) -> Self {
        self.active_context = context;
        self
    }

    pub fn with_service_accounts(
        mut self,
        service_accounts: impl IntoIterator<Item = ServiceAccount>,
    ) -> Self {
        self.service_accounts = index(service_accounts);
        self
    }

    pub fn with_secrets(mut self, secrets: impl IntoIterator<Item = Secret>) -> Self {
        self.secrets = index(secrets);
        self
    }

    pub fn with_pods(mut self, pods: impl IntoIterator<Item = Pod>) -> Self {
        self.pods = index(pods);
        self
    }

    pub fn caller(&self) -> &CallerIdentity {
        &self.caller
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn active_context(&self) -> Option<&ClusterContext> {
        self.active_context.as_ref()
    }

    pub fn role(&self, key: &str) -> Option<&Role> {
        self.roles.get(key)
    }

    pub fn policy(&self, key: &str) -> Option<&Policy> {
        self.policies.get(key)
    }

    pub fn service_account(&self, key: &str) -> Option<&ServiceAccount> {
        self.service_accounts.get(key)
    }

    pub fn secret(&self, key: &str) -> Option<&Secret> {
        self.secrets.get(key)
    }

    pub fn pod(&self, key: &str) -> Option<&Pod> {
        self.pods.get(key)
    }

    pub fn roles(&self) -> &BTreeMap<String, Role> {
        &self.roles
    }

    pub fn policies(&self) -> &BTreeMap<String, Policy> {
        &self.policies
    }

    pub fn service_accounts(&self) -> &BTreeMap<String, ServiceAccount> {
        &self.service_accounts
    }

    pub fn secrets(&self) -> &BTreeMap<String, Secret> {
        &self.secrets
    }

    pub fn pods(&self) -> &BTreeMap<String, Pod> {
        &self.pods
    }

    /// Live keys of one collection, sorted
    pub fn keys(&self, kind: EntryKind) -> Vec<&str> {
        match kind {
            EntryKind::Role => self.roles.keys().map(String::as_str).collect(),
            EntryKind::Policy => self.policies.keys().map(String::as_str).collect(),
            EntryKind::ServiceAccount => {
                self.service_accounts.keys().map(String::as_str).collect()
            }
            EntryKind::Secret => self.secrets.keys().map(String::as_str).collect(),
            EntryKind::Pod => self.pods.keys().map(String::as_str).collect(),
        }
    }

    /// Resolve a history entry against the current collections
    pub fn resolve(&self, entry: &HistoryEntry) -> Result<Record<'_>, LookupError> {
        let key = entry.key.as_str();
        let record = match entry.kind {
            EntryKind::Role => self.role(key).map(Record::Role),
            EntryKind::Policy => self.policy(key).map(Record::Policy),
            EntryKind::ServiceAccount => self.service_account(key).map(Record::ServiceAccount),
            EntryKind::Secret => self.secret(key).map(Record::Secret),
            EntryKind::Pod => self.pod(key).map(Record::Pod),
        };
        record.ok_or_else(|| LookupError {
            kind: entry.kind,
            key: entry.key.clone(),
        })
    }

    /// Per-collection counts
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            roles: self.roles.len(),
            policies: self.policies.len(),
            service_accounts: self.service_accounts.len(),
            secrets: self.secrets.len(),
            pods: self.pods.len(),
        }
    }
}

/// A record resolved from the access graph
///
/// Serializes as the bare record, without any wrapping tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record<'a> {
    Role(&'a Role),
    Policy(&'a Policy),
    ServiceAccount(&'a ServiceAccount),
    Secret(&'a Secret),
    Pod(&'a Pod),
}

/// Collection sizes of an access graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphSummary {
    pub roles: usize,
    pub policies: usize,
    pub service_accounts: usize,
    pub secrets: usize,
    pub pods: usize,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} roles, {} policies, {} service accounts, {} secrets, {} pods",
            self.roles, self.policies, self.service_accounts, self.secrets, self.pods
        )
    }
}
