//! Access graph model layer
//!
//! Structure:
//! - `identity.rs` - IAM/STS records (users, roles, policies, caller)
//! - `cluster.rs` - Kubernetes records (service accounts, secrets, pods)
//! - `key.rs` - Storage key derivation
//! - `entry_kind.rs` - The kinds of entity recorded in the history

pub mod cluster;
mod entry_kind;
pub mod identity;
pub mod key;

pub use cluster::{
    ClusterContext, Container, EnvVar, LocalObjectReference, ObjectReference, Pod, PodSpec,
    PodStatus, Secret, ServiceAccount, Volume,
};
pub use entry_kind::EntryKind;
pub use identity::{CallerIdentity, Policy, Role, Tag, User, render_policy_document};
pub use key::{KEY_SEPARATOR, Keyed, compose_key, split_key};
