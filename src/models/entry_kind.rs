//! Entity kind definitions
//!
//! Centralizes the five kinds of entity an operator can look up and record in
//! the history. The label is the stable text used in the history encoding
//! (`[<label>] <key>`), so it must never change between releases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration of all entity kinds that can appear in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryKind {
    // Cloud identity side
    Role,
    Policy,
    // Cluster side
    ServiceAccount,
    Secret,
    Pod,
}

impl EntryKind {
    /// Get the history label as a string
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Role => "IAM role",
            EntryKind::Policy => "IAM policy",
            EntryKind::ServiceAccount => "Kubernetes service account",
            EntryKind::Secret => "Kubernetes secret",
            EntryKind::Pod => "Kubernetes pod",
        }
    }

    /// Get all entry kinds
    pub fn all() -> &'static [Self] {
        &[
            EntryKind::Role,
            EntryKind::Policy,
            EntryKind::ServiceAccount,
            EntryKind::Secret,
            EntryKind::Pod,
        ]
    }

    /// Returns true for kinds keyed by a composite namespaced key
    pub fn is_namespaced(&self) -> bool {
        matches!(
            self,
            EntryKind::ServiceAccount | EntryKind::Secret | EntryKind::Pod
        )
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|kind| kind.label() == s)
            .copied()
            .ok_or_else(|| format!("Unknown entry kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(EntryKind::Role.label(), "IAM role");
        assert_eq!(
            EntryKind::ServiceAccount.label(),
            "Kubernetes service account"
        );
    }

    #[test]
    fn test_from_str() {
        for kind in EntryKind::all() {
            assert_eq!(kind.label().parse::<EntryKind>(), Ok(*kind));
        }
        assert!("iam role".parse::<EntryKind>().is_err());
        assert_eq!(
            "Unknown".parse::<EntryKind>(),
            Err("Unknown entry kind: Unknown".to_string())
        );
    }

    #[test]
    fn test_is_namespaced() {
        assert!(!EntryKind::Role.is_namespaced());
        assert!(!EntryKind::Policy.is_namespaced());
        assert!(EntryKind::Pod.is_namespaced());
    }
}
