//! Error taxonomy
//!
//! Source adapters fail with [`SourceError`]. Synchronization classifies
//! those failures: baseline identity failures are fatal, cluster failures are
//! recoverable warnings. Startup failures map onto the process exit codes.

use std::path::PathBuf;

use crate::models::EntryKind;

/// Failure of a single fetch against the identity or cluster source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to decode output of `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Kubernetes API request failed: {0}")]
    Kube(#[from] kube::Error),

    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Ambient cloud configuration could not be loaded (exit code 1)
#[derive(Debug, thiserror::Error)]
#[error("Can't load AWS config: {0}")]
pub struct FatalConfigError(#[source] pub SourceError);

/// The baseline identity fetch that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineStep {
    User,
    CallerIdentity,
    Roles,
    Policies,
}

impl std::fmt::Display for BaselineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let step = match self {
            BaselineStep::User => "user",
            BaselineStep::CallerIdentity => "caller identity",
            BaselineStep::Roles => "roles",
            BaselineStep::Policies => "policies",
        };
        write!(f, "{}", step)
    }
}

/// A baseline identity fetch failed; no graph can be built (exit code 2)
#[derive(Debug, thiserror::Error)]
#[error("Can't get {step}: {source}")]
pub struct FatalIdentityError {
    pub step: BaselineStep,
    #[source]
    pub source: SourceError,
}

/// The optional cluster collection that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterCollection {
    Context,
    ServiceAccounts,
    Secrets,
    Pods,
}

impl std::fmt::Display for ClusterCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let collection = match self {
            ClusterCollection::Context => "Kubernetes identity",
            ClusterCollection::ServiceAccounts => "Kubernetes service accounts",
            ClusterCollection::Secrets => "Kubernetes secrets",
            ClusterCollection::Pods => "Kubernetes pods",
        };
        write!(f, "{}", collection)
    }
}

/// An optional cluster fetch failed; the collection was left empty
#[derive(Debug, thiserror::Error)]
#[error("Can't get {collection}: {source}")]
pub struct RecoverableSourceError {
    pub collection: ClusterCollection,
    #[source]
    pub source: SourceError,
}

/// A history key that no longer resolves in the current access graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} {key} is no longer in the access graph")]
pub struct LookupError {
    pub kind: EntryKind,
    pub key: String,
}

/// Export failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialize {kind} {key}: {source}")]
    Serialize {
        kind: EntryKind,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that stops the session from starting
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] FatalConfigError),

    #[error(transparent)]
    Identity(#[from] FatalIdentityError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// Terminal I/O failed once the session was running (exit code 3)
    #[error("Session aborted: {0:#}")]
    Session(#[source] anyhow::Error),
}

impl StartupError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Config(_) | StartupError::Other(_) => 1,
            StartupError::Identity(_) => 2,
            StartupError::Session(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let config = StartupError::from(FatalConfigError(SourceError::Unavailable(
            "no credentials".to_string(),
        )));
        assert_eq!(config.exit_code(), 1);

        let identity = StartupError::from(FatalIdentityError {
            step: BaselineStep::Roles,
            source: SourceError::Unavailable("denied".to_string()),
        });
        assert_eq!(identity.exit_code(), 2);
        assert_eq!(identity.to_string(), "Can't get roles: denied");

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let session = StartupError::Session(anyhow::Error::from(io));
        assert_eq!(session.exit_code(), 3);
        assert_eq!(session.to_string(), "Session aborted: stdout closed");
    }

    #[test]
    fn test_lookup_error_message() {
        let err = LookupError {
            kind: EntryKind::Pod,
            key: "ns1:web-0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Kubernetes pod ns1:web-0 is no longer in the access graph"
        );
    }
}
