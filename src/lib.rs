//! rbiam library
//!
//! Aggregates AWS IAM and Kubernetes RBAC facts into a single access graph,
//! records what the operator explores and exports traces of it. The binary is
//! a thin shell over these modules; they are public for integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod models;
pub mod shell;
pub mod sources;
pub mod trace;

pub use error::{
    ExportError, FatalConfigError, FatalIdentityError, LookupError, RecoverableSourceError,
    SourceError, StartupError,
};
pub use graph::{AccessGraph, SyncOutcome, synchronize};
pub use trace::{HistoryEntry, Tracer};
