//! Access graph model and synchronization
//!
//! The graph is an immutable value: [`synchronize`] builds a new one and the
//! session swaps it in wholesale.

mod access_graph;
mod sync;

pub use access_graph::{AccessGraph, GraphSummary, Record};
pub use sync::{SyncOutcome, synchronize};
