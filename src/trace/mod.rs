//! Exploration history and trace windows
//!
//! Every successful lookup in the shell is recorded here. An operator brackets
//! the lookups they care about with `trace` and an export command; the
//! exporters then work on that window.

mod history;
mod tracer;

pub use history::HistoryEntry;
pub use tracer::Tracer;
