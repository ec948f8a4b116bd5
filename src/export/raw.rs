//! Raw snapshot: one compact JSON document per traced entry

use crate::error::{ExportError, LookupError};
use crate::graph::AccessGraph;
use crate::trace::HistoryEntry;

/// Rendered JSON Lines body plus what was left out
#[derive(Debug)]
pub struct RawSnapshot {
    pub body: String,
    pub exported: usize,
    pub skipped: Vec<LookupError>,
}

/// Resolve and serialize every entry, in entry order
///
/// Entries whose key no longer resolves are skipped and reported.
pub fn render_raw(
    entries: &[HistoryEntry],
    graph: &AccessGraph,
) -> Result<RawSnapshot, ExportError> {
    let mut body = String::new();
    let mut exported = 0;
    let mut skipped = Vec::new();

    for entry in entries {
        let record = match graph.resolve(entry) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("Skipping {}: {}", entry, err);
                skipped.push(err);
                continue;
            }
        };

        let line = serde_json::to_string(&record).map_err(|source| ExportError::Serialize {
            kind: entry.kind,
            key: entry.key.clone(),
            source,
        })?;
        body.push_str(&line);
        body.push('\n');
        exported += 1;
    }

    Ok(RawSnapshot {
        body,
        exported,
        skipped,
    })
}
