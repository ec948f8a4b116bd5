//! Trace exporters
//!
//! Both exporters take a trace window and the current access graph and write
//! a single artifact named `{prefix}-{unix-seconds}.{ext}`. Two exports in the
//! same second and format write to the same path; the later one wins.

mod graph;
mod raw;
mod relationship;

pub use graph::{GraphEdge, GraphNode, GraphStyle, NodeCategory, ResourceGraph};
pub use raw::{RawSnapshot, render_raw};
pub use relationship::{RelationshipGraph, build_relationship_graph};

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{ExportError, LookupError};
use crate::graph::AccessGraph;
use crate::trace::HistoryEntry;

/// Outcome of a successful export
#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub exported: usize,
    pub skipped: Vec<LookupError>,
}

#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    prefix: String,
    style: GraphStyle,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, style: GraphStyle) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            style,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.export.output_dir.clone(),
            config.export.prefix.clone(),
            GraphStyle::from(&config.graph),
        )
    }

    /// Path of the artifact for a given timestamp and extension
    pub fn artifact_path(&self, unix_seconds: i64, ext: &str) -> PathBuf {
        self.dir.join(format!("{}-{}.{}", self.prefix, unix_seconds, ext))
    }

    /// Write the raw JSON Lines snapshot
    pub fn export_raw(
        &self,
        entries: &[HistoryEntry],
        graph: &AccessGraph,
    ) -> Result<ExportReport, ExportError> {
        let snapshot = render_raw(entries, graph)?;
        let path = self.artifact_path(chrono::Utc::now().timestamp(), "json");
        write(&path, &snapshot.body)?;

        tracing::info!(
            "Exported {} entries to {} ({} skipped)",
            snapshot.exported,
            path.display(),
            snapshot.skipped.len()
        );

        Ok(ExportReport {
            path,
            exported: snapshot.exported,
            skipped: snapshot.skipped,
        })
    }

    /// Write the DOT relationship graph
    ///
    /// `exported` counts drawn trace nodes, not entries.
    pub fn export_graph(
        &self,
        entries: &[HistoryEntry],
        graph: &AccessGraph,
    ) -> Result<ExportReport, ExportError> {
        let relationships = build_relationship_graph(entries, graph);
        let dot = relationships.graph.to_dot(&self.style);
        let path = self.artifact_path(chrono::Utc::now().timestamp(), "dot");
        write(&path, &dot)?;

        let legend_nodes = 3;
        let exported = relationships.graph.nodes.len().saturating_sub(legend_nodes);
        tracing::info!(
            "Exported graph with {} nodes and {} edges to {}",
            exported,
            relationships.graph.edges.len(),
            path.display()
        );

        Ok(ExportReport {
            path,
            exported,
            skipped: relationships.skipped,
        })
    }
}

fn write(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
