//! Graph data structures for the relationship export
//!
//! A small directed graph of trace nodes plus a DOT serializer. A trace node
//! id is its category prefix plus the composite key (`pod/ns1:web-0`) and its
//! label is the bare key, so a service account, a secret and a pod sharing a
//! key stay three nodes. Legend nodes are the upper-case category names.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::config::GraphConfig;
use crate::models::EntryKind;

/// Category of a node, which decides its styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    ServiceAccount,
    Secret,
    Pod,
}

impl NodeCategory {
    /// Category for a traced entry kind; IAM kinds are not drawn
    pub fn for_kind(kind: EntryKind) -> Option<Self> {
        match kind {
            EntryKind::ServiceAccount => Some(NodeCategory::ServiceAccount),
            EntryKind::Secret => Some(NodeCategory::Secret),
            EntryKind::Pod => Some(NodeCategory::Pod),
            EntryKind::Role | EntryKind::Policy => None,
        }
    }

    /// Id of the legend node for this category
    pub fn legend_id(&self) -> &'static str {
        match self {
            NodeCategory::ServiceAccount => "SERVICE ACCOUNT",
            NodeCategory::Secret => "SECRET",
            NodeCategory::Pod => "POD",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            NodeCategory::ServiceAccount => "sa",
            NodeCategory::Secret => "secret",
            NodeCategory::Pod => "pod",
        }
    }

    /// Id of the trace node for a composite key in this category
    pub fn node_id(&self, key: &str) -> String {
        format!("{}/{}", self.prefix(), key)
    }
}

/// A node in the relationship graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    /// Rendered text when it differs from the id
    pub label: Option<String>,
    pub category: NodeCategory,
}

impl GraphNode {
    pub fn legend(category: NodeCategory) -> Self {
        Self {
            id: category.legend_id().to_string(),
            label: None,
            category,
        }
    }

    pub fn trace(category: NodeCategory, key: &str) -> Self {
        Self {
            id: category.node_id(key),
            label: Some(key.to_string()),
            category,
        }
    }
}

/// An edge; legend edges carry a label, inferred edges do not
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: Option<&'static str>,
}

/// Fill and font colours per category
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyle {
    pub service_account_color: String,
    pub secret_color: String,
    pub pod_color: String,
}

impl GraphStyle {
    fn fill(&self, category: NodeCategory) -> &str {
        match category {
            NodeCategory::ServiceAccount => &self.service_account_color,
            NodeCategory::Secret => &self.secret_color,
            NodeCategory::Pod => &self.pod_color,
        }
    }

    fn font(category: NodeCategory) -> &'static str {
        match category {
            NodeCategory::Pod => "#f0f0f0",
            NodeCategory::ServiceAccount | NodeCategory::Secret => "#000000",
        }
    }
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self::from(&GraphConfig::default())
    }
}

impl From<&GraphConfig> for GraphStyle {
    fn from(config: &GraphConfig) -> Self {
        Self {
            service_account_color: config.service_account_color.clone(),
            secret_color: config.secret_color.clone(),
            pod_color: config.pod_color.clone(),
        }
    }
}

const FONT: &str = "Helvetica";

/// A graph representing traced relationships
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    /// All nodes in insertion order
    pub nodes: Vec<GraphNode>,
    /// All edges in insertion order
    pub edges: Vec<GraphEdge>,
    /// Map from node ID to index in nodes vector
    pub node_index: HashMap<String, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node unless one with the same id already exists
    ///
    /// Returns false when the id was already present.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).and_then(|&i| self.nodes.get(i))
    }

    /// Render as a Graphviz digraph: nodes first, then edges
    pub fn to_dot(&self, style: &GraphStyle) -> String {
        let mut out = String::from("digraph rbiam {\n");

        for node in &self.nodes {
            let label = node
                .label
                .as_deref()
                .map(|label| format!("label={}, ", quote(label)))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "    {} [{}style=\"filled\", fillcolor={}, fontcolor={}, fontname={}];",
                quote(&node.id),
                label,
                quote(style.fill(node.category)),
                quote(GraphStyle::font(node.category)),
                quote(FONT),
            );
        }

        for edge in &self.edges {
            match edge.label {
                Some(label) => {
                    let _ = writeln!(
                        out,
                        "    {} -> {} [label={}, fontname={}];",
                        quote(&edge.from),
                        quote(&edge.to),
                        quote(label),
                        quote(FONT),
                    );
                }
                None => {
                    let _ = writeln!(out, "    {} -> {};", quote(&edge.from), quote(&edge.to));
                }
            }
        }

        out.push_str("}\n");
        out
    }
}

/// Quote a DOT identifier
fn quote(id: &str) -> String {
    let mut quoted = String::with_capacity(id.len() + 2);
    quoted.push('"');
    for c in id.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
