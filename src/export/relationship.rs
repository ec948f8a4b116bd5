//! Relationship graph construction
//!
//! Pods and service accounts have no object reference between them, only the
//! pod's declared service account name. An edge `pod -> service account` is
//! drawn when that declared name, composed with the pod's namespace, equals a
//! traced service account key. Nodes are identified by category and key, so
//! a service account, a secret and a pod may share a composite key.

use super::graph::{GraphEdge, GraphNode, NodeCategory, ResourceGraph};
use crate::error::LookupError;
use crate::graph::AccessGraph;
use crate::models::EntryKind;
use crate::trace::HistoryEntry;

/// Graph built from a trace window plus the pods that no longer resolve
#[derive(Debug)]
pub struct RelationshipGraph {
    pub graph: ResourceGraph,
    pub skipped: Vec<LookupError>,
}

fn legend(graph: &mut ResourceGraph) {
    for category in [
        NodeCategory::ServiceAccount,
        NodeCategory::Secret,
        NodeCategory::Pod,
    ] {
        graph.add_node(GraphNode::legend(category));
    }
    graph.add_edge(GraphEdge {
        from: NodeCategory::Pod.legend_id().to_string(),
        to: NodeCategory::ServiceAccount.legend_id().to_string(),
        label: Some("uses"),
    });
    graph.add_edge(GraphEdge {
        from: NodeCategory::ServiceAccount.legend_id().to_string(),
        to: NodeCategory::Secret.legend_id().to_string(),
        label: Some("has"),
    });
}

pub fn build_relationship_graph(
    entries: &[HistoryEntry],
    access: &AccessGraph,
) -> RelationshipGraph {
    let mut graph = ResourceGraph::new();
    legend(&mut graph);

    for entry in entries {
        if let Some(category) = NodeCategory::for_kind(entry.kind) {
            graph.add_node(GraphNode::trace(category, &entry.key));
        }
    }

    let mut traced_pods: Vec<&str> = Vec::new();
    let mut traced_service_accounts: Vec<&str> = Vec::new();
    for entry in entries {
        let keys = match entry.kind {
            EntryKind::Pod => &mut traced_pods,
            EntryKind::ServiceAccount => &mut traced_service_accounts,
            _ => continue,
        };
        if !keys.contains(&entry.key.as_str()) {
            keys.push(&entry.key);
        }
    }

    let mut skipped = Vec::new();
    for pod_key in traced_pods {
        let Some(pod) = access.pod(pod_key) else {
            tracing::warn!("Pod {} is no longer in the access graph", pod_key);
            skipped.push(LookupError {
                kind: EntryKind::Pod,
                key: pod_key.to_string(),
            });
            continue;
        };

        let declared = pod.service_account_key();
        for sa_key in &traced_service_accounts {
            if *sa_key == declared {
                graph.add_edge(GraphEdge {
                    from: NodeCategory::Pod.node_id(pod_key),
                    to: NodeCategory::ServiceAccount.node_id(sa_key),
                    label: None,
                });
            }
        }
    }

    RelationshipGraph { graph, skipped }
}
