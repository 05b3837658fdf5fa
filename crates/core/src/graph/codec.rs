//! Lossless round-trip between the live graph and its persisted form.
//!
//! The persisted form is a pair of generic JSON arrays stored in an
//! unvalidated structured column, so [`deserialize`] trusts nothing: `null`
//! or absent input is an empty graph, malformed entries are skipped, and
//! edges referencing missing nodes are pruned. A dangling edge is evidence
//! of an earlier partial save, not an actionable error, so pruning is silent
//! apart from a debug log.

use serde_json::Value;
use tracing::debug;

use super::{Edge, Node, WorkflowGraph};

/// Serializes a graph to its persisted `(nodes, edges)` form.
///
/// Deterministic and order-preserving; every field needed to reconstruct
/// rendering position and connectivity survives.
pub fn serialize(graph: &WorkflowGraph) -> (Value, Value) {
	// Vec<T: Serialize> into Value cannot fail.
	let nodes = serde_json::to_value(&graph.nodes).unwrap_or(Value::Array(vec![]));
	let edges = serde_json::to_value(&graph.edges).unwrap_or(Value::Array(vec![]));
	(nodes, edges)
}

/// Rebuilds a graph from its persisted form, enforcing structural integrity.
pub fn deserialize(nodes: Option<&Value>, edges: Option<&Value>) -> WorkflowGraph {
	let nodes = parse_entries::<Node>(nodes, "node");
	let mut seen = Vec::with_capacity(nodes.len());
	let mut unique_nodes = Vec::with_capacity(nodes.len());
	for node in nodes {
		if seen.contains(&node.id) {
			debug!(target = "weft.graph", id = %node.id, "dropping duplicate node id");
			continue;
		}
		seen.push(node.id.clone());
		unique_nodes.push(node);
	}

	let edges = parse_entries::<Edge>(edges, "edge")
		.into_iter()
		.filter(|edge| {
			let intact = seen.iter().any(|id| *id == edge.source)
				&& seen.iter().any(|id| *id == edge.target);
			if !intact {
				debug!(target = "weft.graph", id = %edge.id, "pruning dangling edge");
			}
			intact
		})
		.collect();

	WorkflowGraph { nodes: unique_nodes, edges }
}

/// Parses a persisted array entry-by-entry so one malformed element does not
/// discard the rest of the graph.
fn parse_entries<T: serde::de::DeserializeOwned>(value: Option<&Value>, what: &str) -> Vec<T> {
	let Some(Value::Array(items)) = value else {
		return Vec::new();
	};

	items
		.iter()
		.filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
			Ok(parsed) => Some(parsed),
			Err(err) => {
				debug!(target = "weft.graph", %err, "skipping malformed {what} entry");
				None
			}
		})
		.collect()
}
