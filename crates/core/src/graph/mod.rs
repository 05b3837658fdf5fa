//! Workflow graph model.
//!
//! A [`WorkflowGraph`] is an ordered node/edge graph. Node ids are stable
//! across edit sessions; edges are keyed independently and reference nodes
//! by id. The one structural invariant that matters is that no edge may
//! reference a missing node id — [`codec`] enforces it on load, and
//! [`editor::GraphEditor`] refuses to create such edges in the first place.

pub mod codec;
pub mod editor;

use serde::{Deserialize, Serialize};

/// Canvas coordinates for rendering a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

/// A single workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: String,
	/// Step kind from the node-type catalog (opaque to the graph layer).
	#[serde(rename = "type")]
	pub kind: String,
	pub label: String,
	pub position: Position,
	/// Step configuration; interpreted by the execution engine, not here.
	#[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
	pub data: serde_json::Value,
	/// Transient editor selection state.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub selected: bool,
}

/// A directed dependency between two steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub target: String,
}

/// Ordered node/edge graph for one workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowGraph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl WorkflowGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	/// Returns `true` when a node with `id` exists.
	pub fn has_node(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n.id == id)
	}
}

#[cfg(test)]
pub(crate) mod testutil {
	use super::*;

	pub fn node(id: &str) -> Node {
		Node {
			id: id.into(),
			kind: "navigate".into(),
			label: format!("step {id}"),
			position: Position { x: 0.0, y: 0.0 },
			data: serde_json::Value::Null,
			selected: false,
		}
	}

	pub fn edge(id: &str, source: &str, target: &str) -> Edge {
		Edge { id: id.into(), source: source.into(), target: target.into() }
	}
}
