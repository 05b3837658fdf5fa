//! Live graph state for one editing session.
//!
//! [`GraphEditor`] exclusively owns the node/edge arrays between load and
//! save. Edits arrive as incremental change events and are applied as a fold
//! over the current arrays; persistence never happens implicitly — a save
//! action takes [`GraphEditor::snapshot`] through the codec explicitly.

use tracing::debug;

use super::{Edge, Node, Position, WorkflowGraph};

/// Incremental change to the node array.
#[derive(Debug, Clone)]
pub enum NodeChange {
	Add(Node),
	Remove { id: String },
	Move { id: String, position: Position },
	Select { id: String, selected: bool },
}

/// Incremental change to the edge array.
#[derive(Debug, Clone)]
pub enum EdgeChange {
	Add(Edge),
	Remove { id: String },
}

/// Owns the live [`WorkflowGraph`] and applies change events to it.
#[derive(Debug, Default)]
pub struct GraphEditor {
	graph: WorkflowGraph,
}

impl GraphEditor {
	/// Starts an editing session over a loaded graph.
	pub fn new(graph: WorkflowGraph) -> Self {
		Self { graph }
	}

	/// Consistent view for the codec and the run trigger.
	pub fn snapshot(&self) -> &WorkflowGraph {
		&self.graph
	}

	/// Ends the session, yielding the final graph.
	pub fn into_graph(self) -> WorkflowGraph {
		self.graph
	}

	/// Applies node changes in order. Changes that do not apply cleanly
	/// (duplicate add, missing target id) are ignored rather than fatal; the
	/// editing surface only offers gestures against rendered nodes, so these
	/// are defensive paths.
	pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
		for change in changes {
			match change {
				NodeChange::Add(node) => {
					if self.graph.has_node(&node.id) {
						debug!(target = "weft.graph", id = %node.id, "ignoring add for existing node id");
						continue;
					}
					self.graph.nodes.push(node.clone());
				}
				NodeChange::Remove { id } => {
					self.graph.nodes.retain(|n| n.id != *id);
					// Edges referencing the removed node would dangle.
					self.graph.edges.retain(|e| e.source != *id && e.target != *id);
				}
				NodeChange::Move { id, position } => {
					if let Some(node) = self.graph.nodes.iter_mut().find(|n| n.id == *id) {
						node.position = *position;
					}
				}
				NodeChange::Select { id, selected } => {
					if let Some(node) = self.graph.nodes.iter_mut().find(|n| n.id == *id) {
						node.selected = *selected;
					}
				}
			}
		}
	}

	/// Applies edge changes in order. An added edge must reference existing
	/// nodes on both ends or it is dropped.
	pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) {
		for change in changes {
			match change {
				EdgeChange::Add(edge) => {
					if !self.graph.has_node(&edge.source) || !self.graph.has_node(&edge.target) {
						debug!(target = "weft.graph", id = %edge.id, "ignoring edge add with missing endpoint");
						continue;
					}
					if self.graph.edges.iter().any(|e| e.id == edge.id) {
						continue;
					}
					self.graph.edges.push(edge.clone());
				}
				EdgeChange::Remove { id } => {
					self.graph.edges.retain(|e| e.id != *id);
				}
			}
		}
	}

	/// Connects two existing nodes with a fresh edge; no-op when either id
	/// is unknown.
	pub fn connect(&mut self, source: &str, target: &str) {
		if !self.graph.has_node(source) || !self.graph.has_node(target) {
			return;
		}
		let id = format!("{source}->{target}");
		if self.graph.edges.iter().any(|e| e.id == id) {
			return;
		}
		self.graph.edges.push(Edge { id, source: source.into(), target: target.into() });
	}
}
