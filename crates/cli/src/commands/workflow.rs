use std::fs;

use anyhow::{Context, Result};
use weft::graph::codec;
use weft::store::{PersistedWorkflow, WorkflowStore};

use crate::cli::{CreateArgs, WorkflowCommand};

pub fn dispatch(cmd: WorkflowCommand, store: &dyn WorkflowStore) -> Result<()> {
	match cmd {
		WorkflowCommand::List => list(store),
		WorkflowCommand::Show { id } => show(&id, store),
		WorkflowCommand::Create(args) => create(args, store),
		WorkflowCommand::Delete { id } => delete(&id, store),
	}
}

fn list(store: &dyn WorkflowStore) -> Result<()> {
	let workflows = store.list().context("listing workflows")?;
	if workflows.is_empty() {
		println!("No workflows found. Create your first workflow with `weft workflow create`.");
		return Ok(());
	}

	for workflow in workflows {
		let graph = codec::deserialize(Some(&workflow.nodes), Some(&workflow.edges));
		println!(
			"{}  {}  ({} nodes, {} edges)  {}",
			workflow.id.as_deref().unwrap_or("-"),
			workflow.name,
			graph.nodes.len(),
			graph.edges.len(),
			workflow.description,
		);
	}
	Ok(())
}

fn show(id: &str, store: &dyn WorkflowStore) -> Result<()> {
	let workflow = store.load(id).with_context(|| format!("loading workflow {id}"))?;
	let graph = codec::deserialize(Some(&workflow.nodes), Some(&workflow.edges));

	println!("name:        {}", workflow.name);
	println!("description: {}", workflow.description);
	println!("owner:       {}", workflow.owner_id);
	println!("nodes:       {}", graph.nodes.len());
	println!("edges:       {}", graph.edges.len());
	for node in &graph.nodes {
		println!("  [{}] {} ({})", node.id, node.label, node.kind);
	}
	for edge in &graph.edges {
		println!("  {} -> {}", edge.source, edge.target);
	}
	Ok(())
}

fn create(args: CreateArgs, store: &dyn WorkflowStore) -> Result<()> {
	let mut workflow = PersistedWorkflow::new(args.name, args.description);

	if let Some(path) = args.graph {
		let content = fs::read_to_string(&path)
			.with_context(|| format!("reading graph file {}", path.display()))?;
		let value: serde_json::Value =
			serde_json::from_str(&content).context("parsing graph file")?;

		// Run the import through the codec so structural integrity is
		// established before anything hits the store.
		let graph = codec::deserialize(value.get("nodes"), value.get("edges"));
		let (nodes, edges) = codec::serialize(&graph);
		workflow.nodes = nodes;
		workflow.edges = edges;
	}

	let id = store.save(workflow).context("saving workflow")?;
	println!("created workflow {id}");
	Ok(())
}

fn delete(id: &str, store: &dyn WorkflowStore) -> Result<()> {
	store.delete(id).with_context(|| format!("deleting workflow {id}"))?;
	println!("deleted workflow {id}");
	Ok(())
}
