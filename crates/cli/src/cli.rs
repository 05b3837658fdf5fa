use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "weft", version, about = "Edit and run browser-automation workflows")]
pub struct Cli {
	/// Increase log verbosity (-v info, -vv debug).
	#[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Base URL of the local automation daemon.
	#[arg(long, global = true, default_value = weft::DAEMON_BASE_URL)]
	pub base_url: String,

	/// Workflow store directory (defaults to the user config directory).
	#[arg(long, global = true)]
	pub store_dir: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Manage stored workflows.
	#[command(subcommand)]
	Workflow(WorkflowCommand),

	/// Inspect browser sessions known to the daemon.
	#[command(subcommand)]
	Sessions(SessionsCommand),

	/// Run a workflow against selected browser sessions.
	Run(RunArgs),
}

#[derive(Debug, Subcommand)]
pub enum WorkflowCommand {
	/// List workflows, newest first.
	List,
	/// Show one workflow, including its graph.
	Show { id: String },
	/// Create a workflow, optionally importing a graph from a JSON file.
	Create(CreateArgs),
	/// Delete a workflow.
	Delete { id: String },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
	#[arg(long)]
	pub name: String,
	#[arg(long)]
	pub description: String,
	/// JSON file with `{"nodes": [...], "edges": [...]}`.
	#[arg(long)]
	pub graph: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
	/// List sessions reported by the daemon.
	List {
		/// Case-insensitive name filter.
		#[arg(long, default_value = "")]
		query: String,
	},
}

#[derive(Debug, Args)]
pub struct RunArgs {
	/// Workflow id to run.
	pub id: String,

	/// Session uuid to run against; repeatable.
	#[arg(long = "session", value_name = "UUID")]
	pub sessions: Vec<String>,

	/// Select every discovered session.
	#[arg(long, conflicts_with = "sessions")]
	pub all: bool,

	/// Start the selected sessions headless.
	#[arg(long)]
	pub headless: bool,
}
