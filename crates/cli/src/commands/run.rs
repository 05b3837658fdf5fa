use anyhow::{Context, Result, bail};
use tracing::warn;
use weft::discovery::DirectFetch;
use weft::sessions::{HttpStarter, SessionPicker};
use weft::store::WorkflowStore;
use weft::trigger::{DaemonTrigger, TriggerRun};

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, base_url: &str, store: &dyn WorkflowStore) -> Result<()> {
	let workflow = store
		.load(&args.id)
		.with_context(|| format!("loading workflow {}", args.id))?;
	let workflow_id = workflow.id.as_deref().unwrap_or(&args.id).to_string();

	let transport = DirectFetch::new(base_url)?;
	let mut picker = SessionPicker::new(HttpStarter::new(base_url)?);
	picker.set_headless(args.headless);

	// Discovery failure is non-fatal by policy, but with zero sessions there
	// is nothing to run against, so report it and stop here.
	if let Err(err) = picker.refresh(&transport).await {
		warn!(target = "weft.cli", %err, "session discovery failed");
		bail!("no sessions available: {err}");
	}

	if args.all {
		let uuids: Vec<String> = picker.sessions().iter().map(|s| s.uuid.clone()).collect();
		for uuid in uuids {
			picker.toggle_select(&uuid, true);
		}
	} else {
		if args.sessions.is_empty() {
			bail!("select sessions with --session <uuid> or --all");
		}
		for uuid in &args.sessions {
			if !picker.sessions().iter().any(|s| s.uuid == *uuid) {
				bail!("unknown session uuid: {uuid}");
			}
			picker.toggle_select(uuid, true);
		}
	}

	let (confirmed, errors) = picker.confirm_selection().await;
	for err in &errors {
		eprintln!("warning: {err}");
	}

	let mut runnable = 0;
	for session in &confirmed {
		match session.debug_port {
			Some(port) => {
				runnable += 1;
				println!("{}  {}  debug port {}", session.uuid, session.name, port);
			}
			None => println!("{}  {}  not runnable (start failed)", session.uuid, session.name),
		}
	}

	if runnable == 0 {
		bail!("no runnable sessions; all starts failed");
	}

	DaemonTrigger::new(base_url)?
		.run(&workflow_id)
		.await
		.with_context(|| format!("running workflow {workflow_id}"))?;

	println!("workflow {} dispatched to {} session(s)", workflow.name, runnable);
	Ok(())
}
