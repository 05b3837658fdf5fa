use anyhow::{Context, Result};
use weft::discovery::DirectFetch;
use weft::sessions::{HttpStarter, SessionPicker};

use crate::cli::SessionsCommand;

pub async fn dispatch(cmd: SessionsCommand, base_url: &str) -> Result<()> {
	match cmd {
		SessionsCommand::List { query } => list(&query, base_url).await,
	}
}

async fn list(query: &str, base_url: &str) -> Result<()> {
	let transport = DirectFetch::new(base_url)?;
	let mut picker = SessionPicker::new(HttpStarter::new(base_url)?);

	picker
		.refresh(&transport)
		.await
		.context("discovering sessions; is the automation daemon running?")?;

	let visible = picker.visible_sessions(query);
	if visible.is_empty() {
		println!("No browser sessions found.");
		return Ok(());
	}

	for session in visible {
		let proxy = session.proxy.as_ref().map(|p| p.protocol.as_str()).unwrap_or("-");
		println!("{}  {}  status={}  proxy={}", session.uuid, session.name, session.status, proxy);
	}
	Ok(())
}
