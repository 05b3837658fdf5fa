//! Execution trigger seam.
//!
//! Running a saved workflow is a single opaque remote call from this
//! crate's perspective: the execution engine loads the persisted graph
//! itself and drives the started sessions. Only sessions with a debug port
//! are runnable; that filtering is the caller's job before triggering.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::{Result, WeftError};

/// Fire-and-forget run invocation.
#[async_trait]
pub trait TriggerRun: Send + Sync {
	async fn run(&self, workflow_id: &str) -> Result<()>;
}

/// Posts the workflow id to the daemon's run endpoint.
pub struct DaemonTrigger {
	client: reqwest::Client,
	endpoint: Url,
}

impl DaemonTrigger {
	pub fn new(base_url: &str) -> Result<Self> {
		let endpoint = Url::parse(base_url)
			.and_then(|base| base.join("/workflows/run"))
			.map_err(|err| WeftError::InvalidUrl(format!("{base_url}: {err}")))?;
		Ok(Self { client: reqwest::Client::new(), endpoint })
	}

	pub fn local() -> Result<Self> {
		Self::new(crate::DAEMON_BASE_URL)
	}
}

#[async_trait]
impl TriggerRun for DaemonTrigger {
	async fn run(&self, workflow_id: &str) -> Result<()> {
		debug!(target = "weft.trigger", %workflow_id, "triggering workflow run");

		let response = self
			.client
			.post(self.endpoint.clone())
			.json(&json!({ "id": workflow_id }))
			.send()
			.await
			.map_err(|err| WeftError::Trigger(err.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(WeftError::Trigger(format!("run endpoint returned {status}")));
		}
		Ok(())
	}
}
