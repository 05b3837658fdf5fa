//! Direct-fetch discovery: one HTTP request to the loopback daemon.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;
use weft_protocol::{BrowserSession, parse_session_list};

use super::Discover;
use crate::error::{Result, WeftError};

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Primary discovery transport: `GET {base}/sessions`.
pub struct DirectFetch {
	client: reqwest::Client,
	endpoint: Url,
}

impl DirectFetch {
	/// Builds a transport against `base_url` (e.g. `http://127.0.0.1:40080`).
	pub fn new(base_url: &str) -> Result<Self> {
		let endpoint = Url::parse(base_url)
			.and_then(|base| base.join("/sessions"))
			.map_err(|err| WeftError::InvalidUrl(format!("{base_url}: {err}")))?;
		let client = reqwest::Client::builder()
			.timeout(DISCOVERY_TIMEOUT)
			.build()
			.map_err(|err| WeftError::Discovery(format!("failed to build http client: {err}")))?;
		Ok(Self { client, endpoint })
	}

	/// Transport against the fixed loopback daemon address.
	pub fn local() -> Result<Self> {
		Self::new(crate::DAEMON_BASE_URL)
	}
}

#[async_trait]
impl Discover for DirectFetch {
	async fn sessions(&self) -> Result<Vec<BrowserSession>> {
		debug!(target = "weft.discovery", endpoint = %self.endpoint, "fetching session list");

		let response = self
			.client
			.get(self.endpoint.clone())
			.send()
			.await
			.map_err(|err| WeftError::Discovery(err.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(WeftError::Discovery(format!(
				"discovery endpoint returned {status}"
			)));
		}

		let body = response
			.text()
			.await
			.map_err(|err| WeftError::Discovery(err.to_string()))?;

		parse_session_list(&body).map_err(|err| WeftError::MalformedResponse(err.to_string()))
	}
}
