//! Session start requests against the daemon.

use std::ops::RangeInclusive;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;
use url::Url;
use weft_protocol::{ReferrerRule, SessionStartRequest, SessionStartResult};

use crate::error::{Result, WeftError};

/// Candidate debug-port range offered to the daemon. The daemon owns the
/// final assignment and may answer with a different port.
pub const DEBUG_PORT_RANGE: RangeInclusive<u16> = 1111..=9999;

/// Launch argument that disables image loading in the started browser.
pub const DISABLE_IMAGES_ARG: &str = "--blink-settings=imagesEnabled=false";

/// The referrer-rewrite rule sent with every start request.
pub fn referrer_rules() -> Vec<ReferrerRule> {
	vec![ReferrerRule {
		url: "https://www.google.com".into(),
		replace: "https://www.google.com/".into(),
	}]
}

/// Picks a random candidate port from [`DEBUG_PORT_RANGE`].
pub fn candidate_port() -> u16 {
	rand::rng().random_range(DEBUG_PORT_RANGE)
}

/// Issues a [`SessionStartRequest`] and returns the daemon's answer.
#[async_trait]
pub trait StartSession: Send + Sync {
	async fn start(&self, request: SessionStartRequest) -> Result<SessionStartResult>;
}

/// HTTP starter: `POST {base}/sessions/start`.
pub struct HttpStarter {
	client: reqwest::Client,
	endpoint: Url,
}

impl HttpStarter {
	pub fn new(base_url: &str) -> Result<Self> {
		let endpoint = Url::parse(base_url)
			.and_then(|base| base.join("/sessions/start"))
			.map_err(|err| WeftError::InvalidUrl(format!("{base_url}: {err}")))?;
		Ok(Self { client: reqwest::Client::new(), endpoint })
	}

	pub fn local() -> Result<Self> {
		Self::new(crate::DAEMON_BASE_URL)
	}
}

#[async_trait]
impl StartSession for HttpStarter {
	async fn start(&self, request: SessionStartRequest) -> Result<SessionStartResult> {
		let uuid = request.uuid.clone();
		debug!(
			target = "weft.sessions",
			%uuid,
			candidate_port = request.debug_port,
			headless = request.headless,
			"starting session"
		);

		let response = self
			.client
			.post(self.endpoint.clone())
			.json(&request)
			.send()
			.await
			.map_err(|err| WeftError::SessionStart { uuid: uuid.clone(), message: err.to_string() })?;

		let status = response.status();
		if !status.is_success() {
			return Err(WeftError::SessionStart {
				uuid,
				message: format!("start endpoint returned {status}"),
			});
		}

		response
			.json::<SessionStartResult>()
			.await
			.map_err(|err| WeftError::SessionStart { uuid, message: err.to_string() })
	}
}
