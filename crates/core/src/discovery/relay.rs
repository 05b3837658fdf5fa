//! Legacy relay discovery.
//!
//! Older daemons could not answer a cross-origin fetch; instead the caller
//! opened a secondary browsing context at the discovery endpoint and the
//! daemon posted the session list back as a cross-context message. The
//! secondary context and its message subscription are a scoped resource:
//! they must be released on success, failure, timeout, and cancellation.
//! That contract is split between RAII (implementations release on drop, so
//! a cancelled future cannot leak the context) and an explicit
//! [`RelayChannel::close`] for graceful early teardown.
//!
//! Only messages whose declared origin matches the daemon origin are
//! trusted; anything else is ignored and the wait continues until the
//! timeout elapses.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};
use url::Url;
use weft_protocol::{BrowserSession, parse_session_list};

use super::Discover;
use crate::error::{Result, WeftError};

/// How long to wait for the daemon to post the session list.
pub const RELAY_WAIT: Duration = Duration::from_secs(15);

/// A cross-context message as observed by the opener.
#[derive(Debug, Clone)]
pub struct RelayMessage {
	/// Declared origin of the sender, e.g. `http://127.0.0.1:40080`.
	pub origin: String,
	/// JSON-encoded payload.
	pub data: String,
}

/// Message subscription tied to one secondary browsing context.
///
/// Dropping the channel must release the subscription and close the
/// context; `close` exists so the happy path can tear down eagerly instead
/// of waiting for drop.
#[async_trait]
pub trait RelayChannel: Send {
	/// Next message, or `None` once the context is gone.
	async fn recv(&mut self) -> Option<RelayMessage>;

	/// Releases the subscription and closes the secondary context.
	/// Idempotent.
	async fn close(&mut self);
}

/// Opens a secondary browsing context at the discovery endpoint.
#[async_trait]
pub trait RelayOpener: Send + Sync {
	async fn open(&self, endpoint: &str) -> Result<Box<dyn RelayChannel>>;
}

/// Legacy discovery transport backed by a [`RelayOpener`].
pub struct RelayDiscovery<O> {
	opener: O,
	origin: String,
	endpoint: String,
	wait: Duration,
}

impl<O: RelayOpener> RelayDiscovery<O> {
	/// Builds a relay transport against `base_url`. The expected message
	/// origin is derived from the same URL, so a daemon can never be trusted
	/// on one origin and messaged from another.
	pub fn new(opener: O, base_url: &str) -> Result<Self> {
		let base = Url::parse(base_url)
			.map_err(|err| WeftError::InvalidUrl(format!("{base_url}: {err}")))?;
		let origin = base.origin().ascii_serialization();
		let endpoint = base
			.join("/sessions")
			.map_err(|err| WeftError::InvalidUrl(format!("{base_url}: {err}")))?
			.to_string();
		Ok(Self { opener, origin, endpoint, wait: RELAY_WAIT })
	}

	/// Overrides the message wait, mainly for tests.
	pub fn with_wait(mut self, wait: Duration) -> Self {
		self.wait = wait;
		self
	}

	async fn wait_for_sessions(
		&self,
		channel: &mut Box<dyn RelayChannel>,
	) -> Result<Vec<BrowserSession>> {
		let deadline = Instant::now() + self.wait;

		loop {
			let message = match timeout_at(deadline, channel.recv()).await {
				Ok(Some(message)) => message,
				Ok(None) => {
					return Err(WeftError::Discovery(
						"relay context closed before delivering sessions".into(),
					));
				}
				Err(_) => {
					return Err(WeftError::Discovery(format!(
						"timed out after {:?} waiting for relay message",
						self.wait
					)));
				}
			};

			if message.origin != self.origin {
				warn!(
					target = "weft.discovery",
					origin = %message.origin,
					expected = %self.origin,
					"ignoring relay message from unexpected origin"
				);
				continue;
			}

			return parse_session_list(&message.data)
				.map_err(|err| WeftError::MalformedResponse(err.to_string()));
		}
	}
}

#[async_trait]
impl<O: RelayOpener> Discover for RelayDiscovery<O> {
	async fn sessions(&self) -> Result<Vec<BrowserSession>> {
		debug!(target = "weft.discovery", endpoint = %self.endpoint, "opening relay context");
		let mut channel = self.opener.open(&self.endpoint).await?;

		// Close on every exit path; drop covers cancellation.
		let outcome = self.wait_for_sessions(&mut channel).await;
		channel.close().await;
		outcome
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicBool, Ordering};

	use tokio::sync::{Mutex, mpsc};

	use super::*;

	struct TestChannel {
		rx: mpsc::UnboundedReceiver<RelayMessage>,
		closed: Arc<AtomicBool>,
	}

	#[async_trait]
	impl RelayChannel for TestChannel {
		async fn recv(&mut self) -> Option<RelayMessage> {
			self.rx.recv().await
		}

		async fn close(&mut self) {
			self.closed.store(true, Ordering::SeqCst);
			self.rx.close();
		}
	}

	struct TestOpener {
		channel: Mutex<Option<TestChannel>>,
	}

	#[async_trait]
	impl RelayOpener for TestOpener {
		async fn open(&self, _endpoint: &str) -> Result<Box<dyn RelayChannel>> {
			let channel = self.channel.lock().await.take().expect("opened twice");
			Ok(Box::new(channel))
		}
	}

	fn relay_fixture(
		wait: Duration,
	) -> (RelayDiscovery<TestOpener>, mpsc::UnboundedSender<RelayMessage>, Arc<AtomicBool>) {
		let (tx, rx) = mpsc::unbounded_channel();
		let closed = Arc::new(AtomicBool::new(false));
		let opener = TestOpener {
			channel: Mutex::new(Some(TestChannel { rx, closed: Arc::clone(&closed) })),
		};
		let relay = RelayDiscovery::new(opener, "http://127.0.0.1:40080").unwrap().with_wait(wait);
		(relay, tx, closed)
	}

	#[tokio::test]
	async fn accepts_matching_origin_payload() {
		let (relay, tx, closed) = relay_fixture(Duration::from_secs(1));
		tx.send(RelayMessage {
			origin: "http://127.0.0.1:40080".into(),
			data: r#"[{"uuid": "a-1", "name": "scraper", "status": "Active"}]"#.into(),
		})
		.unwrap();

		let sessions = relay.sessions().await.unwrap();
		assert_eq!(sessions.len(), 1);
		assert_eq!(sessions[0].uuid, "a-1");
		assert!(closed.load(Ordering::SeqCst));
	}

	#[tokio::test]
	async fn ignores_foreign_origin_and_times_out() {
		let (relay, tx, closed) = relay_fixture(Duration::from_millis(50));
		// Valid session array, wrong origin: must not be accepted.
		tx.send(RelayMessage {
			origin: "http://evil.example".into(),
			data: r#"[{"uuid": "a-1", "name": "scraper", "status": "Active"}]"#.into(),
		})
		.unwrap();

		let err = relay.sessions().await.unwrap_err();
		assert!(matches!(err, WeftError::Discovery(_)), "unexpected error: {err}");
		assert!(closed.load(Ordering::SeqCst));
	}

	#[tokio::test]
	async fn foreign_origin_does_not_mask_later_real_payload() {
		let (relay, tx, _) = relay_fixture(Duration::from_secs(1));
		tx.send(RelayMessage { origin: "http://evil.example".into(), data: "[]".into() }).unwrap();
		tx.send(RelayMessage { origin: "http://127.0.0.1:40080".into(), data: "[]".into() })
			.unwrap();

		let sessions = relay.sessions().await.unwrap();
		assert!(sessions.is_empty());
	}

	#[tokio::test]
	async fn malformed_payload_is_reported_not_a_crash() {
		let (relay, tx, closed) = relay_fixture(Duration::from_secs(1));
		tx.send(RelayMessage {
			origin: "http://127.0.0.1:40080".into(),
			data: "not json at all".into(),
		})
		.unwrap();

		let err = relay.sessions().await.unwrap_err();
		assert!(matches!(err, WeftError::MalformedResponse(_)), "unexpected error: {err}");
		assert!(closed.load(Ordering::SeqCst));
	}

	#[tokio::test]
	async fn closed_context_is_a_discovery_failure() {
		let (relay, tx, closed) = relay_fixture(Duration::from_secs(1));
		drop(tx);

		let err = relay.sessions().await.unwrap_err();
		assert!(matches!(err, WeftError::Discovery(_)), "unexpected error: {err}");
		assert!(closed.load(Ordering::SeqCst));
	}
}
