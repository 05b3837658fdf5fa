//! Session selection and start lifecycle.
//!
//! [`SessionPicker`] owns everything one selection dialog needs: the
//! discovered session list, the selection set, which uuids have been
//! started (and on which debug ports), the process-wide headless flag, and
//! the discovery phase. Nothing else mutates this state for the lifetime of
//! one dialog invocation.
//!
//! Starts are strictly sequential: the daemon's port assignment is not
//! assumed reentrant-safe per caller, and sequencing keeps every failure
//! attributable to exactly one uuid.

pub mod starter;

pub use starter::{HttpStarter, StartSession};

use std::collections::HashSet;

use tracing::{debug, warn};
use weft_protocol::{BrowserSession, SessionStartRequest, SessionStartResult};

use crate::discovery::Discover;
use crate::error::{Result, WeftError};

/// Where discovery currently stands. The phase must leave `Loading` before
/// results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPhase {
	Idle,
	Loading,
	Ready,
	Failed,
}

/// Selection and start state for one dialog invocation.
pub struct SessionPicker<S> {
	sessions: Vec<BrowserSession>,
	selected: HashSet<String>,
	started: HashSet<String>,
	headless: bool,
	phase: DiscoveryPhase,
	starter: S,
}

impl<S: StartSession> SessionPicker<S> {
	pub fn new(starter: S) -> Self {
		Self {
			sessions: Vec::new(),
			selected: HashSet::new(),
			started: HashSet::new(),
			headless: false,
			phase: DiscoveryPhase::Idle,
			starter,
		}
	}

	/// Sets the headless flag applied uniformly to every start issued from
	/// this dialog session.
	pub fn set_headless(&mut self, headless: bool) {
		self.headless = headless;
	}

	pub fn phase(&self) -> DiscoveryPhase {
		self.phase
	}

	pub fn sessions(&self) -> &[BrowserSession] {
		&self.sessions
	}

	pub fn is_selected(&self, uuid: &str) -> bool {
		self.selected.contains(uuid)
	}

	pub fn is_started(&self, uuid: &str) -> bool {
		self.started.contains(uuid)
	}

	/// Replaces the session list from a discovery call.
	///
	/// Selection and started/debug-port state survive the refresh so the
	/// user does not lose in-flight choices when the list reloads. On
	/// failure the list is emptied (empty-state rendering) and the error is
	/// returned to be reported exactly once.
	pub async fn refresh(&mut self, transport: &dyn Discover) -> Result<()> {
		self.phase = DiscoveryPhase::Loading;

		match transport.sessions().await {
			Ok(mut sessions) => {
				for session in &mut sessions {
					if session.debug_port.is_none() && self.started.contains(&session.uuid) {
						session.debug_port = self.recorded_port(&session.uuid);
					}
				}
				self.sessions = sessions;
				self.phase = DiscoveryPhase::Ready;
				debug!(target = "weft.sessions", count = self.sessions.len(), "session list refreshed");
				Ok(())
			}
			Err(err) => {
				self.sessions.clear();
				self.phase = DiscoveryPhase::Failed;
				Err(err)
			}
		}
	}

	/// Idempotent set-membership update; no other side effect.
	pub fn toggle_select(&mut self, uuid: &str, selected: bool) {
		if selected {
			self.selected.insert(uuid.to_string());
		} else {
			self.selected.remove(uuid);
		}
	}

	/// The list the user should currently see, in discovery order.
	///
	/// A session is visible when it is selected (selection commitments never
	/// disappear from view, whatever the query), or when its name matches
	/// the query case-insensitively and it has not been started yet. Started
	/// sessions drop out of the browse list so they cannot be re-selected.
	pub fn visible_sessions(&self, query: &str) -> Vec<&BrowserSession> {
		let needle = query.to_lowercase();
		self.sessions
			.iter()
			.filter(|session| {
				self.selected.contains(&session.uuid)
					|| (session.name.to_lowercase().contains(&needle)
						&& !self.started.contains(&session.uuid))
			})
			.collect()
	}

	/// Starts one session and records the daemon-assigned debug port.
	///
	/// Starting an already-started uuid returns the recorded port without a
	/// second daemon call; use [`restart_session`](Self::restart_session)
	/// for an explicit re-start. A failed start leaves the uuid's lifecycle
	/// phase unchanged so the user may retry.
	pub async fn start_session(&mut self, uuid: &str) -> Result<SessionStartResult> {
		if self.started.contains(uuid) {
			if let Some(port) = self.recorded_port(uuid) {
				debug!(target = "weft.sessions", %uuid, port, "session already started");
				return Ok(SessionStartResult { uuid: uuid.to_string(), debug_port: port });
			}
		}

		if !self.sessions.iter().any(|s| s.uuid == uuid) {
			return Err(WeftError::UnknownSession { uuid: uuid.to_string() });
		}

		let request = SessionStartRequest {
			uuid: uuid.to_string(),
			headless: self.headless,
			debug_port: starter::candidate_port(),
			disable_images: true,
			chromium_args: starter::DISABLE_IMAGES_ARG.to_string(),
			referrer_values: starter::referrer_rules(),
		};

		let result = self.starter.start(request).await?;
		self.record_started(result)
	}

	/// Explicit re-start: forgets the recorded port and starts again.
	pub async fn restart_session(&mut self, uuid: &str) -> Result<SessionStartResult> {
		self.started.remove(uuid);
		self.start_session(uuid).await
	}

	/// Starts every selected session sequentially, each awaited before the
	/// next begins. Returns all selected sessions in discovery order —
	/// started ones carry debug ports, failed ones do not — plus exactly one
	/// error per failed uuid. The caller treats a missing debug port as
	/// "not runnable".
	pub async fn confirm_selection(&mut self) -> (Vec<BrowserSession>, Vec<WeftError>) {
		let uuids: Vec<String> = self
			.sessions
			.iter()
			.filter(|s| self.selected.contains(&s.uuid))
			.map(|s| s.uuid.clone())
			.collect();

		let mut errors = Vec::new();
		for uuid in &uuids {
			if let Err(err) = self.start_session(uuid).await {
				warn!(target = "weft.sessions", %uuid, %err, "session start failed");
				errors.push(err);
			}
		}

		let confirmed = self
			.sessions
			.iter()
			.filter(|s| self.selected.contains(&s.uuid))
			.cloned()
			.collect();
		(confirmed, errors)
	}

	fn recorded_port(&self, uuid: &str) -> Option<u16> {
		self.sessions.iter().find(|s| s.uuid == uuid).and_then(|s| s.debug_port)
	}

	/// Merges a start result into the matching session record. A result for
	/// an unknown uuid is a protocol error, never silently dropped.
	fn record_started(&mut self, result: SessionStartResult) -> Result<SessionStartResult> {
		let Some(session) = self.sessions.iter_mut().find(|s| s.uuid == result.uuid) else {
			warn!(target = "weft.sessions", uuid = %result.uuid, "start result for unknown session");
			return Err(WeftError::UnknownSession { uuid: result.uuid });
		};
		session.debug_port = Some(result.debug_port);
		self.started.insert(result.uuid.clone());
		Ok(result)
	}
}
