//! Wire types for the local browser-session daemon.
//!
//! The daemon exposes a small loopback HTTP surface: session discovery
//! (`GET /sessions`) and session start (`POST /sessions/start`). This crate
//! defines the serde types for both exchanges plus defensive parse helpers,
//! and performs no I/O itself.

mod session;

pub use session::{
	BrowserSession, ProxyInfo, ReferrerRule, SessionStartRequest, SessionStartResult,
	parse_session_list,
};
