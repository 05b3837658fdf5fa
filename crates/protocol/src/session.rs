//! Session discovery and start types.
//!
//! Discovery payloads have grown fields over daemon iterations (proxy info
//! appears only in some discovery modes), so every mode-specific attribute is
//! an `Option`: absent means *unknown*, never false.

use serde::{Deserialize, Serialize};

/// A daemon-managed browser instance as reported by discovery.
///
/// `uuid` is the stable identity used for every lifecycle operation.
/// `debug_port` is populated only after a successful start call; `None`
/// means the session has not been started by this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserSession {
	pub uuid: String,
	pub name: String,
	pub status: String,
	/// Egress proxy bound to the session, when the discovery mode reports one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub proxy: Option<ProxyInfo>,
	/// Remote-control port assigned by the daemon after a start call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub debug_port: Option<u16>,
}

/// Identity metadata for the proxy bound to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyInfo {
	pub protocol: String,
}

/// Body for `POST /sessions/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartRequest {
	pub uuid: String,
	pub headless: bool,
	/// Candidate port; the daemon may assign a different one.
	pub debug_port: u16,
	pub disable_images: bool,
	pub chromium_args: String,
	pub referrer_values: Vec<ReferrerRule>,
}

/// A referrer-rewrite rule applied by the daemon's browser proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferrerRule {
	/// Match URL.
	pub url: String,
	/// Replacement URL.
	pub replace: String,
}

/// Success body for `POST /sessions/start`.
///
/// `debug_port` is authoritative and may differ from the candidate sent in
/// the request. The `uuid` locates the session record to update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStartResult {
	pub uuid: String,
	pub debug_port: u16,
}

/// Parses a discovery payload into a session list.
///
/// Both discovery transports (direct fetch and the legacy relay) deliver the
/// same JSON array shape; both go through here so malformed payloads fail the
/// same way on either path.
pub fn parse_session_list(body: &str) -> Result<Vec<BrowserSession>, serde_json::Error> {
	serde_json::from_str(body)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_sessions_with_and_without_proxy() {
		let body = r#"[
			{"uuid": "a-1", "name": "scraper", "status": "Active", "proxy": {"protocol": "socks5"}},
			{"uuid": "b-2", "name": "checkout", "status": "Idle"}
		]"#;

		let sessions = parse_session_list(body).unwrap();
		assert_eq!(sessions.len(), 2);
		assert_eq!(sessions[0].proxy.as_ref().unwrap().protocol, "socks5");
		assert!(sessions[1].proxy.is_none());
		assert!(sessions[0].debug_port.is_none());
	}

	#[test]
	fn empty_array_is_an_empty_list() {
		assert_eq!(parse_session_list("[]").unwrap(), vec![]);
	}

	#[test]
	fn malformed_body_is_an_error() {
		assert!(parse_session_list("{\"not\": \"an array\"}").is_err());
		assert!(parse_session_list("<!doctype html>").is_err());
	}

	#[test]
	fn start_request_uses_wire_field_names() {
		let request = SessionStartRequest {
			uuid: "a-1".into(),
			headless: true,
			debug_port: 4321,
			disable_images: true,
			chromium_args: "--blink-settings=imagesEnabled=false".into(),
			referrer_values: vec![ReferrerRule {
				url: "https://www.google.com".into(),
				replace: "https://www.google.com/".into(),
			}],
		};

		let value = serde_json::to_value(&request).unwrap();
		assert_eq!(value["debug_port"], 4321);
		assert_eq!(value["referrer_values"][0]["replace"], "https://www.google.com/");
	}
}
