//! Session discovery against the local automation daemon.
//!
//! The daemon's discovery endpoint has evolved: the current surface is a
//! plain `GET /sessions` fetch ([`DirectFetch`]), while older daemons only
//! delivered the list via a cross-context message from a secondary browsing
//! context ([`relay::RelayDiscovery`]). Both live behind [`Discover`] and
//! produce the same output contract, so callers pick a strategy without
//! caring which era of daemon they are talking to. Direct fetch is primary;
//! the relay is legacy support.

pub mod direct;
pub mod relay;

pub use direct::DirectFetch;
pub use relay::{RelayChannel, RelayDiscovery, RelayMessage, RelayOpener};

use async_trait::async_trait;
use weft_protocol::BrowserSession;

use crate::error::Result;

/// A discovery transport. Failure is non-fatal: the caller reports it once
/// and renders an empty session list.
#[async_trait]
pub trait Discover: Send + Sync {
	async fn sessions(&self) -> Result<Vec<BrowserSession>>;
}
