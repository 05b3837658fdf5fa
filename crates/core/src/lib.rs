//! Workflow graph editing and browser-session orchestration.
//!
//! A workflow is a node/edge graph describing browser-automation steps. This
//! crate owns the pieces with real invariants:
//!
//! * [`graph`] — the in-memory graph, the change-event editor that mutates
//!   it, and the pure codec that round-trips it to the persisted form while
//!   enforcing structural integrity (no dangling edges survive a load).
//! * [`discovery`] — strategy-selectable transports for asking the local
//!   automation daemon which browser sessions exist.
//! * [`sessions`] — selection and start lifecycle for discovered sessions:
//!   who is selected, who has been started on which debug port, and what the
//!   user should currently see.
//! * [`store`] — durable workflow records (`load`/`save`/`list`/`delete`).
//! * [`trigger`] — the opaque seam that hands a saved workflow plus started
//!   sessions to the execution engine.
//!
//! Everything runs on one logical thread; the only suspension points are
//! daemon calls and the relay message wait. Correctness rests on strict
//! ordering (sequential session starts) and scoped resource release (relay
//! channels), not on locking.

pub mod discovery;
pub mod error;
pub mod graph;
pub mod sessions;
pub mod store;
pub mod trigger;

pub use error::{Result, WeftError};

/// Loopback base URL of the automation daemon.
pub const DAEMON_BASE_URL: &str = "http://127.0.0.1:40080";
