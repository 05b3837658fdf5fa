//! State-path and identity resolution for the CLI.

use std::path::PathBuf;

/// Workflow store directory: `<config dir>/weft/workflows`.
pub fn default_store_dir() -> PathBuf {
	dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("weft/workflows")
}

/// Acting user identity stamped onto saved workflows.
pub fn owner_id() -> String {
	std::env::var("USER")
		.or_else(|_| std::env::var("USERNAME"))
		.unwrap_or_else(|_| "local".into())
}
