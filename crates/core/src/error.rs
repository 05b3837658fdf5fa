use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeftError>;

#[derive(Debug, Error)]
pub enum WeftError {
	/// Discovery transport or status failure. Non-fatal: the caller renders
	/// an empty session list and may retry.
	#[error("session discovery failed: {0}")]
	Discovery(String),

	/// The configured daemon base URL does not parse.
	#[error("invalid daemon url: {0}")]
	InvalidUrl(String),

	/// Discovery payload could not be parsed, on either transport.
	#[error("malformed discovery payload: {0}")]
	MalformedResponse(String),

	/// A start call failed for one session. Other sessions in the batch are
	/// unaffected and the failed uuid stays retryable.
	#[error("failed to start session {uuid}: {message}")]
	SessionStart { uuid: String, message: String },

	/// A start result named a uuid we do not know about.
	#[error("start result for unknown session {uuid}")]
	UnknownSession { uuid: String },

	/// Save/load failure from the workflow store. Blocks the save action.
	#[error("workflow persistence failed: {0}")]
	Persistence(String),

	/// Requested workflow id does not exist in the store.
	#[error("workflow not found: {0}")]
	WorkflowNotFound(String),

	/// A workflow failed validation at save time (empty name/description).
	#[error("invalid workflow: {0}")]
	InvalidWorkflow(String),

	/// The execution trigger rejected or failed the run request.
	#[error("workflow run failed: {0}")]
	Trigger(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
