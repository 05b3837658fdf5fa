//! Durable workflow records.
//!
//! The storage layer is record-oriented and does not validate the graph
//! columns: `nodes`/`edges` are opaque structured values produced by the
//! codec. Integrity is re-established on load by the codec, not here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, WeftError};

/// A workflow as stored: metadata plus the persisted graph columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedWorkflow {
	/// Absent for a new workflow; assigned on first insert, immutable after.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub name: String,
	pub description: String,
	/// Codec-output node array. Stored verbatim, unvalidated.
	#[serde(default)]
	pub nodes: Value,
	/// Codec-output edge array. Stored verbatim, unvalidated.
	#[serde(default)]
	pub edges: Value,
	/// Acting user identity, set by the store at save time.
	#[serde(default)]
	pub owner_id: String,
	/// Unix epoch seconds.
	#[serde(default)]
	pub created_at: u64,
	#[serde(default)]
	pub updated_at: u64,
}

impl PersistedWorkflow {
	/// A new, unsaved workflow with an empty graph.
	pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			description: description.into(),
			nodes: Value::Array(vec![]),
			edges: Value::Array(vec![]),
			owner_id: String::new(),
			created_at: 0,
			updated_at: 0,
		}
	}
}

/// Record store for workflows, keyed by id and scoped to one owner.
pub trait WorkflowStore {
	fn load(&self, id: &str) -> Result<PersistedWorkflow>;
	/// Validates, stamps ownership and timestamps, and returns the id
	/// (assigning one on first insert).
	fn save(&self, workflow: PersistedWorkflow) -> Result<String>;
	/// All workflows for the owner, newest first.
	fn list(&self) -> Result<Vec<PersistedWorkflow>>;
	fn delete(&self, id: &str) -> Result<()>;
}

/// One pretty-printed JSON document per workflow under a state directory.
pub struct JsonFileStore {
	dir: PathBuf,
	owner: String,
}

impl JsonFileStore {
	pub fn new(dir: impl Into<PathBuf>, owner: impl Into<String>) -> Self {
		Self { dir: dir.into(), owner: owner.into() }
	}

	fn path_for(&self, id: &str) -> PathBuf {
		self.dir.join(format!("{id}.json"))
	}
}

impl WorkflowStore for JsonFileStore {
	fn load(&self, id: &str) -> Result<PersistedWorkflow> {
		let path = self.path_for(id);
		let content = match fs::read_to_string(&path) {
			Ok(content) => content,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				return Err(WeftError::WorkflowNotFound(id.to_string()));
			}
			Err(err) => return Err(WeftError::Persistence(err.to_string())),
		};

		serde_json::from_str(&content)
			.map_err(|err| WeftError::Persistence(format!("corrupt workflow record {id}: {err}")))
	}

	fn save(&self, mut workflow: PersistedWorkflow) -> Result<String> {
		if workflow.name.trim().is_empty() {
			return Err(WeftError::InvalidWorkflow("name must not be empty".into()));
		}
		if workflow.description.trim().is_empty() {
			return Err(WeftError::InvalidWorkflow("description must not be empty".into()));
		}

		let now = now_ts();
		workflow.owner_id = self.owner.clone();
		workflow.updated_at = now;

		let id = match workflow.id.clone() {
			Some(id) => {
				// Updates require the record to already exist; ids are
				// store-assigned, never caller-invented.
				let existing = self.load(&id)?;
				workflow.created_at = existing.created_at;
				id
			}
			None => {
				let id = Uuid::new_v4().to_string();
				workflow.id = Some(id.clone());
				workflow.created_at = now;
				id
			}
		};

		save_json(&self.path_for(&id), &workflow)
			.map_err(|err| WeftError::Persistence(err.to_string()))?;
		debug!(target = "weft.store", %id, "workflow saved");
		Ok(id)
	}

	fn list(&self) -> Result<Vec<PersistedWorkflow>> {
		let entries = match fs::read_dir(&self.dir) {
			Ok(entries) => entries,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(err) => return Err(WeftError::Persistence(err.to_string())),
		};

		let mut workflows: Vec<PersistedWorkflow> = entries
			.filter_map(|entry| entry.ok())
			.filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
			.filter_map(|entry| {
				fs::read_to_string(entry.path())
					.ok()
					.and_then(|content| serde_json::from_str::<PersistedWorkflow>(&content).ok())
			})
			.filter(|workflow| workflow.owner_id == self.owner)
			.collect();

		workflows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
		Ok(workflows)
	}

	fn delete(&self, id: &str) -> Result<()> {
		match fs::remove_file(self.path_for(id)) {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				Err(WeftError::WorkflowNotFound(id.to_string()))
			}
			Err(err) => Err(WeftError::Persistence(err.to_string())),
		}
	}
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(path, serde_json::to_string_pretty(data)?)?;
	Ok(())
}

fn now_ts() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}

#[cfg(test)]
mod tests {
	use tempfile::tempdir;

	use super::*;
	use crate::graph::codec;

	fn store(dir: &Path) -> JsonFileStore {
		JsonFileStore::new(dir, "user-1")
	}

	#[test]
	fn save_assigns_id_and_stamps_owner() {
		let tmp = tempdir().unwrap();
		let id = store(tmp.path()).save(PersistedWorkflow::new("login flow", "logs in")).unwrap();

		let loaded = store(tmp.path()).load(&id).unwrap();
		assert_eq!(loaded.id.as_deref(), Some(id.as_str()));
		assert_eq!(loaded.owner_id, "user-1");
		assert!(loaded.created_at > 0);
	}

	#[test]
	fn empty_graph_round_trips_as_arrays_not_null() {
		let tmp = tempdir().unwrap();
		let id = store(tmp.path()).save(PersistedWorkflow::new("empty", "no steps yet")).unwrap();

		let loaded = store(tmp.path()).load(&id).unwrap();
		assert_eq!(loaded.nodes, serde_json::json!([]));
		assert_eq!(loaded.edges, serde_json::json!([]));

		let graph = codec::deserialize(Some(&loaded.nodes), Some(&loaded.edges));
		assert!(graph.nodes.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn update_keeps_id_and_created_at() {
		let tmp = tempdir().unwrap();
		let s = store(tmp.path());
		let id = s.save(PersistedWorkflow::new("flow", "v1")).unwrap();
		let created_at = s.load(&id).unwrap().created_at;

		let mut updated = s.load(&id).unwrap();
		updated.description = "v2".into();
		let id2 = s.save(updated).unwrap();

		assert_eq!(id2, id);
		let loaded = s.load(&id).unwrap();
		assert_eq!(loaded.description, "v2");
		assert_eq!(loaded.created_at, created_at);
	}

	#[test]
	fn save_rejects_blank_name_and_description() {
		let tmp = tempdir().unwrap();
		let s = store(tmp.path());
		assert!(matches!(
			s.save(PersistedWorkflow::new("  ", "desc")),
			Err(WeftError::InvalidWorkflow(_))
		));
		assert!(matches!(
			s.save(PersistedWorkflow::new("name", "")),
			Err(WeftError::InvalidWorkflow(_))
		));
	}

	#[test]
	fn owner_id_is_not_caller_controlled() {
		let tmp = tempdir().unwrap();
		let mut workflow = PersistedWorkflow::new("flow", "desc");
		workflow.owner_id = "someone-else".into();

		let id = store(tmp.path()).save(workflow).unwrap();
		assert_eq!(store(tmp.path()).load(&id).unwrap().owner_id, "user-1");
	}

	#[test]
	fn list_is_owner_scoped() {
		let tmp = tempdir().unwrap();
		store(tmp.path()).save(PersistedWorkflow::new("mine", "desc")).unwrap();
		JsonFileStore::new(tmp.path(), "user-2")
			.save(PersistedWorkflow::new("theirs", "desc"))
			.unwrap();

		let mine = store(tmp.path()).list().unwrap();
		assert_eq!(mine.len(), 1);
		assert_eq!(mine[0].name, "mine");
	}

	#[test]
	fn load_and_delete_of_unknown_id() {
		let tmp = tempdir().unwrap();
		let s = store(tmp.path());
		assert!(matches!(s.load("ghost"), Err(WeftError::WorkflowNotFound(_))));
		assert!(matches!(s.delete("ghost"), Err(WeftError::WorkflowNotFound(_))));
	}

	#[test]
	fn saving_with_an_unknown_id_fails() {
		let tmp = tempdir().unwrap();
		let mut workflow = PersistedWorkflow::new("flow", "desc");
		workflow.id = Some("invented".into());
		assert!(matches!(
			store(tmp.path()).save(workflow),
			Err(WeftError::WorkflowNotFound(_))
		));
	}
}
