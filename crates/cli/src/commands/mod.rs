pub mod run;
pub mod sessions;
pub mod workflow;

use anyhow::Result;
use weft::store::JsonFileStore;

use crate::cli::{Cli, Command};
use crate::paths;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let store_dir = cli.store_dir.clone().unwrap_or_else(paths::default_store_dir);
	let store = JsonFileStore::new(store_dir, paths::owner_id());

	match cli.command {
		Command::Workflow(cmd) => workflow::dispatch(cmd, &store),
		Command::Sessions(cmd) => sessions::dispatch(cmd, &cli.base_url).await,
		Command::Run(args) => run::run(args, &cli.base_url, &store).await,
	}
}
