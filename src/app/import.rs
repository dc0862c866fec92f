//! The import command.

use std::path::Path;

use super::{helpers::EXIT_OK, types::CommandOutput};
use crate::{catalog::Catalog, config::Config, error::AppResult, storage::Storage};

/// Store `database` through the storage layer and print the stored path.
///
/// The file must open as a database before it is stored.
pub fn run_import(database: &Path, config: &Config) -> AppResult<CommandOutput> {
    drop(Catalog::open(database)?);
    let stored = Storage::from_config(&config.storage).import_file(database)?;
    Ok(CommandOutput {
        exit_code: EXIT_OK,
        stdout:    vec![stored.display().to_string()],
        stderr:    Vec::new()
    })
}
