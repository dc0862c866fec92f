//! Table listing and many-to-many detection.
//!
//! A table is classified as a many-to-many (junction) table when its stored
//! creation statement mentions `FOREIGN KEY` at least twice, compared
//! case-insensitively. Tables without a creation statement count as zero.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sqlite_erd::{config::SchemaConfig, scanner::scan_database};
//!
//! let report = scan_database(Path::new("school.db"), &SchemaConfig::default()).unwrap();
//! println!("tables: {:?}", report.tables);
//! println!("junction tables: {:?}", report.many_to_many);
//! ```

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::{
    catalog::{Catalog, TableEntry},
    config::SchemaConfig,
    error::DiagramError,
    foreign_key::count_foreign_key_mentions
};

/// Minimum `FOREIGN KEY` mentions for a junction table
pub const MANY_TO_MANY_THRESHOLD: usize = 2;

/// Tables of one database and the subset classified as many-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub database:     PathBuf,
    /// Table names in catalog order
    pub tables:       Vec<String>,
    /// Junction tables, in catalog order
    pub many_to_many: Vec<String>
}

/// Whether a creation statement marks its table as many-to-many.
pub fn is_many_to_many(sql: Option<&str>) -> bool {
    sql.map(count_foreign_key_mentions).unwrap_or(0) >= MANY_TO_MANY_THRESHOLD
}

/// Names of the junction tables among `entries`, keeping their order.
pub fn many_to_many_tables(entries: &[TableEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| is_many_to_many(entry.sql.as_deref()))
        .map(|entry| entry.name.clone())
        .collect()
}

/// Scan an already opened catalog.
pub fn scan_catalog(catalog: &Catalog, config: &SchemaConfig) -> Result<ScanReport, DiagramError> {
    let entries = catalog.tables(config.include_internal)?;
    let many_to_many = many_to_many_tables(&entries);
    debug!(
        database = %catalog.path().display(),
        tables = entries.len(),
        many_to_many = many_to_many.len(),
        "scanned catalog"
    );
    Ok(ScanReport {
        database: catalog.path().to_path_buf(),
        tables: entries.into_iter().map(|entry| entry.name).collect(),
        many_to_many
    })
}

/// Open the database at `path` and scan it.
///
/// # Errors
///
/// Returns [`DiagramError::DatabaseUnreadable`] when the file cannot be
/// opened or is not a database; no partial report is produced.
pub fn scan_database(path: &Path, config: &SchemaConfig) -> Result<ScanReport, DiagramError> {
    let catalog = Catalog::open(path)?;
    scan_catalog(&catalog, config)
}

/// Scan several independent databases in parallel.
///
/// Results are returned in the order of `paths`; one unreadable database
/// does not affect the others.
pub fn scan_databases(
    paths: &[PathBuf],
    config: &SchemaConfig
) -> Vec<Result<ScanReport, DiagramError>> {
    paths
        .par_iter()
        .map(|path| scan_database(path, config))
        .collect()
}
