//! Read-only access to a SQLite database's catalog.
//!
//! A [`Catalog`] owns one connection for the duration of a single analysis.
//! The connection is opened read-only, so a missing path is reported instead
//! of silently creating an empty database, and it is closed when the
//! `Catalog` is dropped on every exit path.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use rusqlite::{Connection, OpenFlags};
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    error::DiagramError,
    foreign_key::ForeignKeyReference,
    schema::ColumnInfo
};

/// One row of `sqlite_master` with `type = 'table'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub name: String,
    /// Stored creation statement; `None` for tables without one
    pub sql:  Option<String>
}

impl TableEntry {
    /// Tables SQLite creates for its own bookkeeping (`sqlite_sequence`, ...)
    pub fn is_internal(&self) -> bool {
        self.name.starts_with("sqlite_")
    }
}

/// Open connection to a database file, used read-only.
pub struct Catalog {
    conn: Connection,
    path: PathBuf
}

impl Catalog {
    /// Open `path` and verify that it is a readable SQLite database.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::DatabaseUnreadable`] when the file does not
    /// exist, cannot be opened, or is not a database.
    pub fn open(path: &Path) -> Result<Self, DiagramError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| DiagramError::database_unreadable(path.display().to_string(), e))?;
        let catalog = Self {
            conn,
            path: path.to_path_buf()
        };

        // Opening is lazy; touching the schema forces the header check.
        let count: i64 = catalog
            .conn
            .query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get(0))
            .map_err(|e| catalog.unreadable(e))?;
        debug!(path = %path.display(), objects = count, "opened catalog");
        Ok(catalog)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tables in catalog order.
    pub fn tables(&self, include_internal: bool) -> Result<Vec<TableEntry>, DiagramError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, sql FROM sqlite_master WHERE type = 'table' ORDER BY rowid")
            .map_err(|e| self.unreadable(e))?;
        let entries = stmt
            .query_map([], |row| {
                Ok(TableEntry {
                    name: row.get(0)?,
                    sql:  row.get(1)?
                })
            })
            .map_err(|e| self.unreadable(e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.unreadable(e))?;

        Ok(entries
            .into_iter()
            .filter(|entry| include_internal || !entry.is_internal())
            .collect())
    }

    /// Columns of `table` in declaration order.
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DiagramError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(|e| self.unreadable(e))?;
        let columns = stmt
            .query_map([table], |row| {
                Ok(ColumnInfo {
                    name:      row.get(0)?,
                    data_type: row.get::<_, Option<String>>(1)?.unwrap_or_default()
                })
            })
            .map_err(|e| self.unreadable(e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.unreadable(e))?;
        debug!(table, columns = columns.len(), "read table info");
        Ok(columns)
    }

    /// Foreign keys declared by `table`, as reported by SQLite itself.
    ///
    /// Multi-column keys are folded into one reference.
    pub fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyReference>, DiagramError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1) \
                 ORDER BY id, seq"
            )
            .map_err(|e| self.unreadable(e))?;
        let rows = stmt
            .query_map([table], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?
                ))
            })
            .map_err(|e| self.unreadable(e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.unreadable(e))?;

        let mut references: Vec<(i64, ForeignKeyReference)> = Vec::new();
        for (id, target, from, to) in rows {
            match references.last_mut() {
                Some((last_id, reference)) if *last_id == id => {
                    reference.source_columns.push(CompactString::from(from));
                    if let Some(to) = to {
                        reference.target_columns.push(CompactString::from(to));
                    }
                }
                _ => {
                    let mut target_columns = SmallVec::new();
                    if let Some(to) = to {
                        target_columns.push(CompactString::from(to));
                    }
                    let mut source_columns = SmallVec::new();
                    source_columns.push(CompactString::from(from));
                    references.push((
                        id,
                        ForeignKeyReference {
                            source_table: table.to_string(),
                            source_columns,
                            target_table: target,
                            target_columns
                        }
                    ));
                }
            }
        }
        debug!(table, foreign_keys = references.len(), "read foreign key list");
        Ok(references.into_iter().map(|(_, reference)| reference).collect())
    }

    fn unreadable(&self, source: rusqlite::Error) -> DiagramError {
        DiagramError::database_unreadable(self.path.display().to_string(), source)
    }
}
