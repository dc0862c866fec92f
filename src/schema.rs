//! Database schema representation.
//!
//! A [`Schema`] is a snapshot of one database's tables and columns, read
//! afresh from the catalog for every operation. Tables keep catalog order.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sqlite_erd::{catalog::Catalog, schema::Schema};
//!
//! let catalog = Catalog::open(Path::new("school.db")).unwrap();
//! let schema = Schema::load(&catalog, true).unwrap();
//!
//! for table in &schema.tables {
//!     println!("{} ({} columns)", table.name, table.columns.len());
//! }
//! ```

use serde::Serialize;

use crate::{catalog::Catalog, error::DiagramError};

/// A table with its creation statement and columns.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    /// Table name, unique within the database
    pub name:    String,
    /// Raw creation statement as stored by SQLite
    pub sql:     Option<String>,
    /// Columns in declaration order
    pub columns: Vec<ColumnInfo>
}

/// Column name and declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name:      String,
    /// Free-form declared type, empty when none was given
    pub data_type: String
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Schema {
    pub tables: Vec<TableInfo>
}

impl Schema {
    /// Read every table and its columns from the catalog
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::DatabaseUnreadable`] if any catalog query fails
    pub fn load(catalog: &Catalog, include_internal: bool) -> Result<Self, DiagramError> {
        let mut tables = Vec::new();
        for entry in catalog.tables(include_internal)? {
            let columns = catalog.columns(&entry.name)?;
            tables.push(TableInfo {
                name: entry.name,
                sql: entry.sql,
                columns
            });
        }
        Ok(Self { tables })
    }

    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }
}
