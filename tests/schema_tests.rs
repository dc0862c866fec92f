// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

mod common;

use common::{create_db, school_db};
use sqlite_erd::{
    catalog::Catalog,
    error::DiagramError,
    foreign_key::ForeignKeyReference,
    schema::Schema
};

fn load(path: &std::path::Path) -> Schema {
    let catalog = Catalog::open(path).unwrap();
    Schema::load(&catalog, true).unwrap()
}

#[test]
fn test_load_tables_in_catalog_order() {
    let dir = tempfile::tempdir().unwrap();
    let schema = load(&school_db(dir.path()));
    assert_eq!(schema.table_names(), ["Student", "Course", "Enrollment"]);
}

#[test]
fn test_columns_in_declaration_order() {
    let dir = tempfile::tempdir().unwrap();
    let schema = load(&school_db(dir.path()));
    let student = schema.table("Student").unwrap();
    assert_eq!(student.columns.len(), 2);
    assert_eq!(student.columns[0].name, "id");
    assert_eq!(student.columns[0].data_type, "INTEGER");
    assert_eq!(student.columns[1].name, "name");
    assert_eq!(student.columns[1].data_type, "TEXT");
}

#[test]
fn test_untyped_column_has_empty_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(dir.path(), "loose.db", "CREATE TABLE loose (a, b VARCHAR(20));");
    let schema = load(&path);
    let loose = schema.table("loose").unwrap();
    assert_eq!(loose.columns[0].data_type, "");
    assert_eq!(loose.columns[1].data_type, "VARCHAR(20)");
}

#[test]
fn test_raw_sql_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let schema = load(&school_db(dir.path()));
    let sql = schema.table("Enrollment").unwrap().sql.as_deref().unwrap();
    assert!(sql.starts_with("CREATE TABLE Enrollment"));
    assert!(sql.contains("FOREIGN KEY(course_id) REFERENCES Course(id)"));
}

#[test]
fn test_internal_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(
        dir.path(),
        "auto.db",
        "CREATE TABLE item (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);"
    );
    let catalog = Catalog::open(&path).unwrap();
    let with_internal = Schema::load(&catalog, true).unwrap();
    assert_eq!(with_internal.table_names(), ["item", "sqlite_sequence"]);
    let without_internal = Schema::load(&catalog, false).unwrap();
    assert_eq!(without_internal.table_names(), ["item"]);
}

#[test]
fn test_views_and_indexes_are_not_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(
        dir.path(),
        "view.db",
        "CREATE TABLE t (id INTEGER, name TEXT);
         CREATE INDEX idx_name ON t(name);
         CREATE VIEW v AS SELECT name FROM t;"
    );
    assert_eq!(load(&path).table_names(), ["t"]);
}

#[test]
fn test_catalog_foreign_keys() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(&school_db(dir.path())).unwrap();
    let mut keys: Vec<ForeignKeyReference> = catalog.foreign_keys("Enrollment").unwrap();
    keys.sort_by(|a, b| a.target_table.cmp(&b.target_table));
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].target_table, "Course");
    assert_eq!(keys[0].label(), "course_id");
    assert_eq!(keys[0].target_columns.as_slice(), ["id"]);
    assert_eq!(keys[1].target_table, "Student");
    assert_eq!(keys[1].label(), "student_id");
    assert!(catalog.foreign_keys("Student").unwrap().is_empty());
}

#[test]
fn test_catalog_multi_column_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(
        dir.path(),
        "pair.db",
        "CREATE TABLE pair (x INTEGER, y INTEGER, PRIMARY KEY (x, y));
         CREATE TABLE child (
             a INTEGER,
             b INTEGER,
             FOREIGN KEY (a, b) REFERENCES pair (x, y)
         );"
    );
    let catalog = Catalog::open(&path).unwrap();
    let keys = catalog.foreign_keys("child").unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].label(), "a, b");
    assert_eq!(keys[0].target_columns.as_slice(), ["x", "y"]);
}

#[test]
fn test_catalog_implicit_primary_key_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(
        dir.path(),
        "implicit.db",
        "CREATE TABLE parent (id INTEGER PRIMARY KEY);
         CREATE TABLE child (parent_id INTEGER REFERENCES parent);"
    );
    let catalog = Catalog::open(&path).unwrap();
    let keys = catalog.foreign_keys("child").unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].target_table, "parent");
    assert!(keys[0].target_columns.is_empty());
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.db");
    let result = Catalog::open(&missing);
    assert!(matches!(result, Err(DiagramError::DatabaseUnreadable { .. })));
    assert!(!missing.exists());
}

#[test]
fn test_open_not_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    std::fs::write(&path, "not a database ".repeat(100)).unwrap();
    let result = Catalog::open(&path);
    assert!(matches!(result, Err(DiagramError::DatabaseUnreadable { .. })));
}

#[test]
fn test_schema_debug() {
    let dir = tempfile::tempdir().unwrap();
    let schema = load(&school_db(dir.path()));
    let debug = format!("{:?}", schema);
    assert!(debug.contains("Schema"));
    assert!(debug.contains("Enrollment"));
}
