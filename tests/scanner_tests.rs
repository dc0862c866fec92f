mod common;

use std::path::PathBuf;

use common::{create_db, school_db};
use sqlite_erd::{
    config::SchemaConfig,
    error::DiagramError,
    scanner::{scan_database, scan_databases}
};

#[test]
fn test_school_example() {
    let dir = tempfile::tempdir().unwrap();
    let report = scan_database(&school_db(dir.path()), &SchemaConfig::default()).unwrap();
    assert_eq!(report.tables, ["Student", "Course", "Enrollment"]);
    assert_eq!(report.many_to_many, ["Enrollment"]);
}

#[test]
fn test_no_foreign_keys_no_junction_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(
        dir.path(),
        "flat.db",
        "CREATE TABLE a (id INTEGER); CREATE TABLE b (id INTEGER); CREATE TABLE c (id INTEGER);"
    );
    let report = scan_database(&path, &SchemaConfig::default()).unwrap();
    assert_eq!(report.tables.len(), 3);
    assert!(report.many_to_many.is_empty());
}

#[test]
fn test_mixed_case_mentions_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(
        dir.path(),
        "case.db",
        "CREATE TABLE x (id INTEGER PRIMARY KEY);
         CREATE TABLE y (id INTEGER PRIMARY KEY);
         CREATE TABLE link (
             x_id INTEGER,
             y_id INTEGER,
             foreign key (x_id) references x(id),
             Foreign Key (y_id) REFERENCES y(id)
         );
         CREATE TABLE single (
             x_id INTEGER,
             FOREIGN KEY (x_id) REFERENCES x(id)
         );"
    );
    let report = scan_database(&path, &SchemaConfig::default()).unwrap();
    assert_eq!(report.many_to_many, ["link"]);
}

#[test]
fn test_inline_references_are_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(
        dir.path(),
        "inline.db",
        "CREATE TABLE x (id INTEGER PRIMARY KEY);
         CREATE TABLE link (a INTEGER REFERENCES x(id), b INTEGER REFERENCES x(id));"
    );
    let report = scan_database(&path, &SchemaConfig::default()).unwrap();
    assert!(report.many_to_many.is_empty());
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = school_db(dir.path());
    let config = SchemaConfig::default();
    let first = scan_database(&path, &config).unwrap();
    let second = scan_database(&path, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_scan_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    std::fs::write(&path, b"").unwrap();
    let report = scan_database(&path, &SchemaConfig::default()).unwrap();
    assert!(report.tables.is_empty());
}

#[test]
fn test_scan_missing_database() {
    let result = scan_database(
        &PathBuf::from("/nonexistent/dir/school.db"),
        &SchemaConfig::default()
    );
    assert!(matches!(result, Err(DiagramError::DatabaseUnreadable { .. })));
}

#[test]
fn test_scan_excluding_internal_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_db(
        dir.path(),
        "auto.db",
        "CREATE TABLE item (id INTEGER PRIMARY KEY AUTOINCREMENT);"
    );
    let config = SchemaConfig {
        include_internal: false,
        ..Default::default()
    };
    let report = scan_database(&path, &config).unwrap();
    assert_eq!(report.tables, ["item"]);
}

#[test]
fn test_scan_many_keeps_order_and_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let school = school_db(dir.path());
    let flat = create_db(dir.path(), "flat.db", "CREATE TABLE only (id INTEGER);");
    let missing = dir.path().join("missing.db");
    let paths = vec![flat.clone(), missing, school.clone()];

    let results = scan_databases(&paths, &SchemaConfig::default());
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().database, flat);
    assert!(results[1].is_err());
    let school_report = results[2].as_ref().unwrap();
    assert_eq!(school_report.database, school);
    assert_eq!(school_report.many_to_many, ["Enrollment"]);
}
