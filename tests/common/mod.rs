#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::Connection;

/// Student / Course / Enrollment, with Enrollment as the junction table.
pub const SCHOOL: &str = "
CREATE TABLE Student (id INTEGER PRIMARY KEY, name TEXT);
CREATE TABLE Course (id INTEGER PRIMARY KEY, title TEXT);
CREATE TABLE Enrollment (
    student_id INTEGER,
    course_id INTEGER,
    FOREIGN KEY(student_id) REFERENCES Student(id),
    FOREIGN KEY(course_id) REFERENCES Course(id)
);
";

/// Create a database file named `name` in `dir` from a DDL batch.
pub fn create_db(dir: &Path, name: &str, ddl: &str) -> PathBuf {
    let path = dir.join(name);
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(ddl).unwrap();
    path
}

pub fn school_db(dir: &Path) -> PathBuf {
    create_db(dir, "school.db", SCHOOL)
}
