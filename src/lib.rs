//! # SQLite ER Diagram Library
//!
//! Schema introspection and entity-relationship diagrams for SQLite
//! databases: list tables, detect many-to-many junction tables, and turn
//! foreign keys into a Graphviz diagram.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod diagram;
pub mod error;
pub mod foreign_key;
pub mod logging;
pub mod output;
pub mod render;
pub mod scanner;
pub mod schema;
pub mod storage;
