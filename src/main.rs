//! # sqlite-erd
//!
//! Entity-relationship diagrams for SQLite databases.
//!
//! `sqlite-erd` reads a database's catalog, lists its tables, flags the
//! junction tables that implement many-to-many relationships, and draws an
//! ER diagram through Graphviz. Tables chosen as weak entities are drawn
//! with a double border.
//!
//! # Quick Start
//!
//! ```bash
//! # List tables and junction tables
//! sqlite-erd scan school.db
//!
//! # Draw a diagram, marking Enrollment as a weak entity
//! sqlite-erd diagram school.db --weak Enrollment -o diagrams/school
//!
//! # Inspect the Graphviz input without rendering
//! sqlite-erd diagram school.db --emit-dot | dot -Tsvg > school.svg
//!
//! # Keep a content-addressed copy of a database
//! sqlite-erd import ~/Downloads/school.db
//! ```
//!
//! # Foreign Keys
//!
//! By default relationships come from SQLite itself
//! (`pragma_foreign_key_list`). `--foreign-keys ddl` reads them from the
//! stored `CREATE TABLE` text instead; lines mentioning `FOREIGN KEY` that do
//! not parse are skipped and listed in the report.
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`SQLITE_ERD_ENGINE`, `SQLITE_ERD_OUTPUT_DIR`, ...)
//! 3. `.sqlite-erd.toml` in current directory
//! 4. `~/.config/sqlite-erd/config.toml`
//!
//! ```toml
//! [storage]
//! output_dir = "static"
//!
//! [render]
//! engine = "/usr/local/bin/dot"
//!
//! [schema]
//! foreign_keys = "ddl"
//! ```
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Diagram generated, but some foreign-key clauses were skipped
//! - `2` - Unreadable database or render engine failure
//!
//! # Output Formats
//!
//! - `text` - Human-readable colored output (default)
//! - `json` - Structured JSON for programmatic processing
//! - `yaml` - YAML output
//! - `html` - Selection form (scan) or result page (diagram)

use std::process;

use clap::Parser;
use sqlite_erd::{
    app::{EXIT_FAILURE, run},
    cli::Cli,
    config::Config,
    logging
};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match Config::load().and_then(|config| run(cli, config)) {
        Ok(output) => {
            for line in &output.stdout {
                println!("{}", line);
            }
            for line in &output.stderr {
                eprintln!("{}", line);
            }
            process::exit(output.exit_code);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}
