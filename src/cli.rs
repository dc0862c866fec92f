use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// SQLite ER diagram generator - list tables, detect junction tables, draw
/// entity-relationship diagrams
#[derive(Parser, Debug)]
#[command(name = "sqlite-erd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tables and detect many-to-many tables
    Scan {
        /// SQLite database files
        #[arg(required = true)]
        databases: Vec<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Generate an ER diagram image
    Diagram {
        /// SQLite database file
        database: PathBuf,

        /// Tables to draw as weak entities (repeat or comma separate)
        #[arg(short, long = "weak", value_delimiter = ',')]
        weak: Vec<String>,

        /// Output path without extension (default: storage output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Where foreign keys are read from
        #[arg(long, value_enum)]
        foreign_keys: Option<FkSource>,

        /// Graph-rendering engine binary
        #[arg(long, env = "SQLITE_ERD_ENGINE")]
        engine: Option<String>,

        /// Print the DOT description instead of rendering it
        #[arg(long)]
        emit_dot: bool,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Store a database in the upload directory and print its path
    Import {
        /// SQLite database file
        database: PathBuf
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml,
    Html
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FkSource {
    Catalog,
    Ddl
}
