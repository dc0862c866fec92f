//! Application logic for the `sqlite-erd` CLI.
//!
//! Kept apart from the entry point so every command can be tested without
//! spawning the binary.

mod convert;
mod diagram;
mod helpers;
mod import;
mod scan;
mod types;

pub use convert::{convert_fk_source, convert_format};
pub use diagram::run_diagram;
pub use helpers::{
    EXIT_FAILURE, EXIT_OK, EXIT_WARNINGS, apply_overrides, calculate_exit_code,
    create_output_options
};
pub use import::run_import;
pub use scan::run_scan;
pub use types::{CommandOutput, DiagramParams, ScanParams};

use crate::{
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};

/// Dispatch a parsed command line
pub fn run(cli: Cli, config: Config) -> AppResult<CommandOutput> {
    let verbose = cli.verbose > 0;
    match cli.command {
        Commands::Scan {
            databases,
            output_format,
            no_color
        } => run_scan(
            ScanParams {
                databases,
                output_format,
                verbose,
                no_color
            },
            &config
        ),
        Commands::Diagram {
            database,
            weak,
            output,
            foreign_keys,
            engine,
            emit_dot,
            output_format,
            no_color
        } => run_diagram(
            DiagramParams {
                database,
                weak,
                output,
                foreign_keys,
                engine,
                emit_dot,
                output_format,
                verbose,
                no_color
            },
            config
        ),
        Commands::Import { database } => run_import(&database, &config)
    }
}
