//! Helper functions for CLI operations.
//!
//! Exit-code policy, output options, configuration overrides and the
//! progress spinner shown while the render engine runs.

use std::{fs, path::Path, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use super::convert::{convert_fk_source, convert_format};
use crate::{
    cli::{FkSource, Format},
    config::Config,
    diagram::Diagram,
    error::{AppResult, file_write_error},
    output::OutputOptions
};

/// Everything succeeded
pub const EXIT_OK: i32 = 0;
/// Finished, but some foreign-key clauses were skipped
pub const EXIT_WARNINGS: i32 = 1;
/// A hard failure (unreadable database, render engine problem)
pub const EXIT_FAILURE: i32 = 2;

/// Calculates the exit code for a built diagram.
///
/// # Example
///
/// ```
/// use sqlite_erd::{app::calculate_exit_code, diagram::Diagram};
///
/// assert_eq!(calculate_exit_code(&Diagram::default()), 0);
/// ```
pub fn calculate_exit_code(diagram: &Diagram) -> i32 {
    if diagram.skipped.is_empty() {
        EXIT_OK
    } else {
        EXIT_WARNINGS
    }
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

/// Apply command-line overrides on top of the loaded configuration
pub fn apply_overrides(
    mut config: Config,
    foreign_keys: Option<FkSource>,
    engine: Option<String>
) -> Config {
    if let Some(source) = foreign_keys {
        config.schema.foreign_keys = convert_fk_source(source);
    }
    if let Some(engine) = engine {
        config.render.engine = engine;
    }
    config
}

/// Create the directory that will hold `path`
pub fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| file_write_error(&parent.display().to_string(), e)),
        _ => Ok(())
    }
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
