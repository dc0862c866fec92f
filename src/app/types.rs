//! Application types for CLI commands.
//!
//! Parameters handed from the command line to each command, and the
//! output a command produces for `main` to print.

use std::path::PathBuf;

use crate::cli::{FkSource, Format};

/// Parameters for the scan command.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
///
/// use sqlite_erd::{app::ScanParams, cli::Format};
///
/// let params = ScanParams {
///     databases:     vec![PathBuf::from("school.db")],
///     output_format: Format::Text,
///     verbose:       false,
///     no_color:      true
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ScanParams {
    /// Databases to scan; reported in this order.
    pub databases:     Vec<PathBuf>,
    /// Output format for results.
    pub output_format: Format,
    /// Enable verbose output.
    pub verbose:       bool,
    /// Disable colored terminal output.
    pub no_color:      bool
}

/// Parameters for the diagram command.
#[derive(Debug, Clone)]
pub struct DiagramParams {
    /// Database to draw.
    pub database:      PathBuf,
    /// Tables flagged as weak entities.
    pub weak:          Vec<String>,
    /// Output path without extension; storage decides when absent.
    pub output:        Option<PathBuf>,
    /// Overrides the configured foreign-key source.
    pub foreign_keys:  Option<FkSource>,
    /// Overrides the configured render engine.
    pub engine:        Option<String>,
    /// Print DOT instead of rendering.
    pub emit_dot:      bool,
    pub output_format: Format,
    pub verbose:       bool,
    pub no_color:      bool
}

/// Output from CLI command execution.
///
/// # Example
///
/// ```
/// use sqlite_erd::app::CommandOutput;
///
/// let output = CommandOutput {
///     exit_code: 0,
///     stdout:    vec!["uploads/3f2a.db".to_string()],
///     stderr:    Vec::new()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code for the process.
    pub exit_code: i32,
    /// Lines to print to stdout.
    pub stdout:    Vec<String>,
    /// Lines to print to stderr.
    pub stderr:    Vec<String>
}
