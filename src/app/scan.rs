//! The scan command.

use super::{
    helpers::{EXIT_FAILURE, EXIT_OK, create_output_options},
    types::{CommandOutput, ScanParams}
};
use crate::{config::Config, error::AppResult, output::format_scan_reports, scanner::scan_databases};

/// Scan every database in `params`.
///
/// Unreadable databases are reported on stderr and set the exit code to
/// [`EXIT_FAILURE`]; the remaining databases are still reported.
pub fn run_scan(params: ScanParams, config: &Config) -> AppResult<CommandOutput> {
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);
    let mut reports = Vec::new();
    let mut stderr = Vec::new();
    for result in scan_databases(&params.databases, &config.schema) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => stderr.push(format!("Error: {}", e))
        }
    }

    let stdout = if reports.is_empty() {
        Vec::new()
    } else {
        vec![format_scan_reports(&reports, &output_opts)]
    };
    Ok(CommandOutput {
        exit_code: if stderr.is_empty() { EXIT_OK } else { EXIT_FAILURE },
        stdout,
        stderr
    })
}
