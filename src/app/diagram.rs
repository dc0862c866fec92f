//! The diagram command.
//!
//! Runs the scanner for the many-to-many list, builds the diagram, renders
//! it through the configured engine and formats the result page.

use super::{
    helpers::{apply_overrides, calculate_exit_code, create_output_options, ensure_parent_dir, spinner},
    types::{CommandOutput, DiagramParams}
};
use crate::{
    config::Config,
    diagram::{WeakEntitySelection, build_diagram, render_diagram},
    error::AppResult,
    output::{DiagramReport, format_diagram_report},
    scanner::scan_database,
    storage::Storage
};

/// Executes the diagram pipeline.
///
/// # Errors
///
/// Returns an error if the database is unreadable, the output location
/// cannot be prepared, or the render engine is unavailable or fails.
pub fn run_diagram(params: DiagramParams, config: Config) -> AppResult<CommandOutput> {
    let config = apply_overrides(config, params.foreign_keys, params.engine);
    let weak: WeakEntitySelection = params.weak.iter().map(String::as_str).collect();

    let scan = scan_database(&params.database, &config.schema)?;
    let diagram = build_diagram(&params.database, &weak, &config.schema)?;
    let exit_code = calculate_exit_code(&diagram);

    if params.emit_dot {
        return Ok(CommandOutput {
            exit_code,
            stdout: vec![diagram.to_dot(&config.render)],
            stderr: Vec::new()
        });
    }

    let base = match params.output {
        Some(base) => {
            ensure_parent_dir(&base)?;
            base
        }
        None => Storage::from_config(&config.storage).diagram_base(&params.database, &weak)?
    };

    let pb = spinner("Rendering diagram...");
    let rendered = render_diagram(&diagram, &base, &config.render);
    pb.finish_and_clear();
    let image = rendered?;

    let report = DiagramReport {
        database: params.database,
        image: Some(image),
        foreign_keys: config.schema.foreign_keys,
        tables: scan.tables,
        nodes: diagram.nodes.len(),
        weak_entities: weak.iter().map(str::to_string).collect(),
        many_to_many: scan.many_to_many,
        edges: diagram.edges,
        skipped: diagram.skipped
    };
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);

    Ok(CommandOutput {
        exit_code,
        stdout: vec![format_diagram_report(&report, &output_opts)],
        stderr: Vec::new()
    })
}
