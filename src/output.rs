use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::{
    diagram::{Edge, escape_html},
    foreign_key::{ForeignKeySource, SkippedClause},
    scanner::ScanReport
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
    Html
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Everything the result page shows about one generated diagram
#[derive(Debug, Clone, Serialize)]
pub struct DiagramReport {
    pub database:      PathBuf,
    /// Rendered image, absent when only the DOT source was produced
    pub image:         Option<PathBuf>,
    pub foreign_keys:  ForeignKeySource,
    pub tables:        Vec<String>,
    /// Nodes drawn, one per table
    pub nodes:         usize,
    pub weak_entities: Vec<String>,
    pub many_to_many:  Vec<String>,
    pub edges:         Vec<Edge>,
    pub skipped:       Vec<SkippedClause>
}

/// Format scan reports based on output options
pub fn format_scan_reports(reports: &[ScanReport], opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(reports).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(reports).unwrap_or_default(),
        OutputFormat::Html => format_selection_page(reports),
        OutputFormat::Text => reports
            .iter()
            .map(|r| format_scan_text(r, opts))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Format a diagram report based on output options
pub fn format_diagram_report(report: &DiagramReport, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(report).unwrap_or_default(),
        OutputFormat::Html => format_result_page(report),
        OutputFormat::Text => format_diagram_text(report, opts)
    }
}

fn heading(text: &str, opts: &OutputOptions) -> String {
    if opts.colored {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn format_scan_text(report: &ScanReport, opts: &OutputOptions) -> String {
    let mut output = heading(&format!("Database: {}", report.database.display()), opts);
    output.push('\n');
    output.push_str(&format!("Tables ({}):\n", report.tables.len()));
    for table in &report.tables {
        let is_junction = report.many_to_many.contains(table);
        let marker = match (is_junction, opts.colored) {
            (true, true) => format!(" {}", "[many-to-many]".cyan()),
            (true, false) => String::from(" [many-to-many]"),
            (false, _) => String::new()
        };
        output.push_str(&format!("  - {}{}\n", table, marker));
    }
    output.push_str(&format!(
        "Many-to-many tables: {}\n",
        list_or(&report.many_to_many, "None detected")
    ));
    output
}

fn format_diagram_text(report: &DiagramReport, opts: &OutputOptions) -> String {
    let mut output = heading("=== ER Diagram Generated ===", opts);
    output.push_str("\n\n");
    output.push_str(&format!("Database: {}\n", report.database.display()));
    match &report.image {
        Some(image) => output.push_str(&format!("Diagram: {}\n", image.display())),
        None => output.push_str("Diagram: not rendered\n")
    }
    output.push_str(&format!(
        "Nodes: {}, relationships: {}\n",
        report.nodes,
        report.edges.len()
    ));
    output.push_str(&format!(
        "Weak entities (user selected): {}\n",
        list_or(&report.weak_entities, "None selected")
    ));
    output.push_str(&format!(
        "Many-to-many tables (auto-detected): {}\n",
        list_or(&report.many_to_many, "None detected")
    ));

    if opts.verbose {
        output.push_str(&format!(
            "Foreign keys from: {}\nRelationships ({}):\n",
            report.foreign_keys,
            report.edges.len()
        ));
        for edge in &report.edges {
            output.push_str(&format!("  - {} -> {} [{}]\n", edge.from, edge.to, edge.label));
        }
    }

    if !report.skipped.is_empty() {
        let title = format!("Skipped foreign key clauses ({}):", report.skipped.len());
        if opts.colored {
            output.push_str(&title.yellow().bold().to_string());
        } else {
            output.push_str(&title);
        }
        output.push('\n');
        for skipped in &report.skipped {
            output.push_str(&format!(
                "  - {} line {}: {} ({})\n",
                skipped.table, skipped.line, skipped.text, skipped.reason
            ));
        }
    }
    output
}

fn list_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn html_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!("<li>{}</li>", empty);
    }
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}

const PAGE_STYLE: &str = "body { font-family: Arial; text-align: center; padding: 40px; \
                          background: #f7f8fa; }\n\
                          h2 { color: #333; }\n\
                          h3 { color: #007BFF; }\n\
                          form, .panel { background: white; padding: 20px; display: inline-block; \
                          border-radius: 10px; box-shadow: 0 4px 10px rgba(0,0,0,0.1); \
                          text-align: left; }\n\
                          img { max-width: 100%; height: auto; }";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n{PAGE_STYLE}\n</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape_html(title)
    )
}

/// Weak-entity selection form, one per scanned database
fn format_selection_page(reports: &[ScanReport]) -> String {
    let mut body = String::from("<h2>Select Weak Entities</h2>\n");
    for report in reports {
        let database = escape_html(&report.database.display().to_string());
        body.push_str("<form method=\"POST\">\n");
        body.push_str(&format!(
            "<input type=\"hidden\" name=\"db_path\" value=\"{}\">\n",
            database
        ));
        body.push_str(&format!("<p><b>{}</b></p>\n", database));
        for table in &report.tables {
            let table = escape_html(table);
            body.push_str(&format!(
                "<label><input type=\"checkbox\" name=\"weak\" value=\"{table}\"> {table}</label><br>\n"
            ));
        }
        body.push_str("<br><button type=\"submit\">Generate ER Diagram</button>\n</form>\n");
    }
    page("Select Weak Entities", &body)
}

fn format_result_page(report: &DiagramReport) -> String {
    let mut body = String::from("<h2>ER Diagram Generated</h2>\n");
    if let Some(image) = &report.image {
        let src = escape_html(&image.display().to_string());
        body.push_str(&format!(
            "<div class=\"panel\"><img src=\"{src}\" alt=\"ER Diagram\"></div>\n\
             <p><a href=\"{src}\" download>Download Diagram</a></p>\n"
        ));
    }
    body.push_str(&format!(
        "<p>{} tables, {} relationships</p>\n",
        report.nodes,
        report.edges.len()
    ));
    body.push_str(&format!(
        "<div class=\"panel\">\n<h3>Weak Entities (User Selected)</h3>\n<ul>{}</ul>\n\
         <h3>Auto-Detected Many-to-Many Tables</h3>\n<ul>{}</ul>\n</div>\n",
        html_list(&report.weak_entities, "None selected"),
        html_list(&report.many_to_many, "None detected")
    ));
    page("ER Diagram Generated", &body)
}
