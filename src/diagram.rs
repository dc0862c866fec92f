//! ER diagram construction.
//!
//! Every table in the catalog becomes exactly one [`Node`], labelled with its
//! name and one row per column. Every foreign key becomes a directed
//! [`Edge`] from the owning table to the referenced table, labelled with the
//! local column(s). Tables named in the [`WeakEntitySelection`] get the
//! [`NodeShape::Weak`] shape; nothing else depends on the selection.
//!
//! Layout and rasterization are left to the external engine driven by
//! [`crate::render`]; this module only produces the DOT description.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sqlite_erd::{
//!     config::Config,
//!     diagram::{WeakEntitySelection, generate_diagram}
//! };
//!
//! let weak: WeakEntitySelection = ["Enrollment"].into_iter().collect();
//! let image = generate_diagram(
//!     Path::new("school.db"),
//!     Path::new("static/diagram_school"),
//!     &weak,
//!     &Config::default()
//! )
//! .unwrap();
//! assert!(image.ends_with("diagram_school.png"));
//! ```

use std::{
    fmt::Write as _,
    path::{Path, PathBuf}
};

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    config::{Config, RenderConfig, SchemaConfig},
    error::DiagramError,
    foreign_key::{ForeignKeyReference, ForeignKeySource, SkippedClause, from_ddl},
    render::Renderer,
    schema::{ColumnInfo, Schema}
};

/// Graph name used in the DOT output
pub const GRAPH_NAME: &str = "ER_Diagram";

const HEADER_COLOR: &str = "#d9edf7";

/// Visual shape of a table node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeShape {
    /// Ordinary entity
    Plain,
    /// User-flagged weak entity, drawn with a double border
    Weak
}

impl NodeShape {
    pub fn dot_shape(self) -> &'static str {
        match self {
            Self::Plain => "rect",
            Self::Weak => "doubleoctagon"
        }
    }
}

/// One table in the diagram.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub table:   String,
    pub columns: Vec<ColumnInfo>,
    pub shape:   NodeShape
}

/// Directed relationship from the owning table to the referenced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from:  String,
    pub to:    String,
    pub label: String
}

impl From<&ForeignKeyReference> for Edge {
    fn from(reference: &ForeignKeyReference) -> Self {
        Self {
            from:  reference.source_table.clone(),
            to:    reference.target_table.clone(),
            label: reference.label()
        }
    }
}

/// Table names the user flagged as weak entities.
///
/// Advisory only: names need not exist in the database. Names are kept
/// exactly as given, since SQLite table names may carry surrounding
/// whitespace; only empty names are dropped. Keeps the order in which names
/// were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeakEntitySelection {
    names: IndexSet<String>
}

impl WeakEntitySelection {
    pub fn contains(&self, table: &str) -> bool {
        self.names.contains(table)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Names sorted, for order-independent hashing
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for WeakEntitySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.is_empty())
                .collect()
        }
    }
}

/// Nodes and edges of one database, plus the clauses that were skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagram {
    pub nodes:   Vec<Node>,
    pub edges:   Vec<Edge>,
    pub skipped: Vec<SkippedClause>
}

impl Diagram {
    /// Assemble a diagram from a loaded schema and its references
    pub fn from_parts(
        schema: &Schema,
        references: &[ForeignKeyReference],
        weak: &WeakEntitySelection,
        skipped: Vec<SkippedClause>
    ) -> Self {
        let nodes = schema
            .tables
            .iter()
            .map(|table| Node {
                table:   table.name.clone(),
                columns: table.columns.clone(),
                shape:   if weak.contains(&table.name) {
                    NodeShape::Weak
                } else {
                    NodeShape::Plain
                }
            })
            .collect();
        let edges = references.iter().map(Edge::from).collect();
        Self {
            nodes,
            edges,
            skipped
        }
    }

    pub fn node(&self, table: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.table == table)
    }

    pub fn edges_from<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.from == table)
    }

    /// Graphviz DOT description of the diagram
    pub fn to_dot(&self, style: &RenderConfig) -> String {
        let mut dot = String::new();
        let _ = writeln!(dot, "digraph {} {{", GRAPH_NAME);
        let _ = writeln!(
            dot,
            "\tgraph [bgcolor={} rankdir={} splines={}]",
            quote(&style.bgcolor),
            quote(&style.rankdir),
            quote(&style.splines)
        );
        for node in &self.nodes {
            let _ = writeln!(
                dot,
                "\t{} [label=<{}> fillcolor=white shape={} style=filled]",
                quote(&node.table),
                table_label(node),
                node.shape.dot_shape()
            );
        }
        for edge in &self.edges {
            let _ = writeln!(
                dot,
                "\t{} -> {} [label={} color=black style=solid]",
                quote(&edge.from),
                quote(&edge.to),
                quote(&edge.label)
            );
        }
        dot.push_str("}\n");
        dot
    }
}

/// Gather references for every table using the configured source.
pub fn collect_references(
    catalog: &Catalog,
    schema: &Schema,
    source: ForeignKeySource
) -> Result<(Vec<ForeignKeyReference>, Vec<SkippedClause>), DiagramError> {
    let mut references = Vec::new();
    let mut skipped = Vec::new();
    for table in &schema.tables {
        match source {
            ForeignKeySource::Catalog => references.extend(catalog.foreign_keys(&table.name)?),
            ForeignKeySource::Ddl => {
                if let Some(sql) = &table.sql {
                    let found = from_ddl(&table.name, sql);
                    references.extend(found.references);
                    skipped.extend(found.skipped);
                }
            }
        }
    }
    Ok((references, skipped))
}

/// Read the database at `path` and build its diagram.
///
/// # Errors
///
/// Returns [`DiagramError::DatabaseUnreadable`] when the database cannot be
/// read. Malformed foreign-key lines never fail the build.
pub fn build_diagram(
    path: &Path,
    weak: &WeakEntitySelection,
    config: &SchemaConfig
) -> Result<Diagram, DiagramError> {
    let catalog = Catalog::open(path)?;
    let schema = Schema::load(&catalog, config.include_internal)?;

    for name in weak.iter() {
        if schema.table(name).is_none() {
            warn!(table = name, "weak entity is not a table in this database");
        }
    }

    let (references, skipped) = collect_references(&catalog, &schema, config.foreign_keys)?;
    let self_loops = references.iter().filter(|r| r.is_self_reference()).count();
    let diagram = Diagram::from_parts(&schema, &references, weak, skipped);
    debug!(
        database = %path.display(),
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        self_loops,
        skipped = diagram.skipped.len(),
        "built diagram"
    );
    Ok(diagram)
}

/// Build the diagram for `database` and render it to
/// `<output_base>.<format>`, returning that path.
///
/// # Errors
///
/// Returns [`DiagramError::DatabaseUnreadable`] for unreadable databases and
/// [`DiagramError::RenderEngineUnavailable`] when the engine cannot be run.
pub fn generate_diagram(
    database: &Path,
    output_base: &Path,
    weak: &WeakEntitySelection,
    config: &Config
) -> Result<PathBuf, DiagramError> {
    let diagram = build_diagram(database, weak, &config.schema)?;
    render_diagram(&diagram, output_base, &config.render)
}

/// Render an already built diagram to `<output_base>.<format>`.
///
/// # Errors
///
/// Returns [`DiagramError::RenderEngineUnavailable`] or
/// [`DiagramError::RenderFailed`] when the engine cannot produce the image.
pub fn render_diagram(
    diagram: &Diagram,
    output_base: &Path,
    style: &RenderConfig
) -> Result<PathBuf, DiagramError> {
    Renderer::from_config(style).render(&diagram.to_dot(style), output_base)
}

fn table_label(node: &Node) -> String {
    let mut label = String::from("<TABLE BORDER=\"1\" CELLBORDER=\"1\" CELLSPACING=\"0\">");
    let _ = write!(
        label,
        "<TR><TD COLSPAN=\"2\" BGCOLOR=\"{}\"><B>{}</B></TD></TR>",
        HEADER_COLOR,
        escape_html(&node.table)
    );
    for column in &node.columns {
        let _ = write!(
            label,
            "<TR><TD ALIGN=\"LEFT\">{}</TD><TD ALIGN=\"LEFT\">{}</TD></TR>",
            escape_html(&column.name),
            escape_html(&column.data_type)
        );
    }
    label.push_str("</TABLE>");
    label
}

/// DOT double-quoted string
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Escape text for HTML-like labels and HTML pages
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c)
        }
    }
    escaped
}
