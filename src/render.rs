//! External graph-rendering engine.
//!
//! The DOT description is piped to the engine's standard input and the
//! engine writes the image itself, so no intermediate description file is
//! left behind unless `keep_source` asks for one. The child process is
//! always waited on before returning.

use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio}
};

use tracing::{debug, warn};

use crate::{config::RenderConfig, error::DiagramError};

/// Extension of the optional DOT source file
pub const SOURCE_EXTENSION: &str = "gv";

/// Invokes a Graphviz-compatible engine (`<engine> -T<format> -o <file>`).
#[derive(Debug, Clone)]
pub struct Renderer {
    engine:      String,
    format:      String,
    keep_source: bool
}

impl Renderer {
    pub fn new(engine: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            engine:      engine.into(),
            format:      format.into(),
            keep_source: false
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            engine:      config.engine.clone(),
            format:      config.format.clone(),
            keep_source: config.keep_source
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// `<base>.<format>`; the base may itself contain dots.
    pub fn output_path(&self, base: &Path) -> PathBuf {
        with_suffix(base, &self.format)
    }

    /// Render `dot` to `<base>.<format>` and return that path.
    ///
    /// An existing file at that path is overwritten.
    ///
    /// # Errors
    ///
    /// - [`DiagramError::RenderEngineUnavailable`] if the engine cannot be
    ///   started
    /// - [`DiagramError::RenderFailed`] if it exits unsuccessfully
    /// - [`DiagramError::Storage`] if the source file cannot be written
    pub fn render(&self, dot: &str, base: &Path) -> Result<PathBuf, DiagramError> {
        let output = self.output_path(base);
        if self.keep_source {
            let source = with_suffix(base, SOURCE_EXTENSION);
            fs::write(&source, dot)
                .map_err(|e| DiagramError::storage(source.display().to_string(), e))?;
        }

        debug!(engine = %self.engine, output = %output.display(), "invoking render engine");
        let mut child = Command::new(&self.engine)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(&output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DiagramError::RenderEngineUnavailable {
                engine: self.engine.clone(),
                source
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A failed write surfaces through the exit status below.
            if let Err(e) = stdin.write_all(dot.as_bytes()) {
                warn!(engine = %self.engine, error = %e, "failed to write graph to render engine");
            }
        }

        let result = child
            .wait_with_output()
            .map_err(|source| DiagramError::RenderEngineUnavailable {
                engine: self.engine.clone(),
                source
            })?;
        if !result.status.success() {
            return Err(DiagramError::RenderFailed {
                engine: self.engine.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string()
            });
        }
        Ok(output)
    }
}

fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
