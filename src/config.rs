//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sqlite-erd.toml` in current directory
//! 4. `~/.config/sqlite-erd/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [storage]
//! upload_dir = "uploads"
//! output_dir = "static"
//!
//! [render]
//! engine = "dot"              # path or name of the Graphviz binary
//! format = "png"
//! rankdir = "LR"
//! splines = "ortho"
//! bgcolor = "white"
//! keep_source = false         # also write <base>.gv next to the image
//!
//! [schema]
//! foreign_keys = "catalog"    # catalog, ddl
//! include_internal = true     # keep sqlite_% tables in the catalog
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQLITE_ERD_ENGINE` | Graph-rendering engine binary |
//! | `SQLITE_ERD_UPLOAD_DIR` | Directory for stored databases |
//! | `SQLITE_ERD_OUTPUT_DIR` | Directory for generated diagrams |
//! | `SQLITE_ERD_FOREIGN_KEYS` | `catalog` or `ddl` |

use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use crate::{
    error::{AppResult, config_error},
    foreign_key::ForeignKeySource
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub render:  RenderConfig,
    #[serde(default)]
    pub schema:  SchemaConfig
}

/// Where uploaded databases and generated diagrams live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("static")
        }
    }
}

/// Graph-rendering engine and graph-level attributes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub engine:      String,
    pub format:      String,
    pub rankdir:     String,
    pub splines:     String,
    pub bgcolor:     String,
    pub keep_source: bool
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            engine:      String::from("dot"),
            format:      String::from("png"),
            rankdir:     String::from("LR"),
            splines:     String::from("ortho"),
            bgcolor:     String::from("white"),
            keep_source: false
        }
    }
}

/// Catalog reading options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Where foreign-key edges come from
    pub foreign_keys:     ForeignKeySource,
    /// Keep `sqlite_%` tables (e.g. `sqlite_sequence`)
    pub include_internal: bool
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            foreign_keys:     ForeignKeySource::Catalog,
            include_internal: true
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sqlite-erd.toml)
    /// 3. Config file in home directory (~/.config/sqlite-erd/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sqlite-erd")
                .join("config.toml");

            if home_config.exists() {
                config = Self::read_file(&home_config)?;
            }
        }

        // Current directory config overrides home config
        let local_config = PathBuf::from(".sqlite-erd.toml");
        if local_config.exists() {
            config = Self::read_file(&local_config)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    fn read_file(path: &PathBuf) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(engine) = env::var("SQLITE_ERD_ENGINE") {
            self.render.engine = engine;
        }

        if let Some(dir) = env::var_os("SQLITE_ERD_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }

        if let Some(dir) = env::var_os("SQLITE_ERD_OUTPUT_DIR") {
            self.storage.output_dir = PathBuf::from(dir);
        }

        if let Ok(source) = env::var("SQLITE_ERD_FOREIGN_KEYS") {
            self.schema.foreign_keys = source.parse().map_err(|_| {
                config_error(format!(
                    "SQLITE_ERD_FOREIGN_KEYS must be 'catalog' or 'ddl', got '{}'",
                    source
                ))
            })?;
        }

        Ok(())
    }
}
