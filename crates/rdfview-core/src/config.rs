//! Configuration management for rdfview.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`RDFVIEW_VIEW__` prefix)
//! 2. Config file (`rdfview.toml`, `[view]` section)
//! 3. Defaults

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::Node;

/// Engine-level settings shared by the factory and the command-line tool.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ViewConfig {
    /// Named graph that views read from and write to. `None` means the
    /// default graph for writes and every graph for reads.
    #[serde(default)]
    pub context: Option<String>,

    /// Schema description files to load at startup.
    #[serde(default)]
    pub schema_files: Vec<String>,

    /// Reject schemas whose literal properties name a native type that
    /// no registered converter can handle.
    #[serde(default = "default_true")]
    pub strict_converters: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            context: None,
            schema_files: Vec::new(),
            strict_converters: default_true(),
        }
    }
}

impl ViewConfig {
    /// Load the `[view]` section from `<file_prefix>` (any format the
    /// `config` crate understands) layered under `RDFVIEW_` environment variables.
    pub fn load(file_prefix: &str) -> Result<Self, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("RDFVIEW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match cfg.get::<ViewConfig>("view") {
            Ok(c) => Ok(c),
            Err(config::ConfigError::NotFound(_)) => {
                tracing::debug!(file_prefix, "No [view] section, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The configured context as a node.
    pub fn context_node(&self) -> Result<Option<Node>, CoreError> {
        self.context.as_deref().map(Node::parse).transpose()
    }
}
