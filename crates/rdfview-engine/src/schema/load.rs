//! Loading schema descriptions from JSON.
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "id": "http://example.org/Person",
//!       "supertypes": ["http://example.org/Agent"],
//!       "properties": {
//!         "name":  { "predicate": "http://example.org/name", "functional": true,
//!                    "target": { "literal": "string" } },
//!         "knows": { "predicate": "http://example.org/knows",
//!                    "target": { "entity": "http://example.org/Person" } }
//!       }
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{SchemaSet, TypeSchema};
use crate::error::SchemaError;

/// One schema description file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub types: Vec<TypeSchema>,
}

impl SchemaDocument {
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }
}

impl SchemaSet {
    /// Parse and validate a single JSON description.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Self::new(SchemaDocument::from_json_str(json)?.types)
    }

    /// Load and validate a single schema file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Self::load_files([path])
    }

    /// Load several files and validate them together, so types may refer
    /// to each other across files.
    pub fn load_files<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Self, SchemaError> {
        let mut types = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let doc = SchemaDocument::read_file(path)?;
            tracing::info!(path = %path.display(), types = doc.types.len(), "Loaded schema file");
            types.extend(doc.types);
        }
        Self::new(types)
    }
}
