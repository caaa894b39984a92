//! rdfview-core: Graph data model, vocabulary, configuration, and error handling.
//!
//! This crate provides the foundational types used across all rdfview components:
//! - Nodes, literals, values, and statements of the graph store
//! - Well-known RDF and XSD vocabulary
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;
pub mod vocab;

pub use config::ViewConfig;
pub use error::CoreError;
pub use types::{Literal, Node, Statement, Value};
