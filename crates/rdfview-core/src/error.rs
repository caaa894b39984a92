use thiserror::Error;

/// Errors raised while building data model values or loading configuration.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid IRI {iri:?}: {reason}")]
    InvalidIri { iri: String, reason: String },

    #[error("Invalid blank node label: {0:?}")]
    InvalidBlankNode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
