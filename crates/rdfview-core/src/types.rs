//! Core data model for the graph store.
//!
//! These types describe statements in a subject–predicate–object graph,
//! optionally scoped by a named context. They are shared by the store
//! contract, the schema layer, and the entity engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::vocab;

// ── Nodes ─────────────────────────────────────────────────────────

/// An identifier usable as a statement subject, predicate, object, or context.
///
/// Serialized as a plain string: IRIs verbatim, blank nodes as `_:label`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Node {
    /// A globally named node.
    Iri(String),
    /// A locally scoped node.
    Blank(String),
}

impl Node {
    /// Build an IRI node, rejecting strings that cannot be an absolute IRI.
    pub fn iri(iri: impl Into<String>) -> Result<Self, CoreError> {
        let iri = iri.into();
        validate_iri(&iri)?;
        Ok(Self::Iri(iri))
    }

    /// Build an IRI node from a string already known to be valid.
    pub fn iri_unchecked(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// Mint a fresh blank node.
    pub fn blank() -> Self {
        Self::Blank(Uuid::new_v4().simple().to_string())
    }

    /// Build a blank node with an explicit label.
    pub fn blank_labeled(label: impl Into<String>) -> Result<Self, CoreError> {
        let label = label.into();
        if label.is_empty() || label.chars().any(|c| c.is_whitespace()) {
            return Err(CoreError::InvalidBlankNode(label));
        }
        Ok(Self::Blank(label))
    }

    /// Parse the serialized form: `_:label` for blank nodes, anything else as an IRI.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.strip_prefix("_:") {
            Some(label) => Self::blank_labeled(label),
            None => Self::iri(raw),
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    /// The IRI or blank label, without any decoration.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Iri(s) | Self::Blank(s) => s,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

impl TryFrom<String> for Node {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<Node> for String {
    fn from(node: Node) -> Self {
        match node {
            Node::Iri(iri) => iri,
            Node::Blank(label) => format!("_:{label}"),
        }
    }
}

fn validate_iri(iri: &str) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidIri {
        iri: iri.to_string(),
        reason: reason.to_string(),
    };

    let Some((scheme, _)) = iri.split_once(':') else {
        return Err(invalid("missing scheme"));
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return Err(invalid("malformed scheme"));
    }
    if let Some(bad) = iri
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'))
    {
        return Err(invalid(&format!("illegal character {bad:?}")));
    }
    Ok(())
}

// ── Literals ──────────────────────────────────────────────────────

/// A lexical form tagged with a datatype (and, for language strings, a tag).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    /// A literal with an explicit datatype.
    pub fn typed(lexical: impl Into<String>, datatype: Node) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
            language: None,
        }
    }

    /// A plain `xsd:string` literal.
    pub fn string(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, vocab::xsd::string())
    }

    pub fn is_string(&self) -> bool {
        self.datatype.as_str() == vocab::xsd::STRING
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.lexical.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                other => write!(f, "{other}")?,
            }
        }
        write!(f, "\"")?;
        match &self.language {
            Some(lang) => write!(f, "@{lang}"),
            None if self.is_string() => Ok(()),
            None => write!(f, "^^{}", self.datatype),
        }
    }
}

// ── Values ────────────────────────────────────────────────────────

/// The untyped unit of stored data: either a node or a literal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    Resource(Node),
    Literal(Literal),
}

impl Value {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Resource(node) => Some(node),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            Self::Resource(_) => None,
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Self::Resource(node)
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(node) => node.fmt(f),
            Self::Literal(lit) => lit.fmt(f),
        }
    }
}

// ── Statements ────────────────────────────────────────────────────

/// A subject–predicate–object statement, optionally in a named context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Statement {
    pub subject: Node,
    pub predicate: Node,
    pub object: Value,
    pub context: Option<Node>,
}

impl Statement {
    /// A statement in the default graph.
    pub fn new(subject: Node, predicate: Node, object: impl Into<Value>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
            context: None,
        }
    }

    /// Move this statement into a named context.
    pub fn in_context(mut self, context: Node) -> Self {
        self.context = Some(context);
        self
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(ctx) = &self.context {
            write!(f, " {ctx}")?;
        }
        write!(f, " .")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_validation() {
        assert!(Node::iri("http://example.org/a").is_ok());
        assert!(Node::iri("urn:uuid:1234").is_ok());
        assert!(Node::iri("no-scheme").is_err());
        assert!(Node::iri("http://example.org/a b").is_err());
        assert!(Node::iri("1http://x").is_err());
    }

    #[test]
    fn node_string_form_roundtrip() {
        let iri = Node::iri("http://example.org/a").unwrap();
        let blank = Node::blank_labeled("b1").unwrap();

        let raw: String = iri.clone().into();
        assert_eq!(raw, "http://example.org/a");
        assert_eq!(Node::parse(&raw).unwrap(), iri);

        let raw: String = blank.clone().into();
        assert_eq!(raw, "_:b1");
        assert_eq!(Node::parse(&raw).unwrap(), blank);
    }

    #[test]
    fn fresh_blank_nodes_differ() {
        assert_ne!(Node::blank(), Node::blank());
    }

    #[test]
    fn literal_display() {
        assert_eq!(Literal::string("hi").to_string(), "\"hi\"");
        let tagged = Literal {
            lexical: "hallo".to_string(),
            datatype: Node::iri_unchecked(vocab::rdf::LANG_STRING),
            language: Some("de".to_string()),
        };
        assert_eq!(tagged.to_string(), "\"hallo\"@de");

        let int = Literal::typed("42", vocab::xsd::integer());
        assert_eq!(
            int.to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(Literal::string("a\"b").to_string(), "\"a\\\"b\"");
    }

    #[test]
    fn statement_display_with_context() {
        let s = Statement::new(
            Node::iri_unchecked("http://example.org/s"),
            Node::iri_unchecked("http://example.org/p"),
            Literal::string("o"),
        )
        .in_context(Node::iri_unchecked("http://example.org/g"));
        assert_eq!(
            s.to_string(),
            "<http://example.org/s> <http://example.org/p> \"o\" <http://example.org/g> ."
        );
    }
}
