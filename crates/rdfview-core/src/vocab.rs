//! Well-known IRIs used by the engine and the built-in converters.

use crate::types::Node;

pub mod rdf {
    use super::Node;

    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// The predicate linking a resource to its type.
    pub fn type_() -> Node {
        Node::iri_unchecked(TYPE)
    }
}

pub mod xsd {
    use super::Node;

    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const UNSIGNED_INT: &str = "http://www.w3.org/2001/XMLSchema#unsignedInt";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    pub fn string() -> Node {
        Node::iri_unchecked(STRING)
    }

    pub fn integer() -> Node {
        Node::iri_unchecked(INTEGER)
    }

    /// Node for any datatype IRI constant in this module.
    pub fn datatype(iri: &'static str) -> Node {
        Node::iri_unchecked(iri)
    }
}
