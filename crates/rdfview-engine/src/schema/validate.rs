//! Load-time checks and supertype resolution.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use rdfview_core::{vocab, Node};

use super::{PropertyDescriptor, ResolvedType, TargetKind, TypeSchema};
use crate::error::SchemaError;

/// Validate every schema against the others and resolve inheritance.
pub(super) fn resolve(
    schemas: Vec<TypeSchema>,
) -> Result<BTreeMap<Node, Arc<ResolvedType>>, SchemaError> {
    let mut by_id: BTreeMap<Node, TypeSchema> = BTreeMap::new();
    for schema in schemas {
        if by_id.contains_key(&schema.id) {
            return Err(SchemaError::DuplicateType(schema.id));
        }
        by_id.insert(schema.id.clone(), schema);
    }

    for schema in by_id.values() {
        check_properties(schema, &by_id)?;
        for supertype in &schema.supertypes {
            if !by_id.contains_key(supertype) {
                return Err(SchemaError::UnknownSupertype {
                    type_id: schema.id.clone(),
                    supertype: supertype.clone(),
                });
            }
        }
    }
    check_acyclic(&by_id)?;

    let mut resolved = BTreeMap::new();
    for (id, schema) in &by_id {
        let supertypes = closure(id, &by_id);
        let mut properties = schema.properties.clone();
        for supertype in &supertypes {
            for (key, descriptor) in &by_id[supertype].properties {
                properties
                    .entry(key.clone())
                    .or_insert_with(|| descriptor.clone());
            }
        }
        resolved.insert(
            id.clone(),
            Arc::new(ResolvedType {
                schema: schema.clone(),
                supertypes,
                properties,
            }),
        );
    }
    Ok(resolved)
}

fn check_properties(
    schema: &TypeSchema,
    by_id: &BTreeMap<Node, TypeSchema>,
) -> Result<(), SchemaError> {
    let mut by_predicate: HashMap<&Node, (&str, &PropertyDescriptor)> = HashMap::new();

    for (key, descriptor) in &schema.properties {
        if key.trim().is_empty() {
            return Err(SchemaError::EmptyPropertyKey(schema.id.clone()));
        }
        if !descriptor.predicate.is_iri() {
            return Err(SchemaError::InvalidPredicate {
                type_id: schema.id.clone(),
                key: key.clone(),
                predicate: descriptor.predicate.clone(),
            });
        }
        if descriptor.predicate.as_str() == vocab::rdf::TYPE {
            return Err(SchemaError::ReservedPredicate {
                type_id: schema.id.clone(),
                key: key.clone(),
            });
        }
        if let TargetKind::Entity(target) = &descriptor.target {
            if !by_id.contains_key(target) {
                return Err(SchemaError::UnknownTarget {
                    type_id: schema.id.clone(),
                    key: key.clone(),
                    target: target.clone(),
                });
            }
        }

        // Two keys may alias one predicate only if they agree on everything.
        match by_predicate.get(&descriptor.predicate) {
            Some((first, other)) if *other != descriptor => {
                return Err(SchemaError::ConflictingPredicate {
                    type_id: schema.id.clone(),
                    predicate: descriptor.predicate.clone(),
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
            Some(_) => {}
            None => {
                by_predicate.insert(&descriptor.predicate, (key.as_str(), descriptor));
            }
        }
    }
    Ok(())
}

fn check_acyclic(by_id: &BTreeMap<Node, TypeSchema>) -> Result<(), SchemaError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit<'a>(
        id: &'a Node,
        by_id: &'a BTreeMap<Node, TypeSchema>,
        marks: &mut HashMap<&'a Node, Mark>,
    ) -> Result<(), SchemaError> {
        match marks.get(id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(SchemaError::SupertypeCycle(id.clone())),
            None => {}
        }
        marks.insert(id, Mark::Visiting);
        if let Some(schema) = by_id.get(id) {
            for supertype in &schema.supertypes {
                visit(supertype, by_id, marks)?;
            }
        }
        marks.insert(id, Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::new();
    for id in by_id.keys() {
        visit(id, by_id, &mut marks)?;
    }
    Ok(())
}

/// Depth-first preorder over declared supertypes. Assumes an acyclic graph.
fn closure(id: &Node, by_id: &BTreeMap<Node, TypeSchema>) -> Vec<Node> {
    fn walk(
        id: &Node,
        by_id: &BTreeMap<Node, TypeSchema>,
        seen: &mut HashSet<Node>,
        out: &mut Vec<Node>,
    ) {
        let Some(schema) = by_id.get(id) else {
            return;
        };
        for supertype in &schema.supertypes {
            if seen.insert(supertype.clone()) {
                out.push(supertype.clone());
                walk(supertype, by_id, seen, out);
            }
        }
    }

    let mut seen = HashSet::from([id.clone()]);
    let mut out = Vec::new();
    walk(id, by_id, &mut seen, &mut out);
    out
}
