//! rdfview-cli — schema checking and inspection.
//!
//! The binary in `main.rs` parses arguments and sets up logging; the
//! reports it prints are built here.

use std::path::PathBuf;

use anyhow::Context;
use rdfview_core::{Node, ViewConfig};
use rdfview_engine::{ResolvedType, SchemaSet, ValueConverterRegistry};

/// Resolve which schema files to use: explicit arguments win over configuration.
pub fn schema_paths(explicit: &[PathBuf], config: &ViewConfig) -> anyhow::Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = if explicit.is_empty() {
        config.schema_files.iter().map(PathBuf::from).collect()
    } else {
        explicit.to_vec()
    };
    if paths.is_empty() {
        anyhow::bail!("No schema files given: pass them as arguments or set view.schema_files");
    }
    Ok(paths)
}

/// Load and validate schema files, including converter coverage when strict.
pub fn load_schemas(paths: &[PathBuf], strict_converters: bool) -> anyhow::Result<SchemaSet> {
    let schemas = SchemaSet::load_files(paths).context("Schema validation failed")?;
    if strict_converters {
        schemas
            .check_converters(&ValueConverterRegistry::with_builtins())
            .context("Converter check failed")?;
    }
    Ok(schemas)
}

/// One line per type with its property count and direct supertypes.
pub fn summary(schemas: &SchemaSet) -> String {
    let mut out = format!("{} type(s) OK\n", schemas.len());
    for resolved in schemas.iter() {
        let extends = if resolved.schema.supertypes.is_empty() {
            String::new()
        } else {
            let parents: Vec<String> =
                resolved.schema.supertypes.iter().map(Node::to_string).collect();
            format!("; extends {}", parents.join(", "))
        };
        out.push_str(&format!(
            "  {} ({} properties{extends})\n",
            resolved.id(),
            resolved.properties.len()
        ));
    }
    out
}

/// Full description of one type: supertype closure and every property.
pub fn describe(schemas: &SchemaSet, type_id: &Node) -> anyhow::Result<String> {
    let resolved = schemas.get(type_id)?;
    Ok(render_type(resolved))
}

fn render_type(resolved: &ResolvedType) -> String {
    let supertypes = if resolved.supertypes.is_empty() {
        "(none)".to_string()
    } else {
        let closure: Vec<String> = resolved.supertypes.iter().map(Node::to_string).collect();
        closure.join(" -> ")
    };
    let mut out = format!("{}\n  supertypes: {supertypes}\n  properties:\n", resolved.id());

    for (key, descriptor) in &resolved.properties {
        let inherited = if resolved.schema.properties.contains_key(key) {
            ""
        } else {
            " (inherited)"
        };
        out.push_str(&format!(
            "    {key}: {} {} via {}{inherited}\n",
            descriptor.cardinality(),
            descriptor.target,
            descriptor.predicate
        ));
    }
    out
}
