//! CLI entry point for rdfview schema tooling.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use rdfview_core::{Node, ViewConfig};

#[derive(Parser)]
#[command(name = "rdfview")]
#[command(about = "Validate and inspect rdfview type schemas")]
struct Cli {
    /// Config file prefix (default: rdfview).
    #[arg(short, long, default_value = "rdfview", global = true)]
    config: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and validate schema files.
    Check {
        /// Schema files (default: view.schema_files from config).
        files: Vec<PathBuf>,
    },
    /// Print the properties and supertypes of one type.
    Describe {
        /// Type IRI.
        type_iri: String,

        /// Schema files (default: view.schema_files from config).
        #[arg(short, long = "schema")]
        schemas: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    let config = ViewConfig::load(&cli.config)?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Check { files } => {
            let paths = rdfview_cli::schema_paths(&files, &config)?;
            let schemas = rdfview_cli::load_schemas(&paths, config.strict_converters)?;
            tracing::info!(files = paths.len(), types = schemas.len(), "Schemas valid");
            print!("{}", rdfview_cli::summary(&schemas));
        }
        Command::Describe { type_iri, schemas } => {
            let paths = rdfview_cli::schema_paths(&schemas, &config)?;
            let schemas = rdfview_cli::load_schemas(&paths, config.strict_converters)?;
            let type_id = Node::iri(type_iri)?;
            print!("{}", rdfview_cli::describe(&schemas, &type_id)?);
        }
    }

    Ok(())
}
