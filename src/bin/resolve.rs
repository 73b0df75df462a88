//! Schema Resolve CLI
//!
//! Resolves the schema that applies to a content file, validates files
//! against it, and compares schema revisions.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use content_schemas::config::OutputFormat;
use content_schemas::version::compare_str;
use content_schemas::{
    extract_format_version, validate_document, FormatVersion, SchemaConfig, SchemaDiff,
    SchemaError, SchemaRegistry, SchemaResolver,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-resolve")]
#[command(about = "Resolve format-version aware schemas for content files")]
struct Cli {
    /// Registry file or directory (overrides config)
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Config file to load
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schema for a document
    Resolve {
        /// Document to resolve for
        document: PathBuf,
        /// Use this version instead of the declared one
        #[arg(short = 'V', long)]
        version: Option<String>,
        /// Write the schema to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a document against its resolved schema
    Validate {
        /// Document to validate
        document: PathBuf,
    },

    /// Show how an entry's schema changes between two versions
    Diff {
        /// Entry name
        #[arg(short, long)]
        entry: String,
        /// Older version
        #[arg(short, long)]
        from: String,
        /// Newer version
        #[arg(short, long)]
        to: String,
    },

    /// Compare two versions (prints -1, 0 or 1)
    Compare { a: String, b: String },
}

fn main() {
    let cli = Cli::parse();

    let config = match SchemaConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_registry(cli_path: Option<PathBuf>, config: &SchemaConfig) -> Result<SchemaRegistry, SchemaError> {
    let path = cli_path.unwrap_or_else(|| config.registry_path());
    let registry = SchemaRegistry::load(&path)?;
    Ok(match config.registry_root() {
        Some(root) => registry.with_root(root),
        None => registry,
    })
}

fn to_json(value: &serde_json::Value, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
        OutputFormat::Compact => serde_json::to_string(value),
    }
}

fn run(cli: Cli, config: SchemaConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Compare { a, b } => {
            println!("{}", compare_str(&a, &b));
            Ok(())
        }

        Commands::Resolve { document, version, output } => {
            let registry = load_registry(cli.registry, &config)?;
            let entry = registry.find(&document).ok_or_else(|| SchemaError::NoMatchingEntry {
                path: document.display().to_string(),
            })?;

            let version = match version {
                Some(v) => Some(FormatVersion::parse_strict(&v)?),
                None => {
                    let text = fs::read_to_string(&document)?;
                    extract_format_version(&text).or_else(|| config.default_version())
                }
            };

            let schema = SchemaResolver::new(entry).resolve(version.as_ref());
            let rendered = to_json(&schema, config.resolve.output_format)?;

            match output {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    eprintln!(
                        "✅ Wrote {} schema ({}) to {}",
                        entry.label(),
                        version.map(|v| v.to_string()).unwrap_or_else(|| "base".to_string()),
                        path.display()
                    );
                }
                None => println!("{}", rendered),
            }
            Ok(())
        }

        Commands::Validate { document } => {
            let registry = load_registry(cli.registry, &config)?;
            let text = fs::read_to_string(&document)?;
            let resolved = registry.resolve_document(&document, &text)?;
            let instance: serde_json::Value = serde_json::from_str(&text)?;

            match validate_document(&resolved.schema, &instance) {
                Ok(()) => {
                    println!("✅ {} is valid ({})", document.display(), resolved.entry.label());
                    Ok(())
                }
                Err(SchemaError::Validation(messages)) => {
                    println!("❌ {} - {} error(s)", document.display(), messages.len());
                    for message in &messages {
                        println!("   └─ {}", message);
                    }
                    std::process::exit(1);
                }
                Err(e) => Err(e.into()),
            }
        }

        Commands::Diff { entry, from, to } => {
            let registry = load_registry(cli.registry, &config)?;
            let entry = registry
                .get(&entry)
                .ok_or_else(|| SchemaError::NotFound(entry.clone()))?;

            let from = FormatVersion::parse_strict(&from)?;
            let to = FormatVersion::parse_strict(&to)?;
            let diff = SchemaDiff::between(entry, &from, &to)?;

            println!("🔍 {}: {} -> {}", entry.label(), from, to);
            if diff.is_empty() {
                println!("✅ No schema changes");
            } else {
                println!("{}", diff.render());
                println!();
                println!("{} line(s) added, {} line(s) removed", diff.added(), diff.removed());
            }
            Ok(())
        }
    }
}
