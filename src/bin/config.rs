//! Schema Config CLI
//!
//! View and manage content schema configuration.

use clap::{Parser, Subcommand};
use content_schemas::SchemaConfig;

#[derive(Parser)]
#[command(name = "schema-config")]
#[command(about = "View and manage content schema configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path
        #[arg(short, long, default_value = "content-schemas.toml")]
        output: String,
    },

    /// Validate configuration
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = SchemaConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Content Schema Configuration\n");
                println!("Registry:");
                println!("  Path: {:?}", cfg.registry.path);
                println!("  Root: {:?}", cfg.registry.root);

                println!("\nResolve:");
                println!("  Default version: {:?}", cfg.resolve.default_version);
                println!("  Format: {:?}", cfg.resolve.output_format);

                println!("\nLogging:");
                println!("  Level: {}", cfg.logging.level);
            }
        }

        Commands::Init { output } => {
            let cfg = SchemaConfig::default();
            cfg.save(&output)?;
            println!("✅ Created config file: {}", output);
        }

        Commands::Validate { config } => {
            let loaded = SchemaConfig::load_from(config.as_deref())
                .map_err(|e| e.to_string())
                .and_then(|cfg| cfg.validate().map(|_| cfg).map_err(|e| e.to_string()));

            match loaded {
                Ok(cfg) => {
                    println!("✅ Configuration is valid");
                    println!("   Registry: {:?}", cfg.registry.path);
                    println!("   Root: {:?}", cfg.registry.root);
                }
                Err(e) => {
                    eprintln!("❌ Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
