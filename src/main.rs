//! Ontograph CLI entry point

use clap::{Parser, Subcommand};
use ontograph_extract::DocumentLanguage;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "ontograph")]
#[command(about = "Ontograph: turn documents into knowledge graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file
    #[arg(short, long, default_value = "ontograph.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build graphs from a saved relations file
    Graph {
        /// Relations file, one `subject -> predicate -> object` per line
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Extract relations from a document, then build its graphs
    Extract {
        /// Document to read
        document: PathBuf,

        /// Document language (en or fr); defaults to the configured one
        #[arg(short, long)]
        language: Option<DocumentLanguage>,

        /// One part per level-one heading
        #[arg(short, long)]
        decompose: bool,

        /// Ignore relations saved for this document
        #[arg(long)]
        recompute: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },
    /// Delete saved relations
    Clear,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("ontograph={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env loaded: {}", e);
    }
    let config = config::AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Graph { file, pretty } => commands::graph(&config, file, pretty),
        Commands::Extract {
            document,
            language,
            decompose,
            recompute,
            pretty,
        } => {
            let options = commands::ExtractOptions {
                language,
                decompose,
                recompute,
                pretty,
            };
            commands::extract(&config, document, options).await
        }
        Commands::Serve { port, host } => commands::serve(config, host, port).await,
        Commands::Clear => commands::clear(&config),
        Commands::Version => {
            println!("Ontograph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
