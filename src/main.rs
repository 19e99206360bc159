use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corpscout::config::Config;

mod commands;

use commands::{analyze, gap, push_event, refresh, reports, serve, AnalyzeParams};

#[derive(Parser)]
#[command(
    name = "corpscout",
    version,
    about = "Company research assistant: AI event extraction with database gap analysis",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to logging.format from the config
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file; environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a company by name or website URL
    Analyze {
        /// Company name or website URL
        query: String,

        /// Maximum number of events to extract (1 runs a single test query)
        #[arg(short, long)]
        max_events: Option<usize>,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,

        /// Do not save the report locally
        #[arg(long, default_value = "false")]
        no_store: bool,
    },

    /// Show what the company database holds for a website
    Refresh {
        /// Company website URL
        url: String,

        /// Print the result as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List saved reports
    Reports {
        /// Maximum number of reports to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Compare saved AI events against a database export
    Gap {
        /// JSON file with AI-extracted events
        #[arg(long)]
        ai: PathBuf,

        /// JSON file with database events (array or events endpoint payload)
        #[arg(long)]
        db: PathBuf,

        /// Similarity threshold; defaults to matching.threshold
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Add an event to the company database
    PushEvent {
        /// Company database id
        #[arg(long)]
        company_id: i64,

        /// JSON file holding one corporate event
        #[arg(long)]
        event: PathBuf,
    },

    /// Start the HTTP API server
    Serve {
        /// Host address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("corpscout starting");

    match cli.command {
        Commands::Analyze {
            query,
            max_events,
            json,
            no_store,
        } => {
            tracing::info!(
                query = %query,
                max_events = ?max_events,
                json = %json,
                "Starting analyze command"
            );
            analyze(
                config,
                AnalyzeParams {
                    query,
                    max_events,
                    json,
                    store: !no_store,
                },
            )
            .await?;
        }

        Commands::Refresh { url, json } => {
            tracing::info!(url = %url, "Starting refresh command");
            refresh(config, &url, json).await?;
        }

        Commands::Reports { limit } => {
            tracing::info!(limit = %limit, "Starting reports command");
            reports(&config, limit)?;
        }

        Commands::Gap { ai, db, threshold } => {
            tracing::info!(ai = %ai.display(), db = %db.display(), "Starting gap command");
            let threshold = threshold.unwrap_or(config.matching.threshold);
            gap(&ai, &db, threshold)?;
        }

        Commands::PushEvent { company_id, event } => {
            tracing::info!(company_id = %company_id, event = %event.display(), "Starting push-event command");
            push_event(config, company_id, &event).await?;
        }

        Commands::Serve { host, port } => {
            tracing::info!(host = %host, port = %port, "Starting serve command");
            serve(config, &host, port).await?;
        }
    }

    Ok(())
}

/// Setup tracing subscriber for logging
fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("corpscout=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("corpscout={level},warn"))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("corpscout=info,warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
