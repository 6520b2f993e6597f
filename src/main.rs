use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cowtrends::commands::{seed, serve, trending, ServeParams};

#[derive(Parser)]
#[command(
    name = "cowtrends",
    version,
    about = "Trending hashtag analytics service for the Cow social network",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trending HTTP server
    Serve {
        /// Bind host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Bind port
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// SQLite database path
        #[arg(short, long, default_value = "data/posts.db")]
        database: String,

        /// Default trending result limit
        #[arg(long, default_value = "10")]
        default_limit: usize,

        /// Store query timeout in seconds
        #[arg(long, default_value = "5")]
        query_timeout: u64,

        /// Disable CORS
        #[arg(long, default_value = "false")]
        no_cors: bool,

        /// Disable request logging
        #[arg(long, default_value = "false")]
        no_request_logging: bool,
    },

    /// Compute trending hashtags once and print them
    Trending {
        /// SQLite database path
        #[arg(short, long, default_value = "data/posts.db")]
        database: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Emit JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Load posts from a JSON file into the store
    Seed {
        /// SQLite database path
        #[arg(short, long, default_value = "data/posts.db")]
        database: String,

        /// JSON file containing an array of posts
        #[arg(short, long)]
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    setup_tracing(&cli.log_format, cli.verbose)?;

    tracing::info!("cowtrends starting");

    match cli.command {
        Commands::Serve {
            host,
            port,
            database,
            default_limit,
            query_timeout,
            no_cors,
            no_request_logging,
        } => {
            tracing::info!(
                host = %host,
                port = %port,
                database = %database,
                "Starting serve command"
            );
            serve(ServeParams {
                host,
                port,
                database,
                default_limit,
                query_timeout,
                enable_cors: !no_cors,
                enable_logging: !no_request_logging,
            })
            .await?;
        }

        Commands::Trending {
            database,
            limit,
            at,
            json,
        } => {
            tracing::info!(
                database = %database,
                limit = ?limit,
                at = ?at,
                "Starting trending command"
            );
            trending(database, limit, at, json).await?;
        }

        Commands::Seed { database, input } => {
            tracing::info!(
                database = %database,
                input = %input,
                "Starting seed command"
            );
            seed(database, input).await?;
        }
    }

    tracing::info!("cowtrends completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("cowtrends=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("cowtrends=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
