use anyhow::Result;
use clap::{Parser, Subcommand};
use scholar_node::{api, cli, logging, ServiceConfig};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "scholar")]
#[command(about = "Scholar - peer-review badge service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Start {
        /// Review store JSON file
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Address to bind the API to
        #[arg(long)]
        host: Option<String>,

        /// Port for the HTTP API
        #[arg(long)]
        api_port: Option<u16>,
    },

    /// Write a default configuration file
    Init {
        /// Output directory for configuration
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Show badge progress for one wallet
    Stats {
        /// Reviewer wallet address
        wallet: String,

        /// Review store JSON file
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Print the raw JSON snapshot
        #[arg(long)]
        json: bool,
    },

    /// List the configured badge tiers
    Badges,

    /// Create an empty review store if none exists
    Seed {
        /// Review store JSON file
        #[arg(short, long)]
        store: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (ignore if it doesn't)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Priority order: CLI args > ENV vars > Config file > Defaults
    let mut config = ServiceConfig::load_or_default(cli.config.as_deref())?;
    config.apply_env_overrides();

    let show_banner = matches!(cli.command, Commands::Start { .. })
        && cli.verbose == 0
        && std::env::var("RUST_LOG").is_err();
    if show_banner {
        logging::display_boot_banner(VERSION);
    }

    if let Err(e) = logging::init_logging(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        let level = logging::effective_level(&config.logging, cli.verbose);
        // Fall back to basic logging; ignore failure if a subscriber is already set
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                logging::default_directives(level),
            ))
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    }

    match cli.command {
        Commands::Start {
            store,
            host,
            api_port,
        } => {
            if let Some(store) = store {
                config.store.path = store;
            }
            if let Some(host) = host {
                config.api.host = host;
            }
            if let Some(port) = api_port {
                config.api.port = port;
            }

            if !config.api.enabled {
                warn!("API is disabled in configuration, nothing to serve");
                return Ok(());
            }

            let service = cli::build_stats_service(&config)?;

            info!(
                version = VERSION,
                name = %config.service.name,
                store = ?config.store.path,
                host = %config.api.host,
                api_port = config.api.port,
                badge_tiers = service.badges().tiers().len(),
                "🎓 Starting scholar service"
            );

            let api_handle =
                api::start_api_server(service, &config.api.host, config.api.port).await?;

            info!("✅ Service ready");

            tokio::signal::ctrl_c().await?;
            info!("🛑 Shutting down gracefully");
            api_handle.abort();

            Ok(())
        }

        Commands::Init { output } => {
            let path = cli::write_default_config(&output)?;
            println!("Configuration written to {}", path.display());
            Ok(())
        }

        Commands::Stats {
            wallet,
            store,
            json,
        } => {
            if let Some(store) = store {
                config.store.path = store;
            }
            cli::run_stats_query(&config, &wallet, json).await
        }

        Commands::Badges => {
            let table = config.badge_table()?;
            print!("{}", cli::render_badge_table(&table));
            Ok(())
        }

        Commands::Seed { store } => {
            let path = store.unwrap_or(config.store.path);
            cli::seed_store(&path).await
        }
    }
}
