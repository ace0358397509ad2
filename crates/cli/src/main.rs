//! DevFolio CLI
//!
//! Web server runner and admin tool.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use devfolio_analyzer::{Aggregator, AggregatorConfig};
use devfolio_api::{create_router, AppState, ContactService, LogNotifier, PortfolioProfile};
use devfolio_collector::{CollectorConfig, GithubClient, RepoSort};
use devfolio_database::{ContactStatus, Database};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "DevFolio - GitHub-backed developer portfolio backend")]
#[command(version)]
struct Cli {
    /// Database file path
    #[arg(short, long, env = "FOLIO_DATABASE", default_value = "devfolio.db")]
    database: PathBuf,

    /// GitHub account the portfolio describes
    #[arg(short, long, env = "GITHUB_USERNAME", default_value = "octocat")]
    username: String,

    /// GitHub token, enables pinned repositories and higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// How long GitHub responses stay cached, in seconds
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 3600)]
    cache_ttl: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind to
        #[arg(short, long, env = "FOLIO_BIND", default_value = "127.0.0.1:8001")]
        bind: SocketAddr,

        /// JSON file with personal info, skills and experience
        #[arg(short, long, env = "PORTFOLIO_FILE")]
        portfolio: Option<PathBuf>,

        /// Address new contact messages are reported to
        #[arg(long, env = "ADMIN_EMAIL")]
        admin_email: Option<String>,
    },

    /// Show the GitHub profile
    User,

    /// List repositories with their languages
    Repos {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        /// updated, created, pushed or full_name
        #[arg(short, long, default_value = "updated")]
        sort: RepoSort,
    },

    /// Show featured repositories
    Featured,

    /// Show repository statistics
    Stats,

    /// Inspect or empty the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// List contact messages, newest first
    Messages {
        #[arg(short, long, default_value_t = 50)]
        limit: i64,

        #[arg(short, long, default_value_t = 0)]
        skip: i64,
    },

    /// Mark a contact message as read
    MarkRead {
        id: String,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cache entries and their expiry
    List,
    /// Remove expired entries
    Purge,
    /// Remove every entry
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = if cli.verbose { "debug" } else { "info" };
            EnvFilter::new(level).add_directive("sqlx=warn".parse()?)
        }
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Connect to database
    let db = Database::connect(&cli.database).await?;

    match &cli.command {
        Commands::Serve {
            bind,
            portfolio,
            admin_email,
        } => {
            let contact = ContactService::new(
                db.clone(),
                Arc::new(LogNotifier::new(admin_email.clone())),
            );
            let profile = load_portfolio(portfolio.as_deref()).await?;
            let aggregator = aggregator(&cli, db)?;
            serve(AppState::new(aggregator, contact, profile), *bind).await?;
        }
        Commands::User => {
            let aggregator = aggregator(&cli, db)?;
            match aggregator.user_info().await {
                Some(user) => print_json(&user)?,
                None => eprintln!("GitHub user {} not found", cli.username),
            }
        }
        Commands::Repos { limit, sort } => {
            let aggregator = aggregator(&cli, db)?;
            print_json(&aggregator.repositories(*limit, *sort).await)?;
        }
        Commands::Featured => {
            let aggregator = aggregator(&cli, db)?;
            print_json(&aggregator.featured().await)?;
        }
        Commands::Stats => {
            let aggregator = aggregator(&cli, db)?;
            print_json(&aggregator.stats().await)?;
        }
        Commands::Cache { action } => {
            cache(&db, action).await?;
        }
        Commands::Messages { limit, skip } => {
            let messages = db.get_contact_messages((*limit).max(0), (*skip).max(0)).await?;
            print_json(&messages)?;
        }
        Commands::MarkRead { id } => {
            if db.set_contact_status(id, ContactStatus::Read).await? {
                println!("Marked {} as read", id);
            } else {
                eprintln!("No message with id {}", id);
            }
        }
    }

    Ok(())
}

fn aggregator(cli: &Cli, db: Database) -> Result<Aggregator> {
    let mut config = CollectorConfig::default();
    if cli.github_token.is_some() {
        config.github_token = cli.github_token.clone().filter(|t| !t.is_empty());
    }

    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN not set. Pinned repositories are skipped and rate limits are restricted.");
    }

    let github = Arc::new(GithubClient::new(config)?);

    let mut settings = AggregatorConfig::new(cli.username.clone());
    settings.cache_ttl = Duration::from_secs(cli.cache_ttl);

    Ok(Aggregator::new(db, github, settings))
}

async fn load_portfolio(path: Option<&std::path::Path>) -> Result<PortfolioProfile> {
    match path {
        Some(path) => Ok(PortfolioProfile::load(path).await?),
        None => {
            warn!("No portfolio file given, serving an empty profile");
            Ok(PortfolioProfile::default())
        }
    }
}

async fn serve(state: AppState, bind: SocketAddr) -> Result<()> {
    info!(
        username = %state.aggregator.config().username,
        "Starting DevFolio server on {}", bind
    );
    let router = create_router(Arc::new(state));

    info!("API available at http://{}/api", bind);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn cache(db: &Database, action: &CacheAction) -> Result<()> {
    match action {
        CacheAction::List => {
            let entries = db.cache_entries().await?;
            let now = Utc::now();

            println!("{:<30} {:<10} {:<25}", "KEY", "STATE", "EXPIRES");
            println!("{}", "-".repeat(65));

            for entry in &entries {
                let state = if entry.is_live_at(now) { "live" } else { "expired" };
                println!("{:<30} {:<10} {:<25}", entry.key, state, entry.expires_at);
            }

            if entries.is_empty() {
                println!("Cache is empty.");
            }
        }
        CacheAction::Purge => {
            let removed = db.purge_expired_cache().await?;
            println!("Removed {} expired entries", removed);
        }
        CacheAction::Clear => {
            let removed = db.clear_cache().await?;
            println!("Removed {} entries", removed);
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
