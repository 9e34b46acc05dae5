use clap::{Parser, Subcommand};
use nd_core::{Config, DocumentStore, Error, Result};
use nd_digest::{DigestGenerator, GeminiClient};
use nd_feeds::{DigestPipeline, FeedCollector, PipelineReport, RECENT_WINDOW_DAYS};
use nd_storage::{GithubStore, MemoryStore, NewsStore};
use nd_web::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Feed-to-digest news dashboard", long_about = None)]
struct Cli {
    /// Document store backend: github (default) or memory.
    #[arg(long, default_value = "github")]
    storage: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the dashboard API server
    Serve {
        /// Bind address, overrides BIND_ADDR
        #[arg(long)]
        addr: Option<String>,
    },
    /// Run collect → digest → persist once and exit
    Run,
    /// Manage the feed source list without the web surface
    Feeds {
        #[command(subcommand)]
        command: FeedCommands,
    },
}

#[derive(Subcommand, Debug)]
enum FeedCommands {
    /// Print the registered feed URLs
    List,
    /// Register a feed URL (exact duplicates are ignored)
    Add { url: String },
}

fn create_store(kind: &str, config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match kind {
        "github" => Ok(Arc::new(GithubStore::new(
            config.github_token.clone(),
            config.github_repo.clone(),
        )?)),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(Error::Config(format!("unknown storage backend: {}", other))),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    // Fails closed: a missing credential halts startup here.
    let config = Config::from_env()?;

    let store = NewsStore::new(create_store(&cli.storage, &config)?);
    let collector = FeedCollector::new()?;
    let generator =
        DigestGenerator::new(Arc::new(GeminiClient::new(config.gemini_api_key.clone())));
    let pipeline = DigestPipeline::new(store.clone(), collector, generator);

    match cli.command {
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.bind_addr.clone());
            let app = nd_web::create_app(AppState::new(store, pipeline, config)).await;
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!(%addr, "newsdesk listening");
            axum::serve(listener, app).await?;
        }
        Commands::Run => match pipeline.run().await? {
            PipelineReport::NoRecentArticles => {
                println!(
                    "No articles within the last {} days; nothing stored.",
                    RECENT_WINDOW_DAYS
                );
            }
            PipelineReport::Completed { date, collected } => {
                println!("Stored digest for {} ({} articles).", date, collected);
            }
        },
        Commands::Feeds { command } => match command {
            FeedCommands::List => {
                for feed in store.load_feeds().await? {
                    println!("{}", feed);
                }
            }
            FeedCommands::Add { url } => {
                let mut feeds = store.load_feeds().await?;
                if feeds.contains(&url) {
                    println!("Already registered: {}", url);
                } else {
                    feeds.push(url.clone());
                    store.save_feeds(&feeds, "Add new RSS feed").await?;
                    println!("Added {}", url);
                }
            }
        },
    }

    Ok(())
}
