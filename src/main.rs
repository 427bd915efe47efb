//! imposter-server - session server for the Imposter word party game

use anyhow::{Context, Result};
use clap::Parser;
use imposter::config::Config;
use imposter::engine::Engine;
use imposter::server::ServerListener;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "imposter-server")]
#[command(about = "Session server for the Imposter word party game")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Category table in TOML or JSON (overrides config)
    #[arg(short, long)]
    words: Option<std::path::PathBuf>,

    /// Seed the RNG for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    if let Some(words) = cli.words {
        config.content.words_file = Some(words);
    }

    let table = config
        .word_table()
        .context("Invalid word content configuration")?;
    tracing::info!("Loaded {} categories", table.categories().len());

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let engine = Engine::with_rng(config.game.clone(), Box::new(table), rng);

    let listener = ServerListener::bind(&config.server.listen).await?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        if shutdown_tx.send(()).await.is_err() {
            tracing::debug!("Server already stopped before shutdown signal");
        }
    });

    listener.run(engine, shutdown_rx).await
}
