// ABOUTME: Entry point for advisor — a terminal placement-advice chat client.
// ABOUTME: Parses CLI args, loads config and secrets, sets up logging, and launches the app.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use advisor::app::App;
use advisor::config::Config;
use advisor::router::Route;

#[derive(Debug, Parser)]
#[command(name = "advisor", version, about = "Placement advisor chat in your terminal")]
struct Args {
    /// Path to a config file (defaults to ~/.advisor/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the auth API, e.g. http://localhost:5000/api.
    #[arg(long)]
    api_url: Option<String>,

    /// Gemini model identifier.
    #[arg(long)]
    model: Option<String>,

    /// Where to write the log file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Screen to open: /, /auth or /chat. Signed-out users still land on /auth.
    #[arg(long, default_value = "/chat")]
    open: Route,

    /// Clear the stored session token and exit.
    #[arg(long)]
    logout: bool,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_env("ADVISOR_LOG").unwrap_or_else(|_| EnvFilter::new("advisor=info"));

    // The terminal belongs to the TUI, so logs go to a file.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Secrets: project-local .env first, then ~/.advisor/secrets.env. Neither overrides
    // variables already present in the environment.
    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_path(Config::secrets_env_path());

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    }
    .with_overrides(args.api_url.clone(), args.model.clone());

    let log_path = args.log_file.clone().unwrap_or_else(Config::log_path);
    init_logging(&log_path)?;
    tracing::info!(api = %config.api.base_url, model = %config.llm.model, "advisor starting");

    if args.logout {
        let mut session = App::open_session(&config);
        session.logout();
        println!("Signed out.");
        return Ok(());
    }

    App::new(config).with_initial_route(args.open).run().await?;
    println!("Goodbye.");
    Ok(())
}
