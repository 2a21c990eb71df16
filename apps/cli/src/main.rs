mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start-page widgets from the terminal: now playing, transport controls,
/// contribution activity and stored settings
#[derive(Parser, Debug)]
#[command(name = "startpage", version)]
pub struct Cli {
    /// Settings database (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Music service to use instead of the stored one ("spotify", "youtubemusic")
    #[arg(long, global = true)]
    pub service: Option<String>,

    /// Music credential to use instead of the stored one
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the currently playing track
    NowPlaying {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
        /// Keep polling every N seconds until interrupted
        #[arg(long, value_name = "SECS")]
        poll: Option<u64>,
    },
    Play,
    Pause,
    Next,
    Previous,
    /// Summarize recent GitHub contributions
    Contributions {
        #[arg(long, default_value_t = 6)]
        months: u32,
    },
    /// Inspect or change stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the settings document
    Show,
    /// Set one field; non-string fields take a JSON value
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,startpage=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => get_db_path()?,
    };
    tracing::debug!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = startpage_persistence::init_db(&db_path).await?;
    commands::run(&cli, pool).await
}

/// Get the database path (platform-specific)
fn get_db_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))?
        .join("startpage");

    Ok(config_dir.join("startpage.db"))
}
