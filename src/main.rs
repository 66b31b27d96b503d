//! gd_link CLI - Generate a share link for a file in the local Google Drive folder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gd_link::{share_link, AppPaths, Audience, Authenticator, Config, DriveTarget};

/// Generate a share link for a file or directory in your Google Drive.
///
/// By default the link is limited to the email address in config.json (writer access).
/// Use --anyone to make it readable by anyone having the link.
#[derive(Parser)]
#[command(name = "gd_link")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File or directory inside the local Google Drive folder.
    file_path: PathBuf,

    /// Share with anyone having the link (read-only).
    #[arg(short, long)]
    anyone: bool,

    /// Directory holding config.json, credentials.json and token.json
    /// (defaults to the directory of the executable).
    #[arg(long, env = "GD_LINK_HOME")]
    home: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the link
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let paths = match cli.home {
        Some(dir) => AppPaths::new(dir),
        None => AppPaths::beside_executable()?,
    };

    let config = Config::load(&paths.config)
        .with_context(|| format!("Failed to load config from {:?}", paths.config))?;

    // Validate before any remote call
    let target = DriveTarget::new(&config, &cli.file_path)?;
    let audience = Audience::from_flag(cli.anyone, &config);

    let service = Authenticator::new(&paths.credentials, &paths.token)
        .get_service()
        .await
        .context("Failed to authenticate with Google Drive")?;

    let link = share_link(&service, &target, &audience)
        .await
        .with_context(|| format!("Failed to share {:?}", target.path()))?;

    println!("{}", style(link).blue().bold());

    Ok(())
}
