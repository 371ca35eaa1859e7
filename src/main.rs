//! CLI entry point for the portal session keeper.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use moodle_session::session::{Credentials, SessionManager, SessionRecord};
use tracing::{info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(base_url = %args.base_url, "portal session keeper starting");

    let credentials = Credentials::new(args.username, args.password);
    let manager = SessionManager::new(args.base_url, credentials);

    let outcome = manager.login().await;
    if !outcome.success {
        bail!("login failed; check credentials and portal availability");
    }
    let Some(moodle_session) = outcome.session_value else {
        // Known portal quirk: a redirect with no session cookie. The library
        // reports it as a success; for this tool it is unusable.
        bail!("login accepted but the portal issued no session cookie");
    };

    let mut record = SessionRecord::new(moodle_session);
    match manager.fetch_sesskey().await {
        Some(sesskey) => record.sesskey = Some(sesskey),
        None => warn!("could not extract sesskey; AJAX collaborators will not work"),
    }
    record.save(&args.session_file).with_context(|| {
        format!(
            "writing session record to {}",
            args.session_file.display()
        )
    })?;
    info!(path = %args.session_file.display(), "session record written");

    if args.once {
        return Ok(());
    }

    manager.start_refresh(Duration::from_secs(args.refresh_minutes * 60));
    info!("session keeper running; press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!("shutting down");
    manager.cleanup();
    Ok(())
}
