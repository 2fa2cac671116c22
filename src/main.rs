//! # Inky Dashboard Application Entry Point
//!
//! Gathers today's content (weather, quote, upcoming events), then runs one
//! dashboard refresh cycle and exits. Meant to be started by a timer.
//!
//! Output goes either to the e-paper panel (built with `--features hardware`)
//! or to a PNG preview (`--preview <PNG>`, or automatically when the panel
//! driver is not compiled in).


use anyhow::Context;
use chrono::{Local, NaiveDateTime, Utc};
use clap::Parser;
use dashboard_lib::config::{Config, DEFAULT_CONFIG_PATH};
use dashboard_lib::dashboard::{CycleOutcome, Dashboard, DashboardError};
use dashboard_lib::display::PngDisplay;
use dashboard_lib::fetch::http_client;
use dashboard_lib::icons::{HttpIconProvider, IconProvider};
use dashboard_lib::{calendar, quote, weather, DashboardContent};
use log::info;
use std::path::PathBuf;

/// Render the daily dashboard onto a 7-colour e-paper panel
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Render into this PNG file instead of the panel
    #[arg(long, value_name = "PNG")]
    preview: Option<PathBuf>,
}

/// Fetch everything one frame needs.
///
/// Weather and quote failures abort the run; calendar failures come back as
/// an empty list and make the refresh a no-op.
async fn gather(client: &reqwest::Client, config: &Config) -> anyhow::Result<DashboardContent> {
    let weather = weather::fetch(client, &config.weather)
        .await
        .context("fetching weather")?;
    let quote = quote::fetch(client, &config.quote)
        .await
        .context("fetching quote")?;
    let events = calendar::fetch_upcoming(client, &config.calendar, Utc::now()).await;
    Ok(DashboardContent {
        events,
        weather,
        quote,
    })
}

fn refresh_preview<I: IconProvider>(
    dashboard: &Dashboard<I>,
    content: &DashboardContent,
    now: NaiveDateTime,
    config: &Config,
    path: PathBuf,
) -> Result<CycleOutcome, DashboardError> {
    let (width, height) = (config.display.width, config.display.height);
    dashboard.refresh(content, now, || Ok(PngDisplay::new(width, height, path)))
}

#[cfg(feature = "hardware")]
fn refresh_panel<I: IconProvider>(
    dashboard: &Dashboard<I>,
    content: &DashboardContent,
    now: NaiveDateTime,
    config: &Config,
) -> Result<CycleOutcome, DashboardError> {
    dashboard.refresh(content, now, || {
        dashboard_lib::inky_ac073::open(&config.display.hardware)
    })
}

#[cfg(not(feature = "hardware"))]
fn refresh_panel<I: IconProvider>(
    dashboard: &Dashboard<I>,
    content: &DashboardContent,
    now: NaiveDateTime,
    config: &Config,
) -> Result<CycleOutcome, DashboardError> {
    log::warn!("Panel support not enabled. Rebuild with --features hardware for the e-paper display.");
    let path = config.display.preview_path.clone();
    refresh_preview(dashboard, content, now, config, path)
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = Config::load_from_path(&cli.config);

    // Collaborators are async; the dashboard core only sees blocking calls
    let rt = tokio::runtime::Runtime::new()?;
    let client = http_client()?;

    let content = rt.block_on(gather(&client, &config))?;

    let icons = HttpIconProvider::new(client, rt.handle().clone(), config.icons.base_url.clone());
    let mut dashboard = Dashboard::new(config.layout.clone(), icons);
    if let Some(path) = &config.display.snapshot_path {
        dashboard = dashboard.with_snapshot(path);
    }

    let now = Local::now().naive_local();
    let outcome = match cli.preview {
        Some(path) => refresh_preview(&dashboard, &content, now, &config, path),
        None => refresh_panel(&dashboard, &content, now, &config),
    }
    .context("refreshing dashboard")?;

    match outcome {
        CycleOutcome::NoEvents => info!("📭 Nothing to show, display not refreshed"),
        CycleOutcome::Committed => info!("✅ Dashboard updated"),
    }
    Ok(())
}
