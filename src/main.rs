//! foldscan - above-the-fold audit scanner for mobile product pages.
//!
//! Main entry point for the foldscan CLI and server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use foldscan_api::{ApiServer, AppState};
use foldscan_cdp::{CdpClient, CdpRenderSurface, MOBILE_USER_AGENT};
use foldscan_config::{Config, ConfigLoader};
use foldscan_core::{ScanOptions, Scanner, VIEWPORT};

/// foldscan CLI.
#[derive(Parser)]
#[command(name = "foldscan")]
#[command(about = "Above-the-fold audit scanner for mobile product pages")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scan API server (default)
    Serve {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Scan a single URL and print the result as JSON
    Scan {
        /// Product page URL
        url: String,

        /// Include per-stage review diagnostics
        #[arg(long)]
        diagnostics: bool,

        /// Browser debugging endpoint
        #[arg(long)]
        cdp_endpoint: Option<String>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

/// Load configuration, falling back to defaults when the file is absent.
fn load_config(path: &PathBuf) -> anyhow::Result<Config> {
    if path.exists() {
        ConfigLoader::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        info!("No config file at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        None => serve(config, None, None).await,
        Some(Commands::Serve { host, port }) => serve(config, host, port).await,
        Some(Commands::Scan {
            url,
            diagnostics,
            cdp_endpoint,
        }) => scan_once(config, &url, diagnostics, cdp_endpoint).await,
    }
}

/// Run the API server in the foreground.
async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    info!("Starting foldscan v{}", env!("CARGO_PKG_VERSION"));

    let base_url = config
        .server
        .base_url
        .clone()
        .or_else(|| std::env::var("BASE_URL").ok())
        .context("BASE_URL is required (config server.base_url or env BASE_URL)")?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let state = AppState::from_config(&config, &base_url)?;

    // The cooldown map only grows with distinct clients; sweep it
    // periodically.
    let limiter_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiter_state.rate_limiter.evict_expired();
        }
    });

    info!("Browser endpoint: {}", config.browser.cdp_endpoint);
    info!("Screenshots served from {}", base_url);

    let server = ApiServer::new(host, port, state);
    server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down...");
    Ok(())
}

/// Scan one URL and print the result, saving the screenshot next to the
/// current directory.
async fn scan_once(
    config: Config,
    url: &str,
    diagnostics: bool,
    cdp_endpoint: Option<String>,
) -> anyhow::Result<()> {
    url::Url::parse(url).context("The provided URL is not valid")?;

    let endpoint = cdp_endpoint.unwrap_or_else(|| config.browser.cdp_endpoint.clone());

    let client = CdpClient::connect(&endpoint)
        .await
        .context("Failed to connect to browser")?;
    let session = Arc::new(client.new_page().await.context("Failed to open page")?);

    session
        .emulate_mobile(
            VIEWPORT.width as u32,
            VIEWPORT.height as u32,
            MOBILE_USER_AGENT,
        )
        .await
        .context("Failed to apply mobile emulation")?;
    session
        .navigate(url, config.browser.navigation_timeout())
        .await
        .with_context(|| format!("Failed to navigate to {}", url))?;

    let surface = CdpRenderSurface::new(session.clone());
    let outcome = Scanner::new(config.selectors.selector_set())
        .with_timing(config.scan.timing())
        .scan(&surface, ScanOptions {
            include_diagnostics: diagnostics,
        })
        .await
        .context("Scan failed")?;

    if let Err(e) = client.close_page(session.target_id()).await {
        warn!("Failed to close page: {}", e);
    }

    let filename = format!("scan-{}.png", chrono::Utc::now().timestamp_millis());
    std::fs::write(&filename, &outcome.screenshot)
        .with_context(|| format!("Failed to write {}", filename))?;
    info!("Screenshot saved to {}", filename);

    println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    Ok(())
}
