//! Screen Daemon - Headless Remote Screen over JSON Lines
//!
//! Runs one screen session over stdin/stdout. Each stdin line is a command
//! (or a surface interaction) in JSON; every result, event and rejection is
//! written to stdout as one JSON line. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults
//! screen-daemon
//!
//! # With config file
//! screen-daemon --config /etc/remote-screen/screen.toml
//!
//! # Override the text service and surface size
//! screen-daemon --text-service LCD2 --width 1024 --height 600
//!
//! # Verbose logging
//! RUST_LOG=debug screen-daemon
//! ```
//!
//! # Signals
//!
//! - `SIGINT`: Graceful shutdown (queued commands are still applied)

mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use screen_core::{default_config_path, load_config_from_path, ConfigOverrides};

/// Screen Daemon - headless remote screen over JSON lines
#[derive(Parser, Debug)]
#[command(name = "screen-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "SCREEN_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Service whose messages become line-addressable text
    #[arg(long, value_name = "SERVICE")]
    text_service: Option<String>,

    /// Default font size
    #[arg(long, value_name = "SIZE")]
    font_size: Option<f64>,

    /// Surface width in pixels
    #[arg(long, value_name = "PIXELS")]
    width: Option<f64>,

    /// Surface height in pixels
    #[arg(long, value_name = "PIXELS")]
    height: Option<f64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "SCREEN_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            text_service: self.text_service.clone(),
            default_font_size: self.font_size,
            surface_width: self.width,
            surface_height: self.height,
        }
    }
}

/// Initialize logging on stderr so stdout stays a clean message channel
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("screen_daemon={level},screen_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!("Screen Daemon starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("Failed to load configuration")?;
    args.overrides()
        .apply(&mut config)
        .context("Invalid command-line override")?;

    info!(
        source = %config.source(),
        text_service = %config.text_service,
        log_service = %config.log_service,
        width = config.surface_width,
        height = config.surface_height,
        "Configuration loaded"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let stats = server::serve(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &config,
        shutdown,
    )
    .await?;

    info!(
        commands = stats.commands,
        rejected = stats.rejected,
        events = stats.events,
        results = stats.results,
        "Screen Daemon stopped"
    );
    Ok(())
}
