use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use matchfeed::config::{self, AppConfig};
use matchfeed::feed::build_feed;
use matchfeed::matches::OddsPolicy;
use matchfeed::monitoring::logger;
use matchfeed::server::{self, FeedState};

#[derive(Debug, Parser)]
#[command(name = "matchfeed", version, about = "Odds sheet export → match feed JSON")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize a CSV export and print the feed JSON to stdout.
    Parse {
        /// CSV file to read; stdin when omitted or "-".
        input: Option<PathBuf>,
        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
        /// Drop rows whose odds are not real prices.
        #[arg(long)]
        strict_odds: bool,
    },
    /// Serve the latest ingested feed over HTTP.
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mut config, secrets) = AppConfig::load(&cli.config)?;

    logger::init_logging(&config.monitoring)?;

    match cli.command {
        Command::Parse {
            input,
            pretty,
            strict_odds,
        } => {
            if strict_odds {
                config.parser.odds_policy = OddsPolicy::Strict;
            }
            run_parse(&config, input.as_deref(), pretty)
        }
        Command::Serve { bind, port } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if secrets.ingest_token.is_none() {
                tracing::warn!("MATCHFEED_INGEST_TOKEN is not set, ingest endpoint is disabled");
            }
            let state = FeedState::new(config.parser.clone(), &config.server, secrets.ingest_token);
            server::run_server(state, &config.server.addr()).await
        }
    }
}

/// Read the export, build the feed and write it to stdout.
fn run_parse(config: &AppConfig, input: Option<&Path>, pretty: bool) -> Result<()> {
    let text = read_input(input)?;

    let feed = build_feed(&text, &config.parser, Utc::now())?;
    let stats = feed.stats();
    tracing::info!(
        total = stats.total,
        leagues = stats.leagues,
        summary = %stats,
        "Feed built"
    );

    let json = if pretty {
        serde_json::to_string_pretty(&feed)?
    } else {
        serde_json::to_string(&feed)?
    };
    println!("{json}");

    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
