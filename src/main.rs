//! Rustsignal CLI
//!
//! Resolves free-text instrument references and prints the signal or price
//! text contract.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rustsignal::application::SignalService;
use rustsignal::config::Config;
use rustsignal::infrastructure::factory::ServiceFactory;
use rustsignal::infrastructure::observability::Metrics;
use serde::Serialize;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Technical signals from free-text instrument names", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print the typed report as JSON instead of the text block
    #[arg(long, global = true)]
    json: bool,

    /// Print Prometheus metrics to stderr after the command
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a BUY/SELL/NEUTRAL signal with levels
    Signal {
        /// Instrument text, e.g. "gold" or "إشارة بيتكوين"
        text: String,

        /// Timeframe text, e.g. "4h" or "عالساعة"
        #[arg(short, long)]
        timeframe: Option<String>,
    },
    /// Print the latest closed price
    Price {
        text: String,

        #[arg(short, long)]
        timeframe: Option<String>,
    },
    /// Resolve symbol and timeframe without fetching data
    Resolve {
        text: String,

        #[arg(short, long)]
        timeframe: Option<String>,
    },
}

fn print_report<T: Serialize>(report: &T, text: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

async fn run(cli: Cli, config: Config, metrics: Option<Metrics>) -> Result<()> {
    let gateway = ServiceFactory::create_gateway(&config, metrics.clone());
    let mut service = SignalService::new(gateway, config.signal.clone());
    if let Some(metrics) = metrics {
        service = service.with_metrics(metrics);
    }

    match cli.command {
        Commands::Signal { text, timeframe } => {
            let report = service.signal(&text, timeframe.as_deref()).await?;
            print_report(&report, &report.text, cli.json)?;
        }
        Commands::Price { text, timeframe } => {
            let report = service.price(&text, timeframe.as_deref()).await?;
            print_report(&report, &report.text, cli.json)?;
        }
        Commands::Resolve { text, timeframe } => {
            let request = service.resolve(
                &text,
                timeframe.as_deref(),
                config.signal.signal_default_timeframe,
            )?;
            let summary = format!(
                "Symbol: {}\nAsset class: {}\nDisplay: {}\nInterval: {}{}",
                request.resolved.symbol,
                request.resolved.asset_class,
                request.display_pair,
                request.timeframe,
                if request.timeframe_detected { "" } else { " (default)" }
            );
            print_report(&request, &summary, cli.json)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the report
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };
    debug!("Configuration loaded: {:?}", config);

    let metrics = if cli.metrics {
        match Metrics::new() {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                eprintln!("error: failed to create metrics: {:#}", e);
                return ExitCode::from(2);
            }
        }
    } else {
        None
    };

    let outcome = run(cli, config, metrics.clone()).await;

    if let Some(metrics) = &metrics {
        eprintln!("{}", metrics.render());
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
