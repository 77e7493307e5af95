// In app/src/main.rs

use anyhow::Result;
use app_config::Settings;
use clap::{Parser, Subcommand};
use core_types::PositionSide;
use engine::{BarOutcome, Bot};
use execution::{Host, OrderIntent, PaperBroker};
use std::path::PathBuf;
use strategies::types::StrategyParameters;
use tracing_subscriber::prelude::*;

mod feed;
mod session;

use crate::session::SessionClock;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "An RSI breakout trading engine for a single instrument.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Loads and validates the configuration, then prints the effective parameters.
    Check,

    /// Drives the engine over a bar file against the in-memory paper host.
    Paper {
        /// CSV file of completed bars with a `close` column, oldest first.
        #[arg(short, long)]
        bars: PathBuf,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings()?;

    let level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Application settings loaded successfully.");

    match cli.command {
        Commands::Check => {
            validate(&settings)?;
        }
        Commands::Paper { bars } => {
            handle_paper(&settings, bars)?;
        }
    }

    tracing::info!("Application has finished successfully.");
    Ok(())
}

/// Validates every section the engine depends on. Nothing may run on failure.
fn validate(settings: &Settings) -> Result<StrategyParameters> {
    let params = settings.strategy_parameters()?;
    let tick_size = settings.instrument.tick_size()?;

    if params.levels.is_degenerate() {
        tracing::warn!(
            buy = %params.levels.buy,
            sell = %params.levels.sell,
            "Buy trigger level is not above the sell trigger level."
        );
    }
    tracing::info!(
        symbol = %settings.instrument.symbol,
        %tick_size,
        rsi_period = params.rsi_period,
        buy_trigger_level = %params.levels.buy,
        sell_trigger_level = %params.levels.sell,
        stop_distance_ticks = params.stop_distance_ticks,
        stop_distance = %params.stop_distance(tick_size),
        bars_per_session = ?settings.session.bars_per_session,
        "Configuration is valid."
    );
    Ok(params)
}

// --- "Paper" Subcommand Logic ---

#[derive(Debug, Default)]
struct RunSummary {
    bars: usize,
    signals: usize,
    orders_submitted: usize,
    orders_rejected: usize,
    drifts: usize,
    forced_flattens: usize,
}

fn handle_paper(settings: &Settings, path: PathBuf) -> Result<()> {
    // --- 1. Initialization ---
    let params = validate(settings)?;
    let tick_size = settings.instrument.tick_size()?;
    let bars = feed::load_bars(&path, tick_size)?;
    tracing::info!(count = bars.len(), path = %path.display(), "Loaded bars for the paper run.");

    let mut bot = Bot::rsi_cross(&settings.instrument.symbol, &params)?;
    let mut host = PaperBroker::new();
    let mut session = SessionClock::new(settings.session.bars_per_session);
    let mut summary = RunSummary::default();

    // --- 2. The Bar Loop ---
    for bar in &bars {
        let outcome = bot.on_bar(bar, &mut host);
        record(&mut summary, &outcome);

        if session.bar_closed() && host.position() != PositionSide::Flat {
            tracing::info!(index = bar.index, "Session ended, forcing the position flat.");
            host.force_flatten();
            summary.forced_flattens += 1;
        }
    }

    // --- 3. Report ---
    let state = bot.state();
    tracing::info!(
        bot_id = %bot.id,
        bars = summary.bars,
        signals = summary.signals,
        orders_submitted = summary.orders_submitted,
        orders_rejected = summary.orders_rejected,
        drifts = summary.drifts,
        forced_flattens = summary.forced_flattens,
        final_position = %host.position(),
        live_stop = ?state.stop,
        "Paper run complete."
    );
    Ok(())
}

fn record(summary: &mut RunSummary, outcome: &BarOutcome) {
    summary.bars += 1;
    if outcome.signal != core_types::Signal::Hold {
        summary.signals += 1;
    }
    if outcome.drift.is_some() {
        summary.drifts += 1;
    }
    for intent in &outcome.intents {
        match intent {
            OrderIntent::Submitted { request, handle } => {
                summary.orders_submitted += 1;
                tracing::info!(index = outcome.bar_index, %handle, side = %request.side, order_type = ?request.order_type, label = %request.label, "Order submitted.");
            }
            OrderIntent::Rejected { request, reason } => {
                summary.orders_rejected += 1;
                tracing::warn!(index = outcome.bar_index, side = %request.side, label = %request.label, reason, "Order rejected.");
            }
            OrderIntent::CancelRequested { handle, outcome: result } => {
                tracing::info!(index = outcome.bar_index, %handle, ?result, "Order cancelled.");
            }
            OrderIntent::CancelFailed { handle, reason } => {
                tracing::warn!(index = outcome.bar_index, %handle, reason, "Cancel failed.");
            }
        }
    }
}
