//! GymTrack - headless runner
//!
//! Drives the workout timer and the log viewer from a terminal.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gymtrack_app::{AppContext, LogFilter};
use gymtrack_common::time::format_clock;
use gymtrack_domain::{Config, LogCategory, LogLevel, TimerStatus, TimerType};
use gymtrack_infra::{config, observability};

#[derive(Parser, Debug)]
#[command(name = "gymtrack", version, about = "Workout timer and diagnostics log")]
struct Cli {
    /// Configuration file (TOML or JSON). Defaults to env vars, then probing.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a timer in the foreground until it completes or Ctrl-C
    Timer {
        /// exercise, rest or custom
        kind: TimerType,
        /// Countdown length in seconds
        #[arg(long)]
        seconds: Option<u32>,
        /// Exercise or set id the timer belongs to
        #[arg(long)]
        owner: Option<String>,
        /// Stop after this many seconds even if still running
        #[arg(long)]
        run_for: Option<u64>,
    },
    /// Print stored log entries, newest first
    Logs {
        #[arg(long)]
        level: Option<LogLevel>,
        #[arg(long)]
        category: Option<LogCategory>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Print counts by level and category
    Stats,
    /// Write the export document to the export directory
    Export,
    /// Delete all stored log entries
    Clear,
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let loaded = match path {
        Some(path) => config::load_from_file(Some(path)),
        None => config::load(),
    };
    loaded.context("failed to load configuration")
}

async fn run_timer(
    ctx: &AppContext,
    kind: TimerType,
    seconds: Option<u32>,
    owner: Option<String>,
    run_for: Option<u64>,
) -> Result<()> {
    gymtrack_app::start_timer(ctx, kind, seconds, owner).await?;

    let period = Duration::from_millis(ctx.config.timer.tick_interval_ms.max(1));
    let deadline = run_for.map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));
    let mut interval = tokio::time::interval(period);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                println!();
                gymtrack_app::stop_timer(ctx).await?;
                break;
            }
            _ = interval.tick() => {
                let view = gymtrack_app::get_timer_view(ctx);
                if view.status == TimerStatus::Idle {
                    println!("\rdone      ");
                    break;
                }
                print!("\r{} {}   ", view.status, format_clock(view.displayed_value));
                std::io::Write::flush(&mut std::io::stdout()).ok();

                if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                    println!();
                    gymtrack_app::stop_timer(ctx).await?;
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn run(cli: Cli, ctx: &AppContext) -> Result<()> {
    match cli.command {
        Commands::Timer { kind, seconds, owner, run_for } => {
            run_timer(ctx, kind, seconds, owner, run_for).await?;
        }
        Commands::Logs { level, category, search, limit } => {
            let filter = LogFilter { level, category, search, ..LogFilter::default() };
            for entry in gymtrack_app::get_logs(ctx, &filter).into_iter().take(limit) {
                println!("{} {:5} {}", entry.timestamp.to_rfc3339(), entry.level.as_str(), entry.console_line());
            }
        }
        Commands::Stats => {
            let stats = gymtrack_app::get_log_stats(ctx);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Export => {
            let file_name = gymtrack_app::export_logs(ctx)?;
            println!("{}", PathBuf::from(&ctx.config.logging.export_dir).join(file_name).display());
        }
        Commands::Clear => gymtrack_app::clear_logs(ctx),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Could not load .env file: {err}");
        }
    }

    let cli = Cli::parse();
    let config = load_config(cli.config.clone())?;

    if let Err(err) = observability::init_tracing(&config.logging) {
        eprintln!("{err}");
    }

    let ctx = AppContext::new_with_config(config).context("failed to initialize application")?;
    tracing::info!("GymTrack starting...");

    let outcome = run(cli, &ctx).await;
    ctx.shutdown().await?;
    outcome
}
