use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use portfolio_tracker_core::format::{format_currency, format_percentage};
use portfolio_tracker_core::models::settings::{QuoteSourceKind, Settings, ALPHAVANTAGE_KEY};
use portfolio_tracker_core::models::view::PortfolioView;
use portfolio_tracker_core::PortfolioTracker;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "portfolio-tracker")]
#[command(about = "Track stock holdings, daily portfolio value and savings goals")]
struct Cli {
    /// Path to a JSON settings file. Defaults apply when it does not exist.
    #[arg(short, long, default_value = "portfolio-tracker.json")]
    config: PathBuf,

    /// Override the database path from the settings file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Quote sources in fallback order (static, alpha_vantage, yahoo_finance)
    #[arg(long = "source", value_parser = parse_source_kind)]
    sources: Vec<QuoteSourceKind>,

    /// Alpha Vantage API key
    #[arg(long, env = "ALPHAVANTAGE_API_KEY")]
    api_key: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch fresh quotes, persist them and record today's snapshot
    Refresh {
        /// Wait for the warm-up delay first, as on application start
        #[arg(long)]
        startup: bool,
    },
    /// Show the stored portfolio without contacting the quote source
    Show,
    /// Set the number of shares held for a symbol
    EditShares { symbol: String, shares: String },
    /// Add a savings goal
    AddGoal {
        name: String,
        target: String,
        /// Deadline, e.g. 2026-06-30
        deadline: String,
    },
    /// Set the saved amount of a goal
    UpdateGoal { id: i64, amount: String },
    /// List savings goals
    Goals,
    /// Stored daily snapshots, oldest first
    History,
    /// Sector allocation of the stored holdings
    Risk,
    /// Rebalancing and diversification suggestions
    Recommendations,
    /// Compare portfolio metrics against a market benchmark
    Compare {
        #[arg(default_value = "S&P 500")]
        benchmark: String,
    },
    /// Latest quote and recent daily closes for one symbol
    Detail { symbol: String },
    /// Portfolio value per trading day, rebuilt from daily closes
    PortfolioHistory,
    /// Write the effective settings to the config path
    SaveConfig,
}

fn parse_source_kind(raw: &str) -> Result<QuoteSourceKind, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "static" => Ok(QuoteSourceKind::Static),
        "alpha_vantage" | "alphavantage" => Ok(QuoteSourceKind::AlphaVantage),
        "yahoo_finance" | "yahoo" => Ok(QuoteSourceKind::YahooFinance),
        other => Err(format!("unknown quote source '{other}'")),
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = if cli.config.exists() {
        Settings::load_from_file(&cli.config)
            .with_context(|| format!("Failed to load settings: {}", cli.config.display()))?
    } else {
        Settings::default()
    };

    if let Some(db) = &cli.db {
        settings.database_path = db.to_string_lossy().into_owned();
    }
    if !cli.sources.is_empty() {
        settings.quote_sources = cli.sources.clone();
    }
    if let Some(key) = &cli.api_key {
        settings.set_api_key(ALPHAVANTAGE_KEY, key)?;
    }
    settings.validate()?;
    Ok(settings)
}

/// A token cancelled on Ctrl-C.
fn cancel_on_ctrl_c(tracker: &PortfolioTracker) -> CancellationToken {
    let token = tracker.cycle_token();
    let canceller = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            canceller.cancel();
        }
    });
    token
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_view(view: &PortfolioView) {
    println!(
        "{:<8} {:>12} {:>10} {:>9} {:>8} {:>14}",
        "Symbol", "Price", "Change", "Change %", "Shares", "Value"
    );
    for h in &view.holdings {
        let pct = h.change_percent.parse::<f64>().ok();
        println!(
            "{:<8} {:>12} {:>10} {:>9} {:>8} {:>14}",
            h.symbol,
            format_currency(Some(h.price)),
            format_currency(Some(h.change)),
            format_percentage(pct),
            h.shares_or_zero(),
            format_currency(Some(h.position_value())),
        );
    }
    println!();
    println!(
        "Total value: {}  Change: {} ({})",
        format_currency(Some(view.summary.total_value)),
        format_currency(Some(view.summary.total_change)),
        format_percentage(Some(view.summary.change_percent)),
    );
    if let Some(error) = &view.error {
        println!("Warning: {error}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    info!(
        db = %settings.database_path,
        sources = ?settings.quote_sources,
        "Starting portfolio tracker"
    );
    let tracker = PortfolioTracker::from_settings(settings)?;

    match &cli.command {
        Command::Refresh { startup } => {
            let token = cancel_on_ctrl_c(&tracker);
            let view = if *startup {
                tracker.startup_with(&token).await?
            } else {
                tracker.refresh_with(&token).await?
            };
            if cli.json {
                print_json(&view)?;
            } else {
                print_view(&view);
            }
        }
        Command::Show => {
            let view = tracker.reload().await;
            if cli.json {
                print_json(&view)?;
            } else {
                print_view(&view);
            }
        }
        Command::EditShares { symbol, shares } => {
            let view = tracker.edit_shares(symbol, shares).await?;
            if cli.json {
                print_json(&view)?;
            } else {
                print_view(&view);
            }
        }
        Command::AddGoal {
            name,
            target,
            deadline,
        } => {
            let id = tracker.add_goal(name, target, deadline).await?;
            println!("Added goal {id}: {name}");
        }
        Command::UpdateGoal { id, amount } => {
            if tracker.update_goal_progress(*id, amount).await? == 0 {
                bail!("No goal with id {id}");
            }
            println!("Updated goal {id}");
        }
        Command::Goals => {
            let goals = tracker.goals().await;
            if cli.json {
                print_json(&goals)?;
            } else {
                for g in &goals {
                    println!(
                        "[{}] {:<22} {:>16} of {:>16} ({:>5.1}%) by {}",
                        g.id,
                        g.name,
                        format_currency(Some(g.current)),
                        format_currency(Some(g.target)),
                        g.progress_pct(),
                        g.deadline,
                    );
                }
            }
        }
        Command::History => {
            let history = tracker.history().await;
            if cli.json {
                print_json(&history)?;
            } else {
                for s in &history {
                    println!(
                        "{}  {:>14}  {:>12}  {}",
                        s.date,
                        format_currency(Some(s.total_value)),
                        format_currency(Some(s.total_change)),
                        format_percentage(Some(s.change_percent)),
                    );
                }
            }
        }
        Command::Risk => {
            let report = tracker.risk_report().await;
            if cli.json {
                print_json(&report)?;
            } else {
                println!("Total value: {}", format_currency(Some(report.total_value)));
                for a in &report.sector_allocation {
                    println!("{:<20} {:>6}%", a.sector, a.percentage);
                }
            }
        }
        Command::Recommendations => {
            let recs = tracker.recommendations().await;
            if cli.json {
                print_json(&recs)?;
            } else {
                for r in &recs {
                    println!("[{:?}] {}: {} ({})", r.kind, r.title, r.description, r.action);
                }
            }
        }
        Command::Compare { benchmark } => {
            let cmp = tracker.compare_to_benchmark(benchmark)?;
            if cli.json {
                print_json(&cmp)?;
            } else {
                println!("{:<20} {:>10} {:>10}", "Metric", "You", cmp.benchmark);
                for row in &cmp.rows {
                    let mark = if row.is_favorable { "+" } else { "-" };
                    println!(
                        "{:<20} {:>10} {:>10} {mark}",
                        row.label, row.user_value, row.benchmark_value
                    );
                }
            }
        }
        Command::Detail { symbol } => {
            let detail = tracker.symbol_detail(symbol).await?;
            if cli.json {
                print_json(&detail)?;
            } else {
                let q = &detail.quote;
                println!(
                    "{} {} {} ({}%) vol {} as of {}",
                    q.symbol,
                    format_currency(Some(q.price)),
                    format_currency(Some(q.change)),
                    q.change_percent,
                    q.volume,
                    q.last_updated,
                );
                for bar in &detail.series {
                    println!("{}  {:>12}", bar.date, format_currency(Some(bar.close)));
                }
            }
        }
        Command::PortfolioHistory => {
            let points = tracker.portfolio_history().await?;
            if cli.json {
                print_json(&points)?;
            } else {
                for p in &points {
                    println!("{}  {:>14}", p.date, format_currency(Some(p.value)));
                }
            }
        }
        Command::SaveConfig => {
            tracker
                .settings()
                .save_to_file(&cli.config)
                .with_context(|| format!("Failed to write settings: {}", cli.config.display()))?;
            println!("Settings written to {}", cli.config.display());
        }
    }

    Ok(())
}
