//! Spreadlab - Pair Trading Backtester
//!
//! Fetches daily stock history and backtests ratio and spread mean reversion.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use spreadlab::adapters::cli::{BacktestCmd, CliApp, Command, FetchCmd, LoadCmd};
use spreadlab::adapters::export::{export_json, export_trades_csv};
use spreadlab::adapters::storage::JsonFilePriceStore;
use spreadlab::adapters::yahoo::{YahooChartClient, YahooConfig};
use spreadlab::application::{BacktestRequest, BacktestService, IngestionService, load_symbols};
use spreadlab::config::{load_config_or_default, Config};
use spreadlab::domain::{BacktestResult, SignalMode};
use spreadlab::ports::PriceStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (SPREADLAB_DATA_DIR, SPREADLAB_QUOTE_URL)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let config = load_config_or_default(&app.config)
        .with_context(|| format!("Failed to load configuration from {}", app.config.display()))?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Fetch(cmd) => fetch_command(cmd, &config).await,
        Command::Load(cmd) => load_command(cmd, &config).await,
        Command::List => list_command(&config).await,
        Command::Backtest(cmd) => backtest_command(cmd, &config).await,
    }
}

fn init_logging(verbose: bool, debug: bool, config_level: &str) -> Result<()> {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        config_level
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{}'", level))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn open_store(config: &Config) -> JsonFilePriceStore {
    let data_dir = config.storage.resolved_data_dir();
    tracing::debug!("Using price store at {}", data_dir.display());
    JsonFilePriceStore::new(data_dir)
}

async fn fetch_command(cmd: FetchCmd, config: &Config) -> Result<()> {
    let provider = YahooChartClient::with_config(YahooConfig {
        api_base_url: config.provider.resolved_api_url(),
        range: config.provider.range.clone(),
        timeout: config.provider.timeout(),
        max_retries: config.provider.max_retries,
    })
    .context("Failed to create quote client")?;

    let service = IngestionService::new(Arc::new(provider), Arc::new(open_store(config)));
    let report = service.fetch_symbols(&cmd.symbols).await?;

    for (symbol, count) in &report.succeeded {
        println!("{:<8} {:>6} bars", symbol, count);
    }
    for (symbol, reason) in &report.failed {
        println!("{:<8} failed: {}", symbol, reason);
    }
    println!("{}", report);

    if report.all_failed() {
        bail!("No symbols could be fetched");
    }
    Ok(())
}

async fn load_command(cmd: LoadCmd, config: &Config) -> Result<()> {
    let store = open_store(config);
    let loaded = load_symbols(&store, &cmd.symbols).await?;

    let mut found = 0;
    for series in &loaded {
        if series.is_empty() {
            println!("{}: no stored data", series.symbol);
            continue;
        }
        found += 1;

        let first = series.bars[0].date;
        let last = series.bars[series.bars.len() - 1].date;
        println!("{}: {} bars, {} to {}", series.symbol, series.bars.len(), first, last);

        let skip = series.bars.len().saturating_sub(cmd.tail);
        for bar in &series.bars[skip..] {
            println!("  {}", bar);
        }
    }

    println!("Loaded data for {} symbol{}", found, if found == 1 { "" } else { "s" });
    Ok(())
}

async fn list_command(config: &Config) -> Result<()> {
    let store = open_store(config);
    let symbols = store.symbols().await.context("Failed to list stored symbols")?;

    if symbols.is_empty() {
        println!("No stored symbols in {}", store.data_dir().display());
        return Ok(());
    }
    for symbol in symbols {
        println!("{}", symbol);
    }
    Ok(())
}

async fn backtest_command(cmd: BacktestCmd, config: &Config) -> Result<()> {
    let mut params = config.backtest.params(cmd.from, cmd.to);
    if let Some(entry_z) = cmd.entry_z {
        params.entry_z = entry_z;
    }
    if let Some(exit_z) = cmd.exit_z {
        params.exit_z = exit_z;
    }
    if let Some(window) = cmd.window {
        params.window = window;
    }
    if let Some(alignment) = cmd.align {
        params.alignment = alignment;
    }

    let service = BacktestService::new(Arc::new(open_store(config)));
    let request = BacktestRequest::new(cmd.stock_a, cmd.stock_b, cmd.mode, params);
    let result = service.run(&request).await?;

    if result.is_empty() {
        println!(
            "No overlapping price data for {}/{} between {} and {}",
            request.stock_a, request.stock_b, cmd.from, cmd.to
        );
    }

    if cmd.show_signals {
        print_signals(&result);
    }
    print_trades(&result);
    print_summary(&result);

    if let Some(path) = &cmd.export_json {
        export_json(path, &result)
            .with_context(|| format!("Failed to export JSON to {}", path.display()))?;
    }
    if let Some(path) = &cmd.export_csv {
        export_trades_csv(path, &result.trades)
            .with_context(|| format!("Failed to export CSV to {}", path.display()))?;
    }

    Ok(())
}

fn print_signals(result: &BacktestResult) {
    println!(
        "{:<10} {:>10} {:>10} {:>12} {:>8} {:>8}",
        "Date", "Close A", "Close B", "Signal", "Z", "Hedge"
    );
    for point in &result.signal_series {
        let hedge = point
            .hedge_ratio
            .map(|h| format!("{:.4}", h))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:>10.2} {:>10.2} {:>12.4} {:>8.2} {:>8}",
            point.date, point.stock_a_close, point.stock_b_close, point.signal_value, point.z_score, hedge
        );
    }
    println!();
}

fn print_trades(result: &BacktestResult) {
    if result.trades.is_empty() {
        println!("No trades");
        return;
    }

    // Ratio profits are percentages of the entry ratio, spread profits are raw spread units
    let unit = match result.mode {
        SignalMode::Ratio => "%",
        SignalMode::Spread => "",
    };

    println!(
        "{:<10} {:<10} {:<5} {:>5} {:>10} {:>10} {:<15} {:>18}",
        "Entry", "Exit", "Type", "Days", "Profit", "Drawdown", "Reason", "Hedge (chg %)"
    );
    for trade in &result.trades {
        let hedge = trade
            .hedge
            .map(|h| {
                format!(
                    "{:.3}->{:.3} ({:+.1})",
                    h.entry_hedge_ratio, h.exit_hedge_ratio, h.hedge_ratio_change_pct
                )
            })
            .unwrap_or_default();
        println!(
            "{:<10} {:<10} {:<5} {:>5} {:>9.2}{:1} {:>9.2}{:1} {:<15} {:>18}",
            trade.entry_date,
            trade.exit_date,
            trade.trade_type.to_string(),
            trade.holding_period_days,
            trade.profit,
            unit,
            trade.max_drawdown,
            unit,
            trade.exit_reason.to_string(),
            hedge
        );
    }
    println!();
}

fn print_summary(result: &BacktestResult) {
    let summary = &result.summary;
    println!("Total trades:        {}", summary.total_trades);
    println!("Profitable trades:   {}", summary.profitable_trades);
    println!("Losing trades:       {}", summary.losing_trades());
    println!("Win rate:            {:.2}%", summary.win_rate_pct);
    println!("Avg profit/trade:    {:.2}", summary.avg_profit_per_trade);
}
