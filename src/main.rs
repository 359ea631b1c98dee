mod config;
mod domain;
mod exchanges;
mod preferences;
mod recorder;
mod trading;

use config::Config;
use domain::normalize_symbol;
use exchanges::Exchange;
use exchanges::binance::BinanceExchange;
use preferences::{FilePreferenceSource, PreferenceStore};
use recorder::{SqliteRecorder, SqliteRecorderConfig, TradeRecorder};
use std::env;
use std::sync::Arc;
use trading::OrderManager;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

struct CliArgs {
    config_path: String,
    style: Option<String>,
    symbol: Option<String>,
    recent: Option<i64>,
    list_styles: bool,
    reload_preferences: bool,
    dry_run: bool,
}

fn parse_args() -> CliArgs {
    let mut args = CliArgs {
        config_path: DEFAULT_CONFIG_PATH.to_string(),
        style: None,
        symbol: None,
        recent: None,
        list_styles: false,
        reload_preferences: false,
        dry_run: false,
    };

    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            args.config_path = path.to_string();
        } else if let Some(style) = arg.strip_prefix("--style=") {
            args.style = Some(style.to_string());
        } else if let Some(symbol) = arg.strip_prefix("--symbol=") {
            args.symbol = Some(symbol.to_string());
        } else if let Some(limit) = arg.strip_prefix("--recent=") {
            args.recent = limit.parse().ok();
        } else if arg == "--list-styles" {
            args.list_styles = true;
        } else if arg == "--reload-preferences" {
            args.reload_preferences = true;
        } else if arg == "--dry-run" {
            args.dry_run = true;
        } else {
            eprintln!("Unknown argument: {}", arg);
        }
    }

    args
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = parse_args();

    let config = match Config::load(&args.config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return;
        }
    };

    init_tracing(config.app.log_level.as_deref());

    info!(
        config = %args.config_path,
        env = %config.app.env,
        "{} starting",
        config.app.name
    );

    let preferences = Arc::new(PreferenceStore::new(Box::new(FilePreferenceSource::new(
        config.preferences.path.clone(),
    ))));

    if args.reload_preferences {
        let prefs = preferences.reload();
        info!(
            soft_risk = %prefs.soft_risk,
            hard_risk = %prefs.hard_risk,
            "risk preferences reloaded"
        );
    }

    let exchange = match BinanceExchange::from_config(&config) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            error!(error = %e, "Failed to create exchange");
            return;
        }
    };

    let mut manager = OrderManager::new(exchange.clone(), Arc::clone(&preferences));

    let mut recorder: Option<Arc<SqliteRecorder>> = None;
    if let Some(recorder_config) = config.recorder.as_ref().filter(|r| r.enabled) {
        let r = match SqliteRecorder::new(SqliteRecorderConfig {
            path: recorder_config.path.clone(),
            max_connections: recorder_config.max_connections,
        })
        .await
        {
            Ok(r) => Arc::new(r),
            Err(e) => {
                error!(error = %e, "Failed to initialize trade recorder");
                return;
            }
        };
        manager = manager.with_recorder(r.clone());

        match r.count().await {
            Ok(count) => info!(trades = count, "trade recorder ready"),
            Err(e) => warn!(error = %e, "failed to read trade count"),
        }
        recorder = Some(r);
    }

    if args.list_styles {
        for style in manager.available_order_styles() {
            println!("{}", style);
        }
        return;
    }

    if let Some(limit) = args.recent {
        match recorder {
            Some(r) => print_recent_trades(r.as_ref(), limit).await,
            None => eprintln!("Trade recorder is not enabled in the config"),
        }
        return;
    }

    let (style, symbol) = match (args.style.as_deref(), args.symbol.as_deref()) {
        (Some(style), Some(symbol)) => (style, symbol),
        _ => {
            eprintln!("Usage: riskdesk --style=<style> --symbol=<symbol> [--config=<path>] [--dry-run]");
            eprintln!("       riskdesk --list-styles | --recent=<n>");
            return;
        }
    };

    if args.dry_run {
        dry_run(&manager, &preferences, style, symbol);
        return;
    }

    info!(exchange = %exchange.name(), "checking exchange connectivity");
    if let Err(e) = exchange.ping().await {
        error!(error = %e, "exchange connectivity check failed");
        return;
    }

    match manager.execute_order(style, symbol).await {
        Ok(result) => {
            info!(
                order_id = %result.order_id,
                symbol = %result.symbol,
                quantity = %result.quantity,
                avg_price = %result.avg_price,
                notional = %result.notional,
                "trade completed"
            );
        }
        Err(e) => {
            error!(style = %style, symbol = %symbol, error = %e, "trade failed");
        }
    }
}

/// Prints the most recent recorded trades, newest first.
async fn print_recent_trades(recorder: &SqliteRecorder, limit: i64) {
    match recorder.recent(limit).await {
        Ok(trades) => {
            for trade in trades {
                println!(
                    "{}  {}  {}  qty={}  avg_price={}  notional={}  {:?}",
                    trade.executed_at.to_rfc3339(),
                    trade.style,
                    trade.symbol,
                    trade.quantity,
                    trade.avg_price,
                    trade.notional,
                    trade.status,
                );
            }
        }
        Err(e) => error!(error = %e, "failed to read recent trades"),
    }
}

/// Resolves the style and preferences without touching the exchange.
fn dry_run(manager: &OrderManager, preferences: &PreferenceStore, style: &str, symbol: &str) {
    if !manager.validate_order_style(style) {
        error!(style = %style, "unknown order style");
        return;
    }

    let parsed = match domain::OrderStyle::parse(style) {
        Some(s) => s,
        None => return,
    };

    let prefs = preferences.get();
    let fraction = prefs.risk_for(parsed.risk_level());

    info!(
        style = %parsed,
        symbol = %normalize_symbol(symbol),
        side = ?parsed.side(),
        risk_level = ?parsed.risk_level(),
        fraction = %fraction,
        "dry run: order would be sized with this fraction of the available balance"
    );
}
