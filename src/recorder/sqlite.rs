//! SQLite implementation of TradeRecorder.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

use crate::domain::{OrderResult, OrderSide, OrderStatus, OrderStyle, RiskLevel};
use crate::recorder::{RecorderError, TradeRecorder};

/// SqliteRecorder implements TradeRecorder using SQLite.
pub struct SqliteRecorder {
    pool: Pool<Sqlite>,
}

/// SqliteRecorderConfig holds SQLite recorder configuration.
#[derive(Debug, Clone)]
pub struct SqliteRecorderConfig {
    /// Path to the SQLite database file.
    pub path: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
}

impl SqliteRecorder {
    /// Creates a new SQLite recorder instance.
    pub async fn new(config: SqliteRecorderConfig) -> Result<Self, RecorderError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let recorder = Self { pool };

        recorder.migrate().await?;

        info!(path = %config.path, "SQLite trade recorder initialized");
        Ok(recorder)
    }

    /// Runs database migrations to create the schema.
    async fn migrate(&self) -> Result<(), RecorderError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trades (
                order_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                style TEXT NOT NULL,
                side TEXT NOT NULL,
                risk_level TEXT NOT NULL,
                risk_fraction TEXT NOT NULL,
                status TEXT NOT NULL,
                quantity TEXT NOT NULL,
                avg_price TEXT NOT NULL,
                notional TEXT NOT NULL,
                executed_at TEXT NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_trades_symbol ON trades(symbol)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_trades_executed_at ON trades(executed_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl TradeRecorder for SqliteRecorder {
    async fn record_trade(&self, result: &OrderResult) -> Result<(), RecorderError> {
        sqlx::query(
            r#"
            INSERT INTO trades (
                order_id, symbol, style, side, risk_level, risk_fraction,
                status, quantity, avg_price, notional, executed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&result.order_id)
        .bind(&result.symbol)
        .bind(result.style.as_str())
        .bind(side_str(result.side))
        .bind(level_str(result.risk_level))
        .bind(result.risk_fraction.to_string())
        .bind(status_str(result.status))
        .bind(result.quantity.to_string())
        .bind(result.avg_price.to_string())
        .bind(result.notional.to_string())
        .bind(result.executed_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(
            order_id = %result.order_id,
            symbol = %result.symbol,
            "Trade recorded"
        );

        Ok(())
    }

    async fn count(&self) -> Result<i64, RecorderError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM trades")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    async fn recent(&self, limit: i64) -> Result<Vec<OrderResult>, RecorderError> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, symbol, style, side, risk_level, risk_fraction,
                status, quantity, avg_price, notional, executed_at
            FROM trades ORDER BY executed_at DESC LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_trade_row).collect()
    }
}

fn side_str(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "buy",
        OrderSide::Sell => "sell",
    }
}

fn level_str(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Soft => "soft",
        RiskLevel::Hard => "hard",
    }
}

fn status_str(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Filled => "filled",
        OrderStatus::PartiallyFilled => "partially_filled",
        OrderStatus::Rejected => "rejected",
    }
}

fn parse_trade_row(row: &sqlx::sqlite::SqliteRow) -> Result<OrderResult, RecorderError> {
    let style_token: String = row.get("style");
    let style = OrderStyle::parse(&style_token)
        .ok_or_else(|| RecorderError::InvalidData(format!("unknown style {:?}", style_token)))?;

    let side: String = row.get("side");
    let side = match side.as_str() {
        "buy" => OrderSide::Buy,
        "sell" => OrderSide::Sell,
        other => {
            return Err(RecorderError::InvalidData(format!(
                "unknown side {:?}",
                other
            )));
        }
    };

    let level: String = row.get("risk_level");
    let risk_level = match level.as_str() {
        "soft" => RiskLevel::Soft,
        "hard" => RiskLevel::Hard,
        other => {
            return Err(RecorderError::InvalidData(format!(
                "unknown risk level {:?}",
                other
            )));
        }
    };

    let status: String = row.get("status");
    let status = match status.as_str() {
        "filled" => OrderStatus::Filled,
        "partially_filled" => OrderStatus::PartiallyFilled,
        "rejected" => OrderStatus::Rejected,
        _ => OrderStatus::Pending,
    };

    Ok(OrderResult {
        order_id: row.get("order_id"),
        symbol: row.get("symbol"),
        style,
        side,
        risk_level,
        risk_fraction: parse_decimal(row, "risk_fraction")?,
        status,
        quantity: parse_decimal(row, "quantity")?,
        avg_price: parse_decimal(row, "avg_price")?,
        notional: parse_decimal(row, "notional")?,
        executed_at: parse_timestamp(row, "executed_at")?,
    })
}

fn parse_decimal(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<Decimal, RecorderError> {
    let raw: String = row.get(column);
    Decimal::from_str(&raw)
        .map_err(|e| RecorderError::InvalidData(format!("{}: {}", column, e)))
}

fn parse_timestamp(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<DateTime<Utc>, RecorderError> {
    let raw: String = row.get(column);
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RecorderError::InvalidData(format!("{}: {}", column, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStyle;
    use tempfile::tempdir;

    fn sample_result() -> OrderResult {
        OrderResult {
            order_id: "12345".to_string(),
            symbol: "BTCUSDT".to_string(),
            style: OrderStyle::HardBuy,
            side: OrderSide::Buy,
            risk_level: RiskLevel::Hard,
            risk_fraction: Decimal::new(20, 2),
            status: OrderStatus::Filled,
            quantity: Decimal::new(25, 3),
            avg_price: Decimal::new(40_000, 0),
            notional: Decimal::new(1_000, 0),
            executed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_record_and_count() {
        let dir = tempdir().unwrap();
        let config = SqliteRecorderConfig {
            path: dir.path().join("trades.db").to_string_lossy().to_string(),
            max_connections: 1,
        };
        let recorder = SqliteRecorder::new(config).await.unwrap();

        assert_eq!(recorder.count().await.unwrap(), 0);

        recorder.record_trade(&sample_result()).await.unwrap();
        assert_eq!(recorder.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recent_round_trips_fields() {
        let dir = tempdir().unwrap();
        let config = SqliteRecorderConfig {
            path: dir.path().join("trades.db").to_string_lossy().to_string(),
            max_connections: 1,
        };
        let recorder = SqliteRecorder::new(config).await.unwrap();

        let result = sample_result();
        recorder.record_trade(&result).await.unwrap();

        let recent = recorder.recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].order_id, result.order_id);
        assert_eq!(recent[0].style, OrderStyle::HardBuy);
        assert_eq!(recent[0].quantity, result.quantity);
        assert_eq!(recent[0].notional, result.notional);
        assert_eq!(recent[0].status, OrderStatus::Filled);
    }
}
