//! Trade recording interfaces and implementations.
//!
//! The recorder is a best-effort collaborator: the order manager logs
//! recording failures but never fails a completed trade because of one.

mod sqlite;

pub use sqlite::{SqliteRecorder, SqliteRecorderConfig};

use async_trait::async_trait;

use crate::domain::OrderResult;

/// TradeRecorder receives a record of each executed order.
#[async_trait]
pub trait TradeRecorder: Send + Sync {
    /// RecordTrade persists one order result.
    async fn record_trade(&self, result: &OrderResult) -> Result<(), RecorderError>;

    /// Count returns the total number of recorded trades.
    async fn count(&self) -> Result<i64, RecorderError>;

    /// Recent returns up to `limit` most recent trades, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<OrderResult>, RecorderError>;
}

/// RecorderError represents errors that can occur while recording trades.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
