//! HTTP client for the Binance Spot API.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use hmac::{Hmac, Mac};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ExchangeConfig;

/// Default receive window for signed requests in milliseconds.
const DEFAULT_RECEIVE_WINDOW: i64 = 5000;

/// Production Binance HTTP API endpoint.
const BASE_HTTP_API_URL: &str = "https://api.binance.com";

/// Spot testnet HTTP API endpoint.
const TESTNET_HTTP_API_URL: &str = "https://testnet.binance.vision";

/// Default rate limit (requests per minute).
const DEFAULT_RATE_LIMIT: i64 = 1200;

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Binance API error.
#[derive(Debug, Error)]
#[error("binance api error {code}: {message}")]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("rate limit exceeded: {current}/{limit} per minute")]
    RateLimitExceeded { current: i64, limit: i64 },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Configuration for creating a new Client.
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub rate_limit: i64,
    pub receive_window: i64,
}

impl ClientConfig {
    pub fn new(api_key: String, api_secret: String, rate_limit: i64) -> Self {
        Self {
            base_url: BASE_HTTP_API_URL.to_string(),
            api_key,
            api_secret,
            rate_limit: if rate_limit > 0 {
                rate_limit
            } else {
                DEFAULT_RATE_LIMIT
            },
            receive_window: DEFAULT_RECEIVE_WINDOW,
        }
    }
}

struct RateLimitState {
    window_start: Instant,
}

/// HTTP client for the Binance Spot API.
/// Handles request signing, rate limiting, and error handling.
pub struct Client {
    config: ClientConfig,
    http_client: HttpClient,
    request_count: AtomicI64,
    rate_limit_state: Mutex<RateLimitState>,
}

impl Client {
    /// Creates a new Binance API client.
    pub fn new(config: ClientConfig) -> Self {
        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build http client");

        Self {
            config,
            http_client,
            request_count: AtomicI64::new(0),
            rate_limit_state: Mutex::new(RateLimitState {
                window_start: Instant::now(),
            }),
        }
    }

    /// Creates a new Binance API client from exchange config.
    pub fn from_config(exchange_config: &ExchangeConfig) -> Self {
        let mut config = ClientConfig::new(
            exchange_config.api_key.clone(),
            exchange_config.api_secret.clone(),
            exchange_config
                .rate_limit
                .map(i64::from)
                .unwrap_or(DEFAULT_RATE_LIMIT),
        );
        if exchange_config.testnet {
            config.base_url = TESTNET_HTTP_API_URL.to_string();
        }
        Self::new(config)
    }

    /// Creates a hex-encoded HMAC-SHA256 signature over the query string.
    ///
    /// Binance signs the full urlencoded parameter string (including
    /// `timestamp` and `recvWindow`) and expects the signature appended
    /// as the final `signature` parameter.
    fn sign(&self, payload: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.config.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Sends an HTTP request to the Binance API.
    /// If signed is true, the request is timestamped, signed, and sent
    /// with the API key header.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<HashMap<String, String>>,
        signed: bool,
    ) -> Result<Vec<u8>> {
        self.check_rate_limit()?;

        let mut params = params.unwrap_or_default();

        if signed {
            params.insert(
                "timestamp".to_string(),
                chrono::Utc::now().timestamp_millis().to_string(),
            );
            params.insert(
                "recvWindow".to_string(),
                self.config.receive_window.to_string(),
            );
        }

        // Sort parameters by key so the signed payload is deterministic
        let mut sorted_params: Vec<_> = params.iter().collect();
        sorted_params.sort_by(|a, b| a.0.cmp(b.0));

        let mut query: String = sorted_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        if signed {
            let signature = self.sign(&query);
            if query.is_empty() {
                query = format!("signature={}", signature);
            } else {
                query = format!("{}&signature={}", query, signature);
            }
        }

        let url = if query.is_empty() {
            format!("{}{}", self.config.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.config.base_url, endpoint, query)
        };

        let mut request = self.http_client.request(method.clone(), &url);

        if signed {
            request = request.header("X-MBX-APIKEY", self.config.api_key.as_str());
        }

        debug!(
            method = %method,
            endpoint = %endpoint,
            signed = signed,
            "sending request"
        );

        let response = request.send().await?;
        self.increment_request_count();

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_client_error() || status.is_server_error() {
            return Err(self.parse_error_response(status, &body));
        }

        Ok(body.to_vec())
    }

    /// Verifies we haven't exceeded the rate limit.
    fn check_rate_limit(&self) -> Result<()> {
        let mut state = match self.rate_limit_state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Reset counter every minute
        if state.window_start.elapsed() > Duration::from_secs(60) {
            self.request_count.store(0, Ordering::SeqCst);
            state.window_start = Instant::now();
        }

        let current = self.request_count.load(Ordering::SeqCst);
        if current >= self.config.rate_limit {
            return Err(ClientError::RateLimitExceeded {
                current,
                limit: self.config.rate_limit,
            });
        }

        Ok(())
    }

    /// Increments the request counter.
    fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Creates a ClientError from an error response.
    fn parse_error_response(&self, status: StatusCode, body: &[u8]) -> ClientError {
        #[derive(Deserialize)]
        struct ErrorResponse {
            code: Option<i32>,
            msg: Option<String>,
        }

        let api_err = match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(resp) => ApiError {
                code: resp.code.unwrap_or(status.as_u16() as i32),
                message: resp
                    .msg
                    .unwrap_or_else(|| String::from_utf8_lossy(body).to_string()),
            },
            Err(_) => ApiError {
                code: status.as_u16() as i32,
                message: String::from_utf8_lossy(body).to_string(),
            },
        };

        warn!(code = api_err.code, message = %api_err.message, "api error");

        ClientError::Api(api_err)
    }

    /// Checks connectivity to the Binance API.
    pub async fn ping(&self) -> Result<()> {
        self.request(Method::GET, "/api/v3/ping", None, false)
            .await?;
        Ok(())
    }

    /// Fetches the current server time from Binance.
    pub async fn get_server_time(&self) -> Result<chrono::DateTime<chrono::Utc>> {
        let body = self
            .request(Method::GET, "/api/v3/time", None, false)
            .await?;

        #[derive(Deserialize)]
        struct ServerTimeResponse {
            #[serde(rename = "serverTime")]
            server_time: i64,
        }

        let resp: ServerTimeResponse = serde_json::from_slice(&body)?;
        Ok(chrono::DateTime::from_timestamp_millis(resp.server_time).unwrap_or_default())
    }
}
