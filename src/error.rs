use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid operator input: {0}")]
    InvalidInput(String),
}

/// Why a single price lookup produced no tick this cycle.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("binance API error (code {code}): {msg}")]
    BinanceApi { code: i64, msg: String },

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Payload(String),
}

impl FetchError {
    /// Short label used in log lines and the dashboard log panel.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout { .. } => "timeout",
            FetchError::Http(_) => "http",
            FetchError::BinanceApi { .. } => "api",
            FetchError::Status { .. } => "status",
            FetchError::Payload(_) => "payload",
        }
    }
}
