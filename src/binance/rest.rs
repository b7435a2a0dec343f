use anyhow::{Context, Result};
use std::time::Duration;

use crate::error::FetchError;
use crate::model::tick::{normalize_symbol, Tick};
use crate::pipeline::PriceSource;

use super::types::{BinanceApiErrorResponse, TickerPriceResponse};

/// Unauthenticated client for the Binance spot market-data endpoints.
pub struct BinanceRestClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl BinanceRestClient {
    pub fn new(base_url: &str, request_timeout_ms: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_millis(request_timeout_ms),
        }
    }

    pub fn ticker_price_url(&self, symbol: &str) -> String {
        format!(
            "{}/api/v3/ticker/price?symbol={}",
            self.base_url,
            normalize_symbol(symbol)
        )
    }

    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/api/v3/ping", self.base_url);
        self.http
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .context("ping failed")?
            .error_for_status()
            .context("ping returned error status")?;
        Ok(())
    }

    pub async fn ticker_price(&self, symbol: &str) -> Result<TickerPriceResponse, FetchError> {
        let url = self.ticker_price_url(symbol);
        let resp = self
            .http
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        parse_ticker_price(&body)
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                timeout_ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            FetchError::Http(err)
        }
    }
}

impl PriceSource for BinanceRestClient {
    async fn fetch_tick(&self, symbol: &str) -> Result<Tick, FetchError> {
        let quote = self.ticker_price(symbol).await?;
        Ok(Tick::observed_now(symbol, quote.price))
    }
}

/// Map a non-2xx response to a Binance API error when the body carries one.
pub fn error_from_body(status: u16, body: &str) -> FetchError {
    match serde_json::from_str::<BinanceApiErrorResponse>(body) {
        Ok(err) => FetchError::BinanceApi {
            code: err.code,
            msg: err.msg,
        },
        Err(_) => FetchError::Status {
            status,
            body: body.to_string(),
        },
    }
}

/// Decode a ticker body, rejecting prices that cannot be a market quote.
pub fn parse_ticker_price(body: &str) -> Result<TickerPriceResponse, FetchError> {
    let quote: TickerPriceResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Payload(e.to_string()))?;
    if !quote.price.is_finite() || quote.price < 0.0 {
        return Err(FetchError::Payload(format!(
            "invalid price {} for {}",
            quote.price, quote.symbol
        )));
    }
    Ok(quote)
}
