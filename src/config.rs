use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::analytics::{AnalysisSettings, StdDevKind};
use crate::error::AppError;
use crate::model::tick::normalize_symbol;

/// Shipped defaults, used when `config/default.toml` is absent.
pub const EMBEDDED_DEFAULT: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub binance: BinanceConfig,
    pub analytics: AnalyticsConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub rest_base_url: String,
    pub symbols: Vec<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    pub base_symbol: String,
    pub quote_symbol: String,
    pub buffer_capacity: usize,
    pub bucket_interval: String,
    pub min_ticks: usize,
    pub min_aligned_rows: usize,
    pub alert_threshold: f64,
    #[serde(default)]
    pub std_dev: StdDevKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_interval: String,
    pub input_poll_ms: u64,
    pub recent_ticks: usize,
    pub log_lines: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_request_timeout_ms() -> u64 {
    2_000
}

/// Parse an interval string (e.g. "1s", "1m", "1h", "1d", "1w", "1M") into milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<u64> {
    if s.len() < 2 {
        bail!("invalid interval '{}': expected format like '1s'", s);
    }

    let (num_str, suffix) = s.split_at(s.len() - 1);
    let n: u64 = num_str.parse().with_context(|| {
        format!(
            "invalid interval '{}': quantity must be a positive integer",
            s
        )
    })?;
    if n == 0 {
        bail!("invalid interval '{}': quantity must be > 0", s);
    }

    let unit_ms = match suffix {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 7 * 86_400_000,
        "M" => 30 * 86_400_000,
        _ => bail!(
            "invalid interval '{}': unsupported suffix '{}', expected one of s/m/h/d/w/M",
            s,
            suffix
        ),
    };

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

impl BinanceConfig {
    /// Normalized, de-duplicated symbol catalog in configured order.
    pub fn catalog(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for sym in &self.symbols {
            let s = normalize_symbol(sym);
            if !s.is_empty() && !out.iter().any(|v| v == &s) {
                out.push(s);
            }
        }
        out
    }
}

impl AnalyticsConfig {
    pub fn bucket_ms(&self) -> Result<u64> {
        parse_interval_ms(&self.bucket_interval)
    }

    pub fn pair(&self) -> (String, String) {
        (
            normalize_symbol(&self.base_symbol),
            normalize_symbol(&self.quote_symbol),
        )
    }
}

impl UiConfig {
    pub fn refresh_ms(&self) -> Result<u64> {
        parse_interval_ms(&self.refresh_interval)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let mut config = if config_path.exists() {
            Self::load_from(config_path)?
        } else {
            Self::from_toml_str(EMBEDDED_DEFAULT).context("embedded default config is invalid")?
        };

        if let Ok(url) = std::env::var("BINANCE_REST_BASE_URL") {
            if !url.trim().is_empty() {
                config.binance.rest_base_url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let catalog = self.binance.catalog();
        if catalog.is_empty() {
            return Err(AppError::Config("binance.symbols must not be empty".to_string()));
        }
        let (base, quote) = self.analytics.pair();
        if base == quote {
            return Err(AppError::Config(format!(
                "analytics pair must use two distinct symbols, got {} twice",
                base
            )));
        }
        for sym in [&base, &quote] {
            if !catalog.contains(sym) {
                return Err(AppError::Config(format!(
                    "analytics symbol {} is not in binance.symbols",
                    sym
                )));
            }
        }
        if self.analytics.buffer_capacity == 0 {
            return Err(AppError::Config(
                "analytics.buffer_capacity must be > 0".to_string(),
            ));
        }
        if self.analytics.min_aligned_rows == 0 {
            return Err(AppError::Config(
                "analytics.min_aligned_rows must be > 0".to_string(),
            ));
        }
        if !(self.analytics.alert_threshold.is_finite() && self.analytics.alert_threshold > 0.0) {
            return Err(AppError::Config(format!(
                "analytics.alert_threshold must be positive, got {}",
                self.analytics.alert_threshold
            )));
        }
        self.analytics
            .bucket_ms()
            .map_err(|e| AppError::Config(format!("analytics.bucket_interval: {:#}", e)))?;
        self.ui
            .refresh_ms()
            .map_err(|e| AppError::Config(format!("ui.refresh_interval: {:#}", e)))?;
        Ok(())
    }

    /// Analytics knobs for the pipeline. Only valid after [`Config::validate`].
    pub fn analysis_settings(&self) -> Result<AnalysisSettings> {
        Ok(AnalysisSettings {
            bucket_ms: self.analytics.bucket_ms()?,
            min_aligned_rows: self.analytics.min_aligned_rows,
            std_dev: self.analytics.std_dev,
            threshold: self.analytics.alert_threshold,
        })
    }
}
