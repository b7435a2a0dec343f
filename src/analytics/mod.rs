//! Tick alignment, spread/z-score statistics and the alert rule.
//!
//! Every function here is a pure projection of a tick snapshot; nothing keeps
//! state between refresh cycles.

pub mod alert;
pub mod align;
pub mod spread;

use std::fmt;

use crate::model::tick::Tick;

pub use alert::{evaluate, AlertState};
pub use align::{align, forward_fill, AlignedRow, AlignedTable};
pub use spread::{SpreadPoint, SpreadSeries, StdDevKind};

/// Normal warm-up states in which a cycle stops before producing analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Waiting {
    Ticks { collected: usize, needed: usize },
    AlignedData { base: String, quote: String },
    SpreadVariance,
}

impl fmt::Display for Waiting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waiting::Ticks { .. } => write!(f, "Collecting live data… please wait a few seconds."),
            Waiting::AlignedData { base, quote } => {
                write!(f, "Waiting for aligned {} & {} data…", base, quote)
            }
            Waiting::SpreadVariance => write!(f, "Waiting for spread variance…"),
        }
    }
}

/// Latest price of a pair leg and its share of the pair total.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceShare {
    pub symbol: String,
    pub price: f64,
    pub share_pct: f64,
}

/// Price split of the latest aligned row across `symbols`.
/// Empty when any symbol is missing from that row or the total is not positive.
pub fn price_shares(table: &AlignedTable, symbols: &[&str]) -> Vec<PriceShare> {
    let Some(latest) = table.latest() else {
        return Vec::new();
    };
    let prices: Option<Vec<f64>> = symbols.iter().map(|s| latest.price(s)).collect();
    let Some(prices) = prices else {
        return Vec::new();
    };
    let total: f64 = prices.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }
    symbols
        .iter()
        .zip(prices)
        .map(|(symbol, price)| PriceShare {
            symbol: symbol.to_string(),
            price,
            share_pct: price * 100.0 / total,
        })
        .collect()
}

/// Everything one completed cycle hands to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub table: AlignedTable,
    pub spread: SpreadSeries,
    pub shares: Vec<PriceShare>,
    pub alert: AlertState,
}

/// Run alignment, spread/z-score and the alert rule over a tick snapshot
/// that has already passed the minimum tick count.
pub fn analyze(
    ticks: &[Tick],
    base: &str,
    quote: &str,
    settings: &AnalysisSettings,
) -> Result<Analysis, Waiting> {
    let table = align(ticks, settings.bucket_ms);
    table.check_pair(base, quote, settings.min_aligned_rows)?;

    let spread = SpreadSeries::compute(&table, base, quote, settings.std_dev)?;
    let latest_z = spread
        .latest()
        .map(|p| p.zscore)
        .ok_or(Waiting::SpreadVariance)?;
    let alert = evaluate(latest_z, settings.threshold);
    let shares = price_shares(&table, &[base, quote]);

    Ok(Analysis {
        table,
        spread,
        shares,
        alert,
    })
}

/// Knobs the analytics stages read each cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub bucket_ms: u64,
    pub min_aligned_rows: usize,
    pub std_dev: StdDevKind,
    pub threshold: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            bucket_ms: 1_000,
            min_aligned_rows: 3,
            std_dev: StdDevKind::Population,
            threshold: alert::DEFAULT_THRESHOLD,
        }
    }
}
