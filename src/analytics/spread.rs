use serde::Deserialize;

use super::align::AlignedTable;
use super::Waiting;

/// Which standard deviation estimator the z-score divides by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdDevKind {
    /// Divide by `n`.
    #[default]
    Population,
    /// Divide by `n - 1`.
    Sample,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadPoint {
    pub bucket_ms: u64,
    pub spread: f64,
    pub zscore: f64,
}

/// Spread `base - quote` and its z-score over the full retained history.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadSeries {
    pub base: String,
    pub quote: String,
    pub points: Vec<SpreadPoint>,
    pub mean: f64,
    pub std_dev: f64,
}

impl SpreadSeries {
    pub fn compute(
        table: &AlignedTable,
        base: &str,
        quote: &str,
        kind: StdDevKind,
    ) -> Result<Self, Waiting> {
        let raw = spreads(table, base, quote);
        if raw.is_empty() {
            return Err(Waiting::AlignedData {
                base: base.to_string(),
                quote: quote.to_string(),
            });
        }

        let values: Vec<f64> = raw.iter().map(|(_, s)| *s).collect();
        let mean = mean(&values).ok_or(Waiting::SpreadVariance)?;
        let sd = std_dev(&values, kind).ok_or(Waiting::SpreadVariance)?;
        if is_degenerate(sd, mean) {
            return Err(Waiting::SpreadVariance);
        }

        let points = raw
            .into_iter()
            .map(|(bucket_ms, spread)| SpreadPoint {
                bucket_ms,
                spread,
                zscore: (spread - mean) / sd,
            })
            .collect();

        Ok(Self {
            base: base.to_string(),
            quote: quote.to_string(),
            points,
            mean,
            std_dev: sd,
        })
    }

    pub fn latest(&self) -> Option<&SpreadPoint> {
        self.points.last()
    }

    pub fn spread_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.spread).collect()
    }

    pub fn zscore_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.zscore).collect()
    }
}

/// `(bucket, base - quote)` for every row where both prices are present.
pub fn spreads(table: &AlignedTable, base: &str, quote: &str) -> Vec<(u64, f64)> {
    table
        .rows
        .iter()
        .filter_map(|row| match (row.price(base), row.price(quote)) {
            (Some(a), Some(b)) => Some((row.bucket_ms, a - b)),
            _ => None,
        })
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Two-pass standard deviation. `None` with fewer than two values.
pub fn std_dev(values: &[f64], kind: StdDevKind) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    let denom = match kind {
        StdDevKind::Population => values.len() as f64,
        StdDevKind::Sample => (values.len() - 1) as f64,
    };
    Some((sum_sq / denom).sqrt())
}

// Identical spreads can leave a few ulps of residue after the mean subtraction.
fn is_degenerate(sd: f64, mean: f64) -> bool {
    !sd.is_finite() || sd <= f64::EPSILON * mean.abs().max(1.0)
}
