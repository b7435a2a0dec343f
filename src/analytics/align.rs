use std::collections::BTreeMap;

use crate::model::tick::Tick;

use super::Waiting;

/// Per-symbol observations keyed by bucket start (epoch ms).
pub type Buckets = BTreeMap<u64, BTreeMap<String, f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub bucket_ms: u64,
    /// Symbols without any observation at or before this bucket are absent.
    pub prices: BTreeMap<String, f64>,
}

impl AlignedRow {
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied()
    }
}

/// Ascending, forward-filled price table on a fixed bucket grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedTable {
    /// Every symbol seen, sorted.
    pub symbols: Vec<String>,
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn latest(&self) -> Option<&AlignedRow> {
        self.rows.last()
    }

    pub fn column(&self, symbol: &str) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.price(symbol)).collect()
    }

    /// Back to the bucket map form accepted by [`forward_fill`].
    pub fn to_buckets(&self) -> Buckets {
        self.rows
            .iter()
            .map(|row| (row.bucket_ms, row.prices.clone()))
            .collect()
    }

    /// Gate for downstream analytics: both symbols must have reported and the
    /// table must hold at least `min_rows` rows.
    pub fn check_pair(&self, base: &str, quote: &str, min_rows: usize) -> Result<(), Waiting> {
        if !self.has_symbol(base) || !self.has_symbol(quote) || self.len() < min_rows {
            return Err(Waiting::AlignedData {
                base: base.to_string(),
                quote: quote.to_string(),
            });
        }
        Ok(())
    }
}

/// Floor a timestamp to the start of its bucket.
pub fn bucket_key(timestamp_ms: u64, bucket_ms: u64) -> u64 {
    assert!(bucket_ms > 0, "bucket_ms must be > 0");
    timestamp_ms - (timestamp_ms % bucket_ms)
}

/// Bucket a tick snapshot and forward-fill every symbol column.
///
/// When several ticks of one symbol land in the same bucket, the one that
/// arrived last in `ticks` wins.
pub fn align(ticks: &[Tick], bucket_ms: u64) -> AlignedTable {
    let mut buckets = Buckets::new();
    for tick in ticks {
        buckets
            .entry(bucket_key(tick.timestamp_ms, bucket_ms))
            .or_default()
            .insert(tick.symbol.clone(), tick.price);
    }
    forward_fill(buckets)
}

/// Scan buckets in ascending order carrying each symbol's last known price.
/// Buckets before a symbol's first observation stay empty for that symbol.
pub fn forward_fill(buckets: Buckets) -> AlignedTable {
    let mut last_known: BTreeMap<String, f64> = BTreeMap::new();
    let mut rows = Vec::with_capacity(buckets.len());

    for (bucket_ms, observed) in buckets {
        last_known.extend(observed);
        rows.push(AlignedRow {
            bucket_ms,
            prices: last_known.clone(),
        });
    }

    AlignedTable {
        symbols: last_known.into_keys().collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_key_floors_to_second() {
        assert_eq!(bucket_key(1_999, 1_000), 1_000);
        assert_eq!(bucket_key(2_000, 1_000), 2_000);
        assert_eq!(bucket_key(0, 1_000), 0);
    }

    #[test]
    fn same_bucket_collision_keeps_last_arrival() {
        let ticks = vec![
            Tick::new("BTCUSDT", 100.0, 1_100),
            Tick::new("BTCUSDT", 101.0, 1_900),
            Tick::new("BTCUSDT", 99.0, 1_500),
        ];
        let table = align(&ticks, 1_000);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].price("BTCUSDT"), Some(99.0));
    }

    #[test]
    fn no_back_fill_before_first_observation() {
        let ticks = vec![
            Tick::new("BTCUSDT", 100.0, 1_000),
            Tick::new("ETHUSDT", 50.0, 2_000),
            Tick::new("BTCUSDT", 101.0, 3_000),
        ];
        let table = align(&ticks, 1_000);
        assert_eq!(table.column("ETHUSDT"), vec![None, Some(50.0), Some(50.0)]);
        assert_eq!(
            table.column("BTCUSDT"),
            vec![Some(100.0), Some(100.0), Some(101.0)]
        );
    }

    #[test]
    #[should_panic(expected = "bucket_ms must be > 0")]
    fn zero_bucket_width_panics() {
        let _ = bucket_key(1_000, 0);
    }
}
