use chrono::{DateTime, Utc};

/// One observed price sample for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub symbol: String,
    pub price: f64,
    /// UTC epoch milliseconds at which the price was observed.
    pub timestamp_ms: u64,
}

impl Tick {
    /// Build a tick, normalizing the symbol to trimmed upper case.
    pub fn new(symbol: &str, price: f64, timestamp_ms: u64) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            price,
            timestamp_ms,
        }
    }

    /// Stamp a price with the current wall clock.
    pub fn observed_now(symbol: &str, price: f64) -> Self {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        Self::new(symbol, price, now_ms)
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms as i64)
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_case_normalized() {
        let tick = Tick::new(" btcusdt ", 67_000.0, 1_000);
        assert_eq!(tick.symbol, "BTCUSDT");
    }

    #[test]
    fn observed_at_round_trips_millis() {
        let tick = Tick::new("ETHUSDT", 3_500.0, 1_700_000_000_123);
        let at = tick.observed_at().unwrap();
        assert_eq!(at.timestamp_millis(), 1_700_000_000_123);
    }
}
