use serde::Deserialize;

/// Deserialize Binance string-encoded numbers to f64.
pub fn string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

/// Binance symbol price ticker (GET /api/v3/ticker/price?symbol=...).
#[derive(Debug, Deserialize)]
pub struct TickerPriceResponse {
    pub symbol: String,
    #[serde(deserialize_with = "string_to_f64")]
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct BinanceApiErrorResponse {
    pub code: i64,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_price_parses_string_price() {
        let body = r#"{"symbol":"BTCUSDT","price":"67012.34000000"}"#;
        let resp: TickerPriceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.symbol, "BTCUSDT");
        assert!((resp.price - 67_012.34).abs() < 1e-9);
    }

    #[test]
    fn ticker_price_rejects_non_numeric_price() {
        let body = r#"{"symbol":"BTCUSDT","price":"n/a"}"#;
        assert!(serde_json::from_str::<TickerPriceResponse>(body).is_err());
    }

    #[test]
    fn api_error_body_parses() {
        let body = r#"{"code":-1121,"msg":"Invalid symbol."}"#;
        let err: BinanceApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(err.code, -1121);
        assert_eq!(err.msg, "Invalid symbol.");
    }
}
