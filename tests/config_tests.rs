use spread_monitor::analytics::StdDevKind;
use spread_monitor::config::{Config, EMBEDDED_DEFAULT};
use spread_monitor::pipeline::PipelineSettings;

const BASE_TOML: &str = r#"
[binance]
rest_base_url = "https://api.binance.com"
symbols = ["btcusdt", "ethusdt", "solusdt"]

[analytics]
base_symbol = "btcusdt"
quote_symbol = "ethusdt"
buffer_capacity = 50
bucket_interval = "1s"
min_ticks = 4
min_aligned_rows = 3
alert_threshold = 1.5
std_dev = "sample"

[ui]
refresh_interval = "2s"
input_poll_ms = 25
recent_ticks = 8
log_lines = 100

[logging]
level = "debug"
"#;

#[test]
fn parse_custom_toml() {
    let config = Config::from_toml_str(BASE_TOML).unwrap();

    assert_eq!(config.binance.catalog(), vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
    assert_eq!(config.binance.request_timeout_ms, 2_000);
    assert_eq!(
        config.analytics.pair(),
        ("BTCUSDT".to_string(), "ETHUSDT".to_string())
    );
    assert_eq!(config.analytics.std_dev, StdDevKind::Sample);
    assert_eq!(config.ui.refresh_ms().unwrap(), 2_000);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn pipeline_settings_follow_config() {
    let config = Config::from_toml_str(BASE_TOML).unwrap();
    let settings = PipelineSettings::from_config(&config).unwrap();

    assert_eq!(settings.base_symbol, "BTCUSDT");
    assert_eq!(settings.buffer_capacity, 50);
    assert_eq!(settings.min_ticks, 4);
    assert_eq!(settings.recent_ticks, 8);
    assert_eq!(settings.analysis.bucket_ms, 1_000);
    assert_eq!(settings.analysis.threshold, 1.5);
    assert_eq!(settings.analysis.std_dev, StdDevKind::Sample);
}

#[test]
fn embedded_defaults_match_dashboard_constants() {
    let config = Config::from_toml_str(EMBEDDED_DEFAULT).unwrap();
    let settings = PipelineSettings::from_config(&config).unwrap();
    assert_eq!(settings, PipelineSettings::default());
}

#[test]
fn rejects_identical_pair() {
    let toml_str = BASE_TOML.replace("quote_symbol = \"ethusdt\"", "quote_symbol = \"BTCUSDT\"");
    let err = Config::from_toml_str(&toml_str).unwrap_err();
    assert!(format!("{:#}", err).contains("distinct"));
}

#[test]
fn rejects_pair_symbol_outside_catalog() {
    let toml_str = BASE_TOML.replace("quote_symbol = \"ethusdt\"", "quote_symbol = \"XRPUSDT\"");
    let err = Config::from_toml_str(&toml_str).unwrap_err();
    assert!(format!("{:#}", err).contains("XRPUSDT"));
}

#[test]
fn rejects_zero_capacity_and_bad_threshold() {
    let zero_cap = BASE_TOML.replace("buffer_capacity = 50", "buffer_capacity = 0");
    assert!(Config::from_toml_str(&zero_cap).is_err());

    let bad_threshold = BASE_TOML.replace("alert_threshold = 1.5", "alert_threshold = -1.0");
    assert!(Config::from_toml_str(&bad_threshold).is_err());
}

#[test]
fn rejects_invalid_intervals() {
    let bad_bucket = BASE_TOML.replace("bucket_interval = \"1s\"", "bucket_interval = \"1x\"");
    let err = Config::from_toml_str(&bad_bucket).unwrap_err();
    assert!(format!("{:#}", err).contains("bucket_interval"));

    let bad_refresh = BASE_TOML.replace("refresh_interval = \"2s\"", "refresh_interval = \"0s\"");
    assert!(Config::from_toml_str(&bad_refresh).is_err());
}

#[test]
fn rejects_unknown_std_dev_kind() {
    let toml_str = BASE_TOML.replace("std_dev = \"sample\"", "std_dev = \"robust\"");
    assert!(Config::from_toml_str(&toml_str).is_err());
}
