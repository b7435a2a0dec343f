use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::watch;

use spread_monitor::binance::rest::BinanceRestClient;
use spread_monitor::config::Config;
use spread_monitor::event::AppEvent;
use spread_monitor::input::parse_main_command;
use spread_monitor::pipeline::{PipelineRunner, PipelineSettings};
use spread_monitor::ui;
use spread_monitor::ui::AppState;
use spread_monitor::ui_handlers::{handle_main_command, LoopControl};

const LOG_FILE: &str = "spread-monitor.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Already-installed is fine; reqwest only needs some provider present.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Check config/default.toml or remove it to use the built-in defaults");
            std::process::exit(1);
        }
    };

    // Init tracing (log to file so it doesn't interfere with TUI)
    let log_file = std::fs::File::create(LOG_FILE)
        .with_context(|| format!("failed to create {}", LOG_FILE))?;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let settings = PipelineSettings::from_config(&config)?;
    let refresh_ms = config.ui.refresh_ms()?;
    tracing::info!(
        rest_url = %config.binance.rest_base_url,
        base = %settings.base_symbol,
        quote = %settings.quote_symbol,
        symbols = ?settings.catalog,
        refresh_ms,
        "Starting spread-monitor"
    );

    let client = BinanceRestClient::new(
        &config.binance.rest_base_url,
        config.binance.request_timeout_ms,
    );
    let mut app_state = AppState::new(&settings, config.ui.log_lines);
    let mut runner = PipelineRunner::new(settings);

    match client.ping().await {
        Ok(()) => {
            tracing::info!("Binance REST reachable");
            app_state.apply(AppEvent::LogMessage(format!(
                "Connected to {}",
                config.binance.rest_base_url
            )));
        }
        Err(e) => {
            // Not fatal: each cycle retries and reports its own failures.
            tracing::warn!(error = %e, "Binance REST ping failed");
            app_state.apply(AppEvent::Error(format!("Ping failed: {:#}", e)));
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = shutdown_tx.send(true);
    });

    let refresh = Duration::from_millis(refresh_ms);
    let input_poll = Duration::from_millis(config.ui.input_poll_ms.max(1));
    let mut next_cycle = Instant::now();

    let mut terminal = ratatui::init();
    app_state.push_log(format!(
        "spread-monitor started | {} vs {}",
        app_state.base_symbol, app_state.quote_symbol
    ));

    let result = async {
        loop {
            if !app_state.paused && Instant::now() >= next_cycle {
                let report = runner.run_cycle(&client).await;
                app_state.apply(AppEvent::CycleCompleted(report));
                // Cadence restarts after the cycle, so cycles never overlap.
                next_cycle = Instant::now() + refresh;
            }

            terminal.draw(|frame| ui::render(frame, &app_state))?;

            let wait = if app_state.paused {
                input_poll
            } else {
                next_cycle
                    .saturating_duration_since(Instant::now())
                    .min(input_poll)
            };
            if crossterm::event::poll(wait)? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(key.code, KeyCode::Char('c'))
                    {
                        tracing::info!("Ctrl+C pressed");
                        break;
                    }
                    if let Some(cmd) = parse_main_command(&key.code) {
                        match handle_main_command(cmd, &mut runner, &mut app_state) {
                            LoopControl::Continue => {}
                            LoopControl::RefreshNow => next_cycle = Instant::now(),
                            LoopControl::Quit => break,
                        }
                    }
                }
            }

            if *shutdown_rx.borrow() {
                break;
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    ratatui::restore();
    if let Err(e) = &result {
        tracing::error!(error = %e, "Dashboard loop failed");
    }
    tracing::info!(cycles = runner.cycles(), "Shutdown complete");
    println!("Goodbye! Check {} for details.", LOG_FILE);
    result
}
