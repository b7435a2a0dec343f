use ratatui::backend::TestBackend;
use ratatui::Terminal;

use spread_monitor::event::AppEvent;
use spread_monitor::model::tick::Tick;
use spread_monitor::pipeline::{PipelineRunner, PipelineSettings};
use spread_monitor::ui::{self, AppState};

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn draw(state: &AppState) -> String {
    let backend = TestBackend::new(140, 40);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal
        .draw(|frame| ui::render(frame, state))
        .expect("render should succeed");
    buffer_text(&terminal)
}

fn feed(runner: &mut PipelineRunner, state: &mut AppState, btc: &[f64]) {
    for (i, price) in btc.iter().enumerate() {
        let ts = i as u64 * 1_000;
        let report = runner.finish_cycle(vec![
            ("BTCUSDT".to_string(), Ok(Tick::new("BTCUSDT", *price, ts))),
            ("ETHUSDT".to_string(), Ok(Tick::new("ETHUSDT", 100.0, ts))),
        ]);
        state.apply(AppEvent::CycleCompleted(report));
    }
}

#[test]
fn warm_up_renders_waiting_message() {
    let settings = PipelineSettings::default();
    let mut state = AppState::new(&settings, 50);
    let mut runner = PipelineRunner::new(settings);
    feed(&mut runner, &mut state, &[110.0]);

    let text = draw(&state);
    assert!(text.contains("Collecting live data"));
    assert!(text.contains("Live Tick Data"));
    assert!(text.contains("BTCUSDT"));
}

#[test]
fn ready_state_renders_charts_and_alert() {
    let settings = PipelineSettings {
        analysis: spread_monitor::analytics::AnalysisSettings {
            threshold: 1.0,
            ..Default::default()
        },
        ..PipelineSettings::default()
    };
    let mut state = AppState::new(&settings, 50);
    let mut runner = PipelineRunner::new(settings);
    feed(&mut runner, &mut state, &[110.0, 111.0, 106.0]);

    let text = draw(&state);
    assert!(text.contains("Spread (BTCUSDT - ETHUSDT)"));
    assert!(text.contains("Z-Score"));
    assert!(text.contains("Z-score crossed: -1.39"));
    assert!(text.contains("Price Distribution (Latest)"));
    assert!(text.contains("System Log"));
}

#[test]
fn status_bar_shows_pause_and_threshold() {
    let settings = PipelineSettings::default();
    let mut state = AppState::new(&settings, 50);
    state.paused = true;

    let text = draw(&state);
    assert!(text.contains("PAUSED"));
    assert!(text.contains("|z| > 2.0"));
    assert!(text.contains("1:BTCUSDT"));
}

#[test]
fn log_panel_keeps_newest_message_visible_with_long_lines() {
    let settings = PipelineSettings::default();
    let mut state = AppState::new(&settings, 50);
    for i in 0..6 {
        state.push_log(format!(
            "[WARN] ETHUSDT skipped (http): error sending request for url \
             (https://api.binance.com/api/v3/ticker/price?symbol=ETHUSDT) #{}",
            i
        ));
    }
    state.push_log("NEWEST-MESSAGE".to_string());

    let backend = TestBackend::new(80, 30);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal
        .draw(|frame| ui::render(frame, &state))
        .expect("render should succeed");
    let text = buffer_text(&terminal);

    assert!(text.contains("NEWEST-MESSAGE"), "newest log line should be visible");
    let warn_rows = text.lines().filter(|l| l.contains("[WARN] ETHUSDT skipped")).count();
    assert_eq!(warn_rows, 3, "older lines are clipped to one row each");
}
