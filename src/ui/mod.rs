pub mod chart;
pub mod dashboard;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Color;
use ratatui::Frame;

use crate::analytics::{evaluate, Analysis, Waiting};
use crate::event::AppEvent;
use crate::model::tick::Tick;
use crate::pipeline::{CycleOutcome, PipelineSettings};

use chart::SeriesChart;
use dashboard::{AlertBanner, KeybindBar, LogPanel, PriceSharePanel, StatusBar, TickTablePanel};

const DEFAULT_MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub base_symbol: String,
    pub quote_symbol: String,
    pub catalog: Vec<String>,
    pub selected: Vec<String>,
    pub threshold: f64,
    pub buffer_capacity: usize,
    pub paused: bool,
    pub cycles: u64,
    pub buffered: usize,
    pub collected: u64,
    pub recent_ticks: Vec<Tick>,
    pub outcome: Option<CycleOutcome>,
    pub spread_values: Vec<f64>,
    pub zscore_values: Vec<f64>,
    pub log_messages: Vec<String>,
    max_log_messages: usize,
    alert_active: bool,
}

impl AppState {
    pub fn new(settings: &PipelineSettings, max_log_messages: usize) -> Self {
        Self {
            base_symbol: settings.base_symbol.clone(),
            quote_symbol: settings.quote_symbol.clone(),
            catalog: settings.catalog.clone(),
            selected: settings.catalog.clone(),
            threshold: settings.analysis.threshold,
            buffer_capacity: settings.buffer_capacity,
            paused: false,
            cycles: 0,
            buffered: 0,
            collected: 0,
            recent_ticks: Vec::new(),
            outcome: None,
            spread_values: Vec::new(),
            zscore_values: Vec::new(),
            log_messages: Vec::new(),
            max_log_messages: if max_log_messages == 0 {
                DEFAULT_MAX_LOG_MESSAGES
            } else {
                max_log_messages
            },
            alert_active: false,
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > self.max_log_messages {
            let excess = self.log_messages.len() - self.max_log_messages;
            self.log_messages.drain(..excess);
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.outcome.as_ref().and_then(|o| o.analysis())
    }

    pub fn waiting(&self) -> Option<&Waiting> {
        self.outcome.as_ref().and_then(|o| o.waiting())
    }

    // Log only on transitions so a sustained alert does not flood the panel.
    fn note_alert_transition(&mut self) {
        let (triggered, message) = match self.analysis() {
            Some(a) => (a.alert.triggered, a.alert.message.clone()),
            None => (false, String::new()),
        };
        if triggered && !self.alert_active {
            self.push_log(format!("[ALERT] {}", message));
        } else if !triggered && self.alert_active {
            self.push_log("Z-score back within threshold".to_string());
        }
        self.alert_active = triggered;
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::CycleCompleted(report) => {
                self.cycles = report.cycle;
                self.buffered = report.buffered;
                self.collected = report.total_collected;
                self.recent_ticks = report.recent;
                for failure in &report.failures {
                    self.push_log(format!(
                        "[WARN] {} skipped ({}): {}",
                        failure.symbol, failure.kind, failure.message
                    ));
                }
                match &report.outcome {
                    CycleOutcome::Ready(analysis) => {
                        self.spread_values = analysis.spread.spread_values();
                        self.zscore_values = analysis.spread.zscore_values();
                    }
                    CycleOutcome::Waiting(_) => {
                        self.spread_values.clear();
                        self.zscore_values.clear();
                    }
                }
                self.outcome = Some(report.outcome);
                self.note_alert_transition();
            }
            AppEvent::ThresholdChanged(threshold) => {
                self.threshold = threshold;
                if let Some(CycleOutcome::Ready(analysis)) = self.outcome.as_mut() {
                    analysis.alert = evaluate(analysis.alert.zscore, threshold);
                }
                self.push_log(format!("Alert threshold set to {:.1}", threshold));
                self.note_alert_transition();
            }
            AppEvent::SelectionChanged(selected) => {
                self.push_log(format!("Polling {}", selected.join(", ")));
                self.selected = selected;
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
            AppEvent::Error(msg) => {
                self.push_log(format!("[ERR] {}", msg));
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // alert / status banner
            Constraint::Min(10),   // charts + side panels
            Constraint::Length(6), // system log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            catalog: &state.catalog,
            selected: &state.selected,
            paused: state.paused,
            collected: state.collected,
            buffered: state.buffered,
            capacity: state.buffer_capacity,
            cycles: state.cycles,
            threshold: state.threshold,
        },
        outer[0],
    );

    let analysis = state.analysis();
    frame.render_widget(
        AlertBanner {
            alert: analysis.map(|a| &a.alert),
            waiting: state.waiting(),
        },
        outer[1],
    );

    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(40)])
        .split(outer[2]);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_area[0]);

    let placeholder = state.waiting().map(|w| w.to_string());
    let spread_title = format!("Spread ({} - {})", state.base_symbol, state.quote_symbol);
    frame.render_widget(
        SeriesChart::new(&spread_title, &state.spread_values)
            .color(Color::Cyan)
            .guide(analysis.map(|a| a.spread.mean).unwrap_or(0.0), Color::DarkGray)
            .placeholder(placeholder.as_deref()),
        charts[0],
    );
    frame.render_widget(
        SeriesChart::new("Z-Score", &state.zscore_values)
            .color(Color::LightGreen)
            .precision(3)
            .guide(state.threshold, Color::Red)
            .guide(0.0, Color::DarkGray)
            .guide(-state.threshold, Color::Red)
            .placeholder(placeholder.as_deref()),
        charts[1],
    );

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(main_area[1]);

    frame.render_widget(
        PriceSharePanel::new(analysis.map(|a| a.shares.as_slice()).unwrap_or(&[])),
        side[0],
    );
    frame.render_widget(TickTablePanel::new(&state.recent_ticks), side[1]);

    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);
    frame.render_widget(KeybindBar, outer[4]);
}
