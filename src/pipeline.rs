//! One refresh cycle: fetch → append → truncate → align → spread/z → alert.
//!
//! [`PipelineRunner`] owns the tick buffer for the lifetime of a dashboard
//! session. It starts empty and is simply dropped when the session ends.

use std::future::Future;

use anyhow::Result;

use crate::analytics::{analyze, Analysis, AnalysisSettings, Waiting};
use crate::buffer::TickBuffer;
use crate::config::Config;
use crate::error::{AppError, FetchError};
use crate::model::tick::{normalize_symbol, Tick};

/// Read-only price lookup by symbol.
pub trait PriceSource {
    fn fetch_tick(&self, symbol: &str) -> impl Future<Output = Result<Tick, FetchError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub base_symbol: String,
    pub quote_symbol: String,
    /// Symbols the operator may select; fetch order follows this list.
    pub catalog: Vec<String>,
    pub buffer_capacity: usize,
    pub min_ticks: usize,
    pub recent_ticks: usize,
    pub analysis: AnalysisSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            base_symbol: "BTCUSDT".to_string(),
            quote_symbol: "ETHUSDT".to_string(),
            catalog: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
            buffer_capacity: 200,
            min_ticks: 5,
            recent_ticks: 10,
            analysis: AnalysisSettings::default(),
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let (base_symbol, quote_symbol) = config.analytics.pair();
        Ok(Self {
            base_symbol,
            quote_symbol,
            catalog: config.binance.catalog(),
            buffer_capacity: config.analytics.buffer_capacity,
            min_ticks: config.analytics.min_ticks,
            recent_ticks: config.ui.recent_ticks,
            analysis: config.analysis_settings()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Waiting(Waiting),
    Ready(Box<Analysis>),
}

impl CycleOutcome {
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            CycleOutcome::Ready(analysis) => Some(analysis.as_ref()),
            CycleOutcome::Waiting(_) => None,
        }
    }

    pub fn waiting(&self) -> Option<&Waiting> {
        match self {
            CycleOutcome::Waiting(w) => Some(w),
            CycleOutcome::Ready(_) => None,
        }
    }
}

/// A skipped observation, kept for the dashboard log.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub symbol: String,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub appended: usize,
    pub failures: Vec<FetchFailure>,
    pub buffered: usize,
    pub total_collected: u64,
    pub recent: Vec<Tick>,
    pub outcome: CycleOutcome,
}

pub struct PipelineRunner {
    settings: PipelineSettings,
    buffer: TickBuffer,
    selected: Vec<String>,
    cycles: u64,
}

impl PipelineRunner {
    pub fn new(settings: PipelineSettings) -> Self {
        let buffer = TickBuffer::new(settings.buffer_capacity);
        let selected = settings.catalog.clone();
        Self {
            settings,
            buffer,
            selected,
            cycles: 0,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn buffer(&self) -> &TickBuffer {
        &self.buffer
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn threshold(&self) -> f64 {
        self.settings.analysis.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), AppError> {
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "alert threshold must be positive, got {}",
                threshold
            )));
        }
        self.settings.analysis.threshold = threshold;
        Ok(())
    }

    pub fn selected_symbols(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, symbol: &str) -> bool {
        let symbol = normalize_symbol(symbol);
        self.selected.iter().any(|s| s == &symbol)
    }

    /// Flip a catalog symbol in or out of the fetch set. Returns the new state.
    pub fn toggle_symbol(&mut self, symbol: &str) -> Result<bool, AppError> {
        let symbol = normalize_symbol(symbol);
        if !self.settings.catalog.contains(&symbol) {
            return Err(AppError::InvalidInput(format!(
                "{} is not in the symbol catalog",
                symbol
            )));
        }
        if self.is_selected(&symbol) {
            if self.selected.len() == 1 {
                return Err(AppError::InvalidInput(
                    "at least one symbol must stay selected".to_string(),
                ));
            }
            self.selected.retain(|s| s != &symbol);
            Ok(false)
        } else {
            let mut next = self.selected.clone();
            next.push(symbol);
            self.selected = self
                .settings
                .catalog
                .iter()
                .filter(|s| next.contains(s))
                .cloned()
                .collect();
            Ok(true)
        }
    }

    /// Fetch every selected symbol one after another and run the analytics.
    /// A failed lookup only drops that symbol's observation for this cycle.
    pub async fn run_cycle<S: PriceSource>(&mut self, source: &S) -> CycleReport {
        let mut results = Vec::with_capacity(self.selected.len());
        for symbol in self.selected.clone() {
            let result = source.fetch_tick(&symbol).await;
            results.push((symbol, result));
        }
        self.finish_cycle(results)
    }

    pub fn finish_cycle<I>(&mut self, results: I) -> CycleReport
    where
        I: IntoIterator<Item = (String, Result<Tick, FetchError>)>,
    {
        self.cycles += 1;
        let (appended, failures) = self.ingest(results);
        let outcome = self.evaluate();

        match &outcome {
            CycleOutcome::Waiting(w) => {
                tracing::debug!(cycle = self.cycles, buffered = self.buffer.len(), waiting = %w, "cycle waiting");
            }
            CycleOutcome::Ready(analysis) => {
                tracing::debug!(
                    cycle = self.cycles,
                    rows = analysis.table.len(),
                    zscore = analysis.alert.zscore,
                    triggered = analysis.alert.triggered,
                    "cycle ready"
                );
                if analysis.alert.triggered {
                    tracing::info!(
                        zscore = analysis.alert.zscore,
                        threshold = analysis.alert.threshold,
                        "z-score alert"
                    );
                }
            }
        }

        CycleReport {
            cycle: self.cycles,
            appended,
            failures,
            buffered: self.buffer.len(),
            total_collected: self.buffer.total_appended(),
            recent: self.buffer.recent(self.settings.recent_ticks),
            outcome,
        }
    }

    /// Append successful lookups; collect the failures.
    pub fn ingest<I>(&mut self, results: I) -> (usize, Vec<FetchFailure>)
    where
        I: IntoIterator<Item = (String, Result<Tick, FetchError>)>,
    {
        let mut appended = 0;
        let mut failures = Vec::new();
        for (symbol, result) in results {
            match result {
                Ok(tick) => {
                    self.buffer.append(tick);
                    appended += 1;
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, kind = e.kind(), error = %e, "price fetch skipped");
                    failures.push(FetchFailure {
                        symbol,
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }
        (appended, failures)
    }

    pub fn evaluate(&self) -> CycleOutcome {
        let collected = self.buffer.len();
        if collected < self.settings.min_ticks {
            return CycleOutcome::Waiting(Waiting::Ticks {
                collected,
                needed: self.settings.min_ticks,
            });
        }

        let snapshot = self.buffer.snapshot();
        match analyze(
            &snapshot,
            &self.settings.base_symbol,
            &self.settings.quote_symbol,
            &self.settings.analysis,
        ) {
            Ok(analysis) => CycleOutcome::Ready(Box::new(analysis)),
            Err(w) => CycleOutcome::Waiting(w),
        }
    }
}
