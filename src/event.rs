use crate::pipeline::CycleReport;

#[derive(Debug, Clone)]
pub enum AppEvent {
    CycleCompleted(CycleReport),
    ThresholdChanged(f64),
    SelectionChanged(Vec<String>),
    LogMessage(String),
    Error(String),
}
