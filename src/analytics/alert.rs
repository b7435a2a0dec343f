pub const THRESHOLD_MIN: f64 = 1.0;
pub const THRESHOLD_MAX: f64 = 3.0;
pub const THRESHOLD_STEP: f64 = 0.1;
pub const DEFAULT_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AlertState {
    pub triggered: bool,
    pub zscore: f64,
    pub threshold: f64,
    pub message: String,
}

/// Compare the latest z-score against the threshold. Stateless: every call
/// decides from its inputs alone.
pub fn evaluate(zscore: f64, threshold: f64) -> AlertState {
    let triggered = zscore.abs() > threshold;
    let message = if triggered {
        format!("Z-score crossed: {:.2}", zscore)
    } else {
        format!("Z-score {:.2} within ±{:.2}", zscore, threshold)
    };
    AlertState {
        triggered,
        zscore,
        threshold,
        message,
    }
}

/// Operator threshold nudge, clamped to the control range and snapped to one decimal.
pub fn step_threshold(current: f64, steps: i32) -> f64 {
    let next = current + THRESHOLD_STEP * steps as f64;
    let snapped = (next * 10.0).round() / 10.0;
    snapped.clamp(THRESHOLD_MIN, THRESHOLD_MAX)
}
