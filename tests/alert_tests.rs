use spread_monitor::analytics::alert::{step_threshold, THRESHOLD_MAX, THRESHOLD_MIN};
use spread_monitor::analytics::evaluate;

#[test]
fn same_zscore_depends_only_on_threshold() {
    let z = -1.3887;
    assert!(!evaluate(z, 2.0).triggered);
    assert!(evaluate(z, 1.0).triggered);
}

#[test]
fn triggered_message_shows_two_decimals() {
    let alert = evaluate(2.346, 2.0);
    assert!(alert.triggered);
    assert_eq!(alert.message, "Z-score crossed: 2.35");

    let negative = evaluate(-3.1, 2.0);
    assert_eq!(negative.message, "Z-score crossed: -3.10");
}

#[test]
fn evaluation_is_memoryless() {
    let first = evaluate(2.5, 2.0);
    let _ = evaluate(0.1, 2.0);
    let again = evaluate(2.5, 2.0);
    assert_eq!(first, again);
}

#[test]
fn threshold_steps_clamp_to_control_range() {
    assert_eq!(step_threshold(2.0, 1), 2.1);
    assert_eq!(step_threshold(2.0, -1), 1.9);
    assert_eq!(step_threshold(THRESHOLD_MAX, 1), THRESHOLD_MAX);
    assert_eq!(step_threshold(THRESHOLD_MIN, -3), THRESHOLD_MIN);
}

#[test]
fn out_of_range_threshold_snaps_into_control_range() {
    assert_eq!(step_threshold(5.0, -1), THRESHOLD_MAX);
    assert_eq!(step_threshold(0.5, 1), THRESHOLD_MIN);
}
