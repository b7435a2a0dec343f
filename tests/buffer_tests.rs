use spread_monitor::buffer::TickBuffer;
use spread_monitor::model::tick::Tick;

fn tick(i: u64) -> Tick {
    let symbol = if i % 2 == 0 { "BTCUSDT" } else { "ETHUSDT" };
    Tick::new(symbol, 100.0 + i as f64, i * 500)
}

#[test]
fn overflow_keeps_latest_capacity_ticks_in_arrival_order() {
    let mut buffer = TickBuffer::new(200);
    for i in 0..250 {
        buffer.append(tick(i));
    }

    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.len(), 200);
    assert_eq!(snapshot.first().map(|t| t.timestamp_ms), Some(50 * 500));
    assert_eq!(snapshot.last().map(|t| t.timestamp_ms), Some(249 * 500));
    assert!(snapshot
        .windows(2)
        .all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    assert_eq!(buffer.total_appended(), 250);
}

#[test]
fn below_capacity_nothing_is_dropped() {
    let mut buffer = TickBuffer::new(200);
    for i in 0..7 {
        buffer.append(tick(i));
    }
    assert_eq!(buffer.len(), 7);
    assert_eq!(buffer.snapshot()[0], tick(0));
}

#[test]
fn snapshot_is_detached_from_later_appends() {
    let mut buffer = TickBuffer::new(3);
    buffer.append(tick(0));
    let before = buffer.snapshot();
    buffer.append(tick(1));
    buffer.append(tick(2));
    buffer.append(tick(3));

    assert_eq!(before, vec![tick(0)]);
    assert_eq!(buffer.snapshot(), vec![tick(1), tick(2), tick(3)]);
}

#[test]
fn recent_larger_than_buffer_returns_everything() {
    let mut buffer = TickBuffer::new(10);
    buffer.append(tick(0));
    buffer.append(tick(1));
    assert_eq!(buffer.recent(10).len(), 2);
    assert!(TickBuffer::new(4).recent(3).is_empty());
}
