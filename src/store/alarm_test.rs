use std::time::Duration;

use tokio::time::Instant;

use super::*;

#[test]
fn new_alarm_starts_active_with_expiry_after_seconds() {
    let before = Instant::now();
    let alarm = Alarm::new(5, 2, 3, "hi");

    assert_eq!(alarm.number, 5);
    assert_eq!(alarm.alarm_type, 2);
    assert_eq!(alarm.message, "hi");
    assert!(alarm.is_active());
    assert!(alarm.expires_at >= before + Duration::from_secs(3));
    assert!(!alarm.is_expired_at(before));
    assert!(alarm.is_expired_at(alarm.expires_at));
}

#[test]
fn mark_done_only_reports_the_first_transition() {
    let alarm = Alarm::new(1, 1, 1, "x");

    assert!(alarm.mark_done());
    assert!(!alarm.mark_done());
    assert!(alarm.is_done());
}

#[test]
fn truncated_keeps_short_messages() {
    let alarm = Alarm::new(1, 1, 1, "short").truncated(128);
    assert_eq!(alarm.message, "short");
}

#[test]
fn truncated_cuts_long_messages_on_char_boundary() {
    let alarm = Alarm::new(1, 1, 1, "abcdef").truncated(4);
    assert_eq!(alarm.message, "abcd");

    // 'é' is two bytes; cutting at 2 would split it
    let alarm = Alarm::new(1, 1, 1, "aé").truncated(2);
    assert_eq!(alarm.message, "a");
}

#[tokio::test(start_paused = true)]
async fn snapshot_reports_remaining_seconds() {
    let alarm = Alarm::new(9, 4, 10, "wake up");
    tokio::time::advance(Duration::from_millis(3500)).await;

    let snapshot = alarm.snapshot(Instant::now());
    assert_eq!(snapshot.number, 9);
    assert_eq!(snapshot.alarm_type, 4);
    assert_eq!(snapshot.seconds, 10);
    assert_eq!(snapshot.remaining_secs, 7);
    assert!(!snapshot.done);
}
