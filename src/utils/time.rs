use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use tokio::time::Instant;

/// Wall clock in seconds since the Unix epoch. A clock set before the epoch
/// reads as 0.
pub(crate) fn get_now_as_u64() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Furthest a deadline is ever placed from `now`, about 30 years.
pub(crate) const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Monotonic deadline `seconds` from `now`. A deadline the clock cannot
/// represent saturates to `now + FAR_FUTURE`.
pub(crate) fn deadline_after(
    now: Instant,
    seconds: u64,
) -> Instant {
    now.checked_add(Duration::from_secs(seconds))
        .unwrap_or(now + FAR_FUTURE)
}

/// Whole seconds left until `deadline`, rounded up, so an alarm with any
/// time left never reads as 0.
pub(crate) fn remaining_secs(
    deadline: Instant,
    now: Instant,
) -> u64 {
    let left = deadline.saturating_duration_since(now);
    let secs = left.as_secs();
    if left.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
