use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use serde::Serialize;
use tokio::time::Instant;

use crate::utils::time::deadline_after;
use crate::utils::time::get_now_as_u64;
use crate::utils::time::remaining_secs;

/// Unique key of an alarm.
pub type MessageNumber = u32;
/// Grouping key shared by alarms displayed by the same monitor worker.
pub type MessageType = u32;

/// How [`AlarmStore::exists`](crate::AlarmStore::exists) interprets its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    ByType,
    ByNumber,
}

/// A scheduled, typed message with an expiry.
///
/// `done` is the only field that changes after construction. Monitor workers
/// set it while holding shared access to the store, so it is atomic rather
/// than guarded by the exclusive latch.
#[derive(Debug)]
pub struct Alarm {
    pub number: MessageNumber,
    pub alarm_type: MessageType,
    pub seconds: u64,
    pub message: String,
    /// Wall clock at submission, seconds since the Unix epoch
    pub submitted_at: u64,
    pub expires_at: Instant,
    done: AtomicBool,
}

impl Alarm {
    pub fn new(
        number: MessageNumber,
        alarm_type: MessageType,
        seconds: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            number,
            alarm_type,
            seconds,
            message: message.into(),
            submitted_at: get_now_as_u64(),
            expires_at: deadline_after(Instant::now(), seconds),
            done: AtomicBool::new(false),
        }
    }

    /// Cuts the message down to at most `max_len` bytes, backing off to the
    /// nearest char boundary.
    pub fn truncated(
        mut self,
        max_len: usize,
    ) -> Self {
        if self.message.len() > max_len {
            let mut end = max_len;
            while !self.message.is_char_boundary(end) {
                end -= 1;
            }
            self.message.truncate(end);
        }
        self
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    pub fn is_active(&self) -> bool {
        !self.is_done()
    }

    /// Flags the alarm as done. Returns `true` only for the call that flipped it.
    pub fn mark_done(&self) -> bool {
        !self.done.swap(true, Ordering::AcqRel)
    }

    pub fn is_expired_at(
        &self,
        now: Instant,
    ) -> bool {
        now >= self.expires_at
    }

    pub fn snapshot(
        &self,
        now: Instant,
    ) -> AlarmSnapshot {
        AlarmSnapshot {
            number: self.number,
            alarm_type: self.alarm_type,
            seconds: self.seconds,
            message: self.message.clone(),
            submitted_at: self.submitted_at,
            remaining_secs: remaining_secs(self.expires_at, now),
            done: self.is_done(),
        }
    }
}

/// Point-in-time copy of an [`Alarm`], safe to hand out after the latch is released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmSnapshot {
    pub number: MessageNumber,
    pub alarm_type: MessageType,
    pub seconds: u64,
    pub message: String,
    pub submitted_at: u64,
    pub remaining_secs: u64,
    pub done: bool,
}
