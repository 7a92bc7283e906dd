//! Event time span.
//!
//! [`EventWindow`] is the validated `[start, end]` pair an event is written
//! with. Construction rejects windows whose end precedes their start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when an event would end before it starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event ends ({end}) before it starts ({start})")]
pub struct InvalidWindow {
    /// Requested start.
    pub start: DateTime<Utc>,
    /// Requested end.
    pub end: DateTime<Utc>,
}

/// Start and end instants of a single event, in UTC.
///
/// Zero-length windows are allowed (reminder-style events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl EventWindow {
    /// Creates a window, failing if `end` is before `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidWindow> {
        if end < start {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End instant.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}
