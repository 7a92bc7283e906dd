//! Event descriptors written to the app calendar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::EventWindow;

/// How an alarm notifies the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmMethod {
    /// On-device alert.
    #[default]
    Alert,
    /// Email notification (Android only).
    Email,
    /// SMS notification (Android only).
    Sms,
    /// Whatever the host's default method is.
    Default,
}

/// An alarm attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    /// Offset from the event start, in minutes. Negative fires earlier.
    pub relative_offset: i64,
    /// Notification method.
    pub method: AlarmMethod,
}

impl Alarm {
    /// An alert that fires exactly at the event start.
    pub fn at_start() -> Self {
        Self {
            relative_offset: 0,
            method: AlarmMethod::Alert,
        }
    }
}

/// A single timed event to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Event title.
    pub title: String,
    /// Start instant.
    pub start_date: DateTime<Utc>,
    /// End instant.
    pub end_date: DateTime<Utc>,
    /// IANA zone name the event is displayed in.
    pub time_zone: String,
    /// Alarms; always one start-aligned alert when built via [`EventDescriptor::timed`].
    pub alarms: Vec<Alarm>,
}

impl EventDescriptor {
    /// Builds an event over `window` with a single alert at its start.
    pub fn timed(title: impl Into<String>, window: EventWindow, time_zone: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start_date: window.start(),
            end_date: window.end(),
            time_zone: time_zone.into(),
            alarms: vec![Alarm::at_start()],
        }
    }
}
