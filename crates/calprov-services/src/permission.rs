//! Permission prompt service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoxFuture;
use crate::error::ServiceResult;

/// A permission category the host can prompt for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionCategory {
    /// Read/write access to calendars and events.
    Calendar,
    /// Access to reminders (Apple family only).
    Reminders,
}

impl PermissionCategory {
    /// Returns the lowercase name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Reminders => "reminders",
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// The user granted access.
    Granted,
    /// The user refused access.
    Denied,
    /// The user dismissed the prompt without deciding.
    Undetermined,
}

impl PermissionStatus {
    /// Returns true only for [`PermissionStatus::Granted`].
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Host permission prompt subsystem.
///
/// `request` may show a user-facing dialog. Whether it re-prompts after a
/// denial is up to the host.
pub trait PermissionService: Send + Sync {
    /// Requests access to `category` and returns the resulting status.
    fn request(&self, category: PermissionCategory) -> BoxFuture<'_, ServiceResult<PermissionStatus>>;
}
