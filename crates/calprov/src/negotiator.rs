//! Permission negotiation.
//!
//! Collapses the calendar and reminder prompts into one granted/denied
//! answer. Android has no separate reminder permission, so there the
//! reminder half is granted without prompting.

use std::fmt;

use calprov_core::Platform;
use calprov_services::{PermissionCategory, PermissionService, ServiceResult};
use tracing::{debug, warn};

/// Sentinel returned at the public boundary when access is granted.
pub const GRANTED: &str = "granted";

/// Result of asking for calendar and reminder access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionOutcome {
    /// Calendar access was granted.
    pub calendar: bool,
    /// Reminder access was granted (always true where it is not a separate
    /// permission).
    pub reminders: bool,
}

impl PermissionOutcome {
    /// Returns true if every requested category was granted.
    pub fn is_granted(&self) -> bool {
        self.calendar && self.reminders
    }

    /// Returns `Some("granted")` when granted, `None` otherwise.
    pub fn sentinel(&self) -> Option<&'static str> {
        self.is_granted().then_some(GRANTED)
    }
}

impl fmt::Display for PermissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_granted() { GRANTED } else { "denied" })
    }
}

/// Prompts for calendar access, then reminder access where the platform has
/// it. Both prompts are issued even when the first is denied.
pub async fn request_access(
    permissions: &dyn PermissionService,
    platform: Platform,
) -> ServiceResult<PermissionOutcome> {
    let calendar = permissions
        .request(PermissionCategory::Calendar)
        .await?
        .is_granted();

    let reminders = if platform.has_reminder_permission() {
        permissions
            .request(PermissionCategory::Reminders)
            .await?
            .is_granted()
    } else {
        true
    };

    let outcome = PermissionOutcome {
        calendar,
        reminders,
    };
    if outcome.is_granted() {
        debug!(%platform, "calendar access granted");
    } else {
        warn!(%platform, calendar, reminders, "calendar access denied");
    }
    Ok(outcome)
}
