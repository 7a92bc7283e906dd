//! Provisioning error types.

use calprov_core::{CalendarHandle, InvalidWindow, Platform};
use calprov_services::ServiceError;
use thiserror::Error;

/// Result type for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors returned by [`CalendarProvisioner`](crate::CalendarProvisioner).
///
/// Permission denial is not an error: it shows up as a denied
/// [`PermissionOutcome`](crate::PermissionOutcome) or an empty calendar list.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// No visible calendar qualifies as a parent source for a new calendar.
    #[error("no calendar source found for {platform}: {reason}")]
    SourceNotFound { platform: Platform, reason: String },

    /// The calendar service rejected or failed the creation request.
    #[error("calendar creation failed: {0}")]
    CreateFailed(#[source] ServiceError),

    /// The calendar service rejected or failed the event write.
    #[error("event write failed: {0}")]
    WriteFailed(#[source] ServiceError),

    /// The slot holds no calendar handle.
    #[error("no calendar stored in slot {slot:?}")]
    SlotEmpty { slot: String },

    /// The slot already holds a calendar and the policy forbids replacing it.
    #[error("slot {slot:?} already holds calendar {handle}")]
    AlreadyProvisioned { slot: String, handle: CalendarHandle },

    /// The event would end before it starts.
    #[error(transparent)]
    InvalidEventWindow(#[from] InvalidWindow),

    /// Any other host service failure (store, locale, listing, deletion).
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ProvisionError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a source-not-found error.
    pub fn source_not_found(platform: Platform, reason: impl Into<String>) -> Self {
        Self::SourceNotFound {
            platform,
            reason: reason.into(),
        }
    }

    /// Creates a slot-empty error.
    pub fn slot_empty(slot: impl Into<String>) -> Self {
        Self::SlotEmpty { slot: slot.into() }
    }
}
