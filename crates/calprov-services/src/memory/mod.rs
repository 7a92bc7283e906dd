//! In-process adapters.
//!
//! These back every service trait with plain memory. They are what the
//! provisioner's own tests run against, and hosts can use them the same way.

mod calendar;
mod permissions;
mod store;

pub use calendar::{CalendarOperation, MemoryCalendarService, RecordedEvent};
pub use permissions::StaticPermissions;
pub use store::{MemoryStore, StoreOperation};

use crate::error::ServiceResult;
use crate::locale::LocaleService;

/// [`LocaleService`] that always reports the same zone.
#[derive(Debug, Clone)]
pub struct FixedLocale {
    zone: String,
}

impl FixedLocale {
    /// Creates a locale pinned to `zone`.
    pub fn new(zone: impl Into<String>) -> Self {
        Self { zone: zone.into() }
    }
}

impl LocaleService for FixedLocale {
    fn current_timezone(&self) -> ServiceResult<String> {
        Ok(self.zone.clone())
    }
}
