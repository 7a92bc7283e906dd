//! Calendar listing and parent source resolution.

use calprov_core::{CalendarDescriptor, Platform, SourceRef};
use calprov_services::{CalendarService, PermissionService};
use tracing::{debug, warn};

use crate::error::{ProvisionError, ProvisionResult};
use crate::negotiator::request_access;

/// Lists the calendars visible to the app.
///
/// Negotiates access first; a denial yields an empty list rather than an
/// error. Otherwise returns the calendar service's enumeration unchanged.
pub async fn list_calendars(
    permissions: &dyn PermissionService,
    calendars: &dyn CalendarService,
    platform: Platform,
) -> ProvisionResult<Vec<CalendarDescriptor>> {
    let outcome = request_access(permissions, platform).await?;
    if !outcome.is_granted() {
        warn!(%platform, "listing calendars without access, returning none");
        return Ok(Vec::new());
    }

    let list = calendars.list_calendars().await?;
    debug!(backend = calendars.name(), count = list.len(), "listed calendars");
    Ok(list)
}

/// Picks the parent source for a new calendar.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    platform: Platform,
    cloud_source_name: String,
}

impl SourceResolver {
    /// Creates a resolver for `platform` that recognizes the given cloud
    /// source name on the Apple family.
    pub fn new(platform: Platform, cloud_source_name: impl Into<String>) -> Self {
        Self {
            platform,
            cloud_source_name: cloud_source_name.into(),
        }
    }

    /// Platform this resolver targets.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Resolves the source among `calendars`.
    ///
    /// - Apple family: the first calendar whose source is named like the
    ///   cloud source and carries an identifier.
    /// - Android: the first calendar the app owns; its source name and owner
    ///   account anchor a local account.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::SourceNotFound`] when nothing qualifies.
    pub fn resolve(&self, calendars: &[CalendarDescriptor]) -> ProvisionResult<SourceRef> {
        match self.platform {
            Platform::Ios => self.resolve_cloud(calendars),
            Platform::Android => self.resolve_local(calendars),
        }
    }

    fn resolve_cloud(&self, calendars: &[CalendarDescriptor]) -> ProvisionResult<SourceRef> {
        calendars
            .iter()
            .filter(|cal| cal.source.name == self.cloud_source_name)
            .find_map(|cal| cal.source.id.clone())
            .map(|source_id| SourceRef::Cloud { source_id })
            .ok_or_else(|| {
                ProvisionError::source_not_found(
                    self.platform,
                    format!(
                        "no {:?} source with an id among {} calendars",
                        self.cloud_source_name,
                        calendars.len()
                    ),
                )
            })
    }

    fn resolve_local(&self, calendars: &[CalendarDescriptor]) -> ProvisionResult<SourceRef> {
        calendars
            .iter()
            .find(|cal| cal.is_owned())
            .map(|cal| SourceRef::LocalAccount {
                source_name: cal.source.name.clone(),
                owner_account: cal.owner_account.clone(),
            })
            .ok_or_else(|| {
                ProvisionError::source_not_found(
                    self.platform,
                    format!("no owner-level calendar among {} calendars", calendars.len()),
                )
            })
    }
}
