//! The calendar provisioning service.
//!
//! [`CalendarProvisioner`] ties the permission negotiator, source resolver,
//! calendar lifecycle and event writer together around named secure-store
//! slots. Each slot holds at most one calendar handle:
//!
//! ```text
//!  Unprovisioned --provision_calendar--> Provisioned
//!  Provisioned   --deprovision_calendar--> Unprovisioned
//!  Provisioned   --add_event--> Provisioned
//! ```

use std::sync::Arc;

use calprov_core::{CalendarDescriptor, CalendarHandle, EventWindow, Platform};
use calprov_services::{CalendarService, LocaleService, PermissionService, SecureStore};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{ProvisionerConfig, ReprovisionPolicy};
use crate::error::{ProvisionError, ProvisionResult};
use crate::lifecycle;
use crate::negotiator::{self, PermissionOutcome};
use crate::resolver::{self, SourceResolver};
use crate::slots::SlotLocks;
use crate::writer;

/// The host services a provisioner runs against.
#[derive(Clone)]
pub struct Services {
    /// Permission prompts.
    pub permissions: Arc<dyn PermissionService>,
    /// Calendar database.
    pub calendars: Arc<dyn CalendarService>,
    /// Handle storage.
    pub store: Arc<dyn SecureStore>,
    /// Timezone resolution.
    pub locale: Arc<dyn LocaleService>,
}

impl Services {
    /// Bundles the four host services.
    pub fn new(
        permissions: Arc<dyn PermissionService>,
        calendars: Arc<dyn CalendarService>,
        store: Arc<dyn SecureStore>,
        locale: Arc<dyn LocaleService>,
    ) -> Self {
        Self {
            permissions,
            calendars,
            store,
            locale,
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("calendars", &self.calendars.name())
            .finish_non_exhaustive()
    }
}

/// Provisions an app-owned calendar and writes events to it.
#[derive(Debug)]
pub struct CalendarProvisioner {
    services: Services,
    resolver: SourceResolver,
    on_existing: ReprovisionPolicy,
    slots: SlotLocks,
}

impl CalendarProvisioner {
    /// Creates a provisioner from host services and configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration names no platform and none can be
    /// detected for the build target.
    pub fn new(services: Services, config: &ProvisionerConfig) -> ProvisionResult<Self> {
        let platform = config.resolved_platform()?;
        Ok(Self {
            services,
            resolver: SourceResolver::new(platform, config.cloud_source_name.clone()),
            on_existing: config.on_existing,
            slots: SlotLocks::new(),
        })
    }

    /// Platform this provisioner targets.
    pub fn platform(&self) -> Platform {
        self.resolver.platform()
    }

    /// Asks for calendar (and, where separate, reminder) access.
    ///
    /// Use [`PermissionOutcome::sentinel`] for the `"granted"`/absent form.
    #[tracing::instrument(skip(self), fields(platform = %self.platform()))]
    pub async fn request_access(&self) -> ProvisionResult<PermissionOutcome> {
        Ok(negotiator::request_access(self.services.permissions.as_ref(), self.platform()).await?)
    }

    /// Lists calendars visible to the app; empty when access is denied.
    #[tracing::instrument(skip(self), fields(platform = %self.platform()))]
    pub async fn list_calendars(&self) -> ProvisionResult<Vec<CalendarDescriptor>> {
        resolver::list_calendars(
            self.services.permissions.as_ref(),
            self.services.calendars.as_ref(),
            self.platform(),
        )
        .await
    }

    /// Returns the handle stored in `slot`, if any.
    pub async fn stored_handle(&self, slot: &str) -> ProvisionResult<Option<CalendarHandle>> {
        Ok(self.services.store.get(slot).await?.map(CalendarHandle::from))
    }

    /// Creates the app calendar and stores its handle in `slot`.
    ///
    /// What happens when `slot` is already occupied depends on the
    /// configured [`ReprovisionPolicy`].
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::AlreadyProvisioned`] under `Reject` when occupied
    /// - [`ProvisionError::SourceNotFound`] when no parent source qualifies,
    ///   including when access was denied and no calendars are visible
    /// - [`ProvisionError::CreateFailed`] when the backend fails
    #[tracing::instrument(skip(self), fields(platform = %self.platform()))]
    pub async fn provision_calendar(
        &self,
        title: &str,
        color: &str,
        slot: &str,
    ) -> ProvisionResult<CalendarHandle> {
        let _guard = self.slots.acquire(slot).await;

        let existing = self.stored_handle(slot).await?;
        if let Some(handle) = &existing {
            if self.on_existing == ReprovisionPolicy::Reject {
                warn!(calendar = %handle, "slot already provisioned");
                return Err(ProvisionError::AlreadyProvisioned {
                    slot: slot.to_string(),
                    handle: handle.clone(),
                });
            }
        }

        let calendars = self.list_calendars().await?;
        let handle = lifecycle::create_calendar(
            self.services.calendars.as_ref(),
            &self.resolver,
            &calendars,
            title,
            color,
        )
        .await?;

        if let Err(e) = self.services.store.set(slot, handle.as_str()).await {
            warn!(calendar = %handle, error = %e, "failed to store handle, removing new calendar");
            if let Err(cleanup) = self.services.calendars.delete_calendar(&handle).await {
                warn!(calendar = %handle, error = %cleanup, "new calendar left orphaned");
            }
            return Err(e.into());
        }
        info!(calendar = %handle, "slot provisioned");

        if let Some(old) = existing {
            self.retire(&old).await;
        }
        Ok(handle)
    }

    /// Handles the calendar a re-provisioned slot used to point at.
    async fn retire(&self, old: &CalendarHandle) {
        match self.on_existing {
            ReprovisionPolicy::Replace => {
                if let Err(e) = self.services.calendars.delete_calendar(old).await {
                    warn!(calendar = %old, error = %e, "failed to delete replaced calendar");
                } else {
                    info!(calendar = %old, "deleted replaced calendar");
                }
            }
            ReprovisionPolicy::AllowDuplicate => {
                warn!(calendar = %old, "previous calendar is no longer referenced");
            }
            ReprovisionPolicy::Reject => {}
        }
    }

    /// Deletes the calendar stored in `slot` and clears the slot.
    ///
    /// Returns `false` when the slot was already empty, so calling this twice
    /// has the same effect as calling it once. The slot is only cleared once
    /// the backend has deleted the calendar.
    #[tracing::instrument(skip(self))]
    pub async fn deprovision_calendar(&self, slot: &str) -> ProvisionResult<bool> {
        let _guard = self.slots.acquire(slot).await;

        let handle = self.stored_handle(slot).await?;
        let deleted =
            lifecycle::delete_calendar(self.services.calendars.as_ref(), handle.as_ref()).await?;
        if deleted {
            self.services.store.delete(slot).await?;
            info!("slot deprovisioned");
        } else {
            debug!("slot already empty");
        }
        Ok(deleted)
    }

    /// Adds a timed event with a start-aligned alert to the calendar stored
    /// in `slot`, returning the new event's identifier.
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::InvalidEventWindow`] when `end` precedes `start`
    /// - [`ProvisionError::SlotEmpty`] when nothing was provisioned
    /// - [`ProvisionError::WriteFailed`] when the backend fails
    #[tracing::instrument(skip(self))]
    pub async fn add_event(
        &self,
        slot: &str,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ProvisionResult<String> {
        let window = EventWindow::new(start, end)?;
        let _guard = self.slots.acquire(slot).await;

        let handle = self
            .stored_handle(slot)
            .await?
            .ok_or_else(|| ProvisionError::slot_empty(slot))?;
        let event = writer::build_event(self.services.locale.as_ref(), title, window)?;
        writer::write_event(self.services.calendars.as_ref(), &handle, event).await
    }
}
