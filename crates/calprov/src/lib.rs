//! Calendar provisioning for mobile hosts.
//!
//! This crate obtains calendar access, creates a dedicated app-owned
//! calendar, keeps its handle in a secure store slot, and writes timed
//! events with an alert to it:
//!
//! - Permission negotiation ([`CalendarProvisioner::request_access`])
//! - Calendar listing and parent source resolution ([`SourceResolver`])
//! - Calendar creation and deletion ([`CalendarProvisioner::provision_calendar`],
//!   [`CalendarProvisioner::deprovision_calendar`])
//! - Event writes ([`CalendarProvisioner::add_event`])
//!
//! Host services are injected through the traits in [`calprov_services`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use calprov::{CalendarProvisioner, ProvisionerConfig, Services};
//! use calprov_core::Platform;
//! use calprov_services::SystemLocale;
//! use calprov_services::memory::{MemoryCalendarService, StaticPermissions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProvisionerConfig::load()?.with_platform(Platform::Android);
//!     let services = Services::new(
//!         Arc::new(StaticPermissions::granted()),
//!         Arc::new(MemoryCalendarService::new()),
//!         Arc::new(config.open_store()?),
//!         Arc::new(SystemLocale::new()),
//!     );
//!     let provisioner = CalendarProvisioner::new(services, &config)?;
//!
//!     if provisioner.request_access().await?.is_granted() {
//!         provisioner.provision_calendar("Trips", "#ff0000", "trip-cal").await?;
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod lifecycle;
pub mod negotiator;
mod provisioner;
pub mod resolver;
mod slots;
pub mod writer;

pub use config::{ProvisionerConfig, ReprovisionPolicy};
pub use error::{ProvisionError, ProvisionResult};
pub use negotiator::{GRANTED, PermissionOutcome};
pub use provisioner::{CalendarProvisioner, Services};
pub use resolver::SourceResolver;
pub use slots::SlotLocks;
