//! Host service traits and reference adapters.
//!
//! The provisioner talks to the host through four narrow traits:
//!
//! - [`PermissionService`] - OS permission prompts
//! - [`CalendarService`] - the calendar database
//! - [`SecureStore`] - persistent key-value storage for calendar handles
//! - [`LocaleService`] - device timezone
//!
//! Async methods return a [`BoxFuture`] so the traits stay object-safe and
//! can be injected as `Arc<dyn Trait>`.
//!
//! The [`memory`] module provides in-process implementations of every trait.
//! [`FileSecureStore`] and [`SystemLocale`] are usable on desktop hosts.

use std::future::Future;
use std::pin::Pin;

pub mod calendar;
pub mod error;
#[cfg(feature = "file-store")]
pub mod file_store;
pub mod locale;
pub mod memory;
pub mod permission;
pub mod store;

pub use calendar::CalendarService;
pub use error::{ServiceError, ServiceErrorCode, ServiceResult};
#[cfg(feature = "file-store")]
pub use file_store::FileSecureStore;
pub use locale::{FALLBACK_TIMEZONE, LocaleService};
#[cfg(feature = "system-locale")]
pub use locale::SystemLocale;
pub use permission::{PermissionCategory, PermissionService, PermissionStatus};
pub use store::SecureStore;

/// A boxed future for async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
