//! CalendarService trait definition.
//!
//! [`CalendarService`] is the narrow view of the host calendar database this
//! library needs: enumerate calendars, create and delete one, and add events
//! to it.

use calprov_core::{CalendarCreateRequest, CalendarDescriptor, CalendarHandle, EventDescriptor};

use crate::BoxFuture;
use crate::error::ServiceResult;

/// Host calendar database.
///
/// # Example Implementation
///
/// ```ignore
/// struct EventKitCalendars { store: EventStore }
///
/// impl CalendarService for EventKitCalendars {
///     fn name(&self) -> &str { "eventkit" }
///
///     fn list_calendars(&self) -> BoxFuture<'_, ServiceResult<Vec<CalendarDescriptor>>> {
///         Box::pin(async move { Ok(self.store.calendars().map(to_descriptor).collect()) })
///     }
///     // ... other methods
/// }
/// ```
pub trait CalendarService: Send + Sync {
    /// Returns the name of this backend, used in logs and errors.
    fn name(&self) -> &str;

    /// Lists every calendar visible to the app.
    fn list_calendars(&self) -> BoxFuture<'_, ServiceResult<Vec<CalendarDescriptor>>>;

    /// Creates a calendar and returns its handle.
    ///
    /// # Errors
    ///
    /// Fails on an invalid request (e.g. unknown source) or a backend error.
    fn create_calendar(
        &self,
        request: CalendarCreateRequest,
    ) -> BoxFuture<'_, ServiceResult<CalendarHandle>>;

    /// Deletes the calendar referenced by `handle`.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error if the handle is unknown.
    fn delete_calendar(&self, handle: &CalendarHandle) -> BoxFuture<'_, ServiceResult<()>>;

    /// Adds an event to the calendar referenced by `handle` and returns the
    /// new event's identifier.
    fn create_event(
        &self,
        handle: &CalendarHandle,
        event: EventDescriptor,
    ) -> BoxFuture<'_, ServiceResult<String>>;
}
