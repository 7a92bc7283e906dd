//! In-memory calendar backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use calprov_core::{
    AccessLevel, CalendarCreateRequest, CalendarDescriptor, CalendarHandle, CalendarSource,
    EventDescriptor, SourceRef,
};
use tracing::debug;

use crate::BoxFuture;
use crate::calendar::CalendarService;
use crate::error::{ServiceError, ServiceResult};

const SERVICE: &str = "memory-calendar";

/// Operations of [`MemoryCalendarService`] that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarOperation {
    /// `list_calendars`
    List,
    /// `create_calendar`
    Create,
    /// `delete_calendar`
    Delete,
    /// `create_event`
    CreateEvent,
}

/// An event accepted by [`MemoryCalendarService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    /// Identifier assigned to the event.
    pub id: String,
    /// Calendar the event was written to.
    pub calendar: CalendarHandle,
    /// The event as submitted.
    pub event: EventDescriptor,
}

#[derive(Debug, Default)]
struct State {
    calendars: Vec<CalendarDescriptor>,
    create_requests: Vec<CalendarCreateRequest>,
    events: Vec<RecordedEvent>,
    deleted: Vec<CalendarHandle>,
    failures: HashMap<CalendarOperation, String>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn check(&self, op: CalendarOperation) -> ServiceResult<()> {
        match self.failures.get(&op) {
            Some(message) => Err(ServiceError::backend(message.clone()).with_service(SERVICE)),
            None => Ok(()),
        }
    }

    fn source_for(&self, source: &SourceRef) -> ServiceResult<(CalendarSource, Option<String>)> {
        match source {
            SourceRef::Cloud { source_id } => self
                .calendars
                .iter()
                .map(|cal| &cal.source)
                .find(|src| src.id.as_deref() == Some(source_id.as_str()))
                .map(|src| (src.clone(), None))
                .ok_or_else(|| {
                    ServiceError::invalid_request(format!("unknown source id {}", source_id))
                        .with_service(SERVICE)
                }),
            SourceRef::LocalAccount {
                source_name,
                owner_account,
            } => Ok((
                CalendarSource::new(source_name.clone()).with_local_account(true),
                owner_account.clone(),
            )),
        }
    }
}

/// Calendar backend that lives entirely in memory.
///
/// Every accepted call is recorded so tests can inspect exactly what was
/// submitted. Individual operations can be switched to fail with
/// [`MemoryCalendarService::fail`].
#[derive(Debug, Default)]
pub struct MemoryCalendarService {
    state: Mutex<State>,
}

impl MemoryCalendarService {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `calendars`.
    pub fn with_calendars(calendars: Vec<CalendarDescriptor>) -> Self {
        Self {
            state: Mutex::new(State {
                calendars,
                ..State::default()
            }),
        }
    }

    /// Makes every later call to `op` fail with a backend error.
    pub fn fail(&self, op: CalendarOperation, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(op, message.into());
        }
    }

    /// Clears all injected failures.
    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.clear();
        }
    }

    /// Calendars currently held, including ones created through the service.
    pub fn calendars(&self) -> Vec<CalendarDescriptor> {
        self.snapshot(|s| s.calendars.clone())
    }

    /// Every accepted creation request, in order.
    pub fn create_requests(&self) -> Vec<CalendarCreateRequest> {
        self.snapshot(|s| s.create_requests.clone())
    }

    /// Every accepted event, in order.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.snapshot(|s| s.events.clone())
    }

    /// Handles of calendars deleted through the service, in order.
    pub fn deleted(&self) -> Vec<CalendarHandle> {
        self.snapshot(|s| s.deleted.clone())
    }

    /// Returns true if a calendar with this handle is currently held.
    pub fn contains(&self, handle: &CalendarHandle) -> bool {
        self.snapshot(|s| s.calendars.iter().any(|c| c.id == handle.as_str()))
    }

    fn snapshot<T: Default>(&self, f: impl FnOnce(&State) -> T) -> T {
        self.state.lock().map(|s| f(&*s)).unwrap_or_default()
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| ServiceError::internal("calendar state poisoned").with_service(SERVICE))
    }

    fn list_sync(&self) -> ServiceResult<Vec<CalendarDescriptor>> {
        let state = self.lock()?;
        state.check(CalendarOperation::List)?;
        Ok(state.calendars.clone())
    }

    fn create_sync(&self, request: CalendarCreateRequest) -> ServiceResult<CalendarHandle> {
        let mut state = self.lock()?;
        state.check(CalendarOperation::Create)?;
        let (source, owner_account) = state.source_for(&request.source)?;

        let id = state.next_id("memcal");
        let mut calendar = CalendarDescriptor::new(id.clone(), request.title.clone(), source)
            .with_color(request.color.clone())
            .with_access_level(AccessLevel::Owner)
            .with_entity_type(request.entity_type);
        calendar.owner_account = owner_account;

        debug!(calendar = %id, title = %request.title, "memory calendar created");
        state.calendars.push(calendar);
        state.create_requests.push(request);
        Ok(CalendarHandle::new(id))
    }

    fn delete_sync(&self, handle: &CalendarHandle) -> ServiceResult<()> {
        let mut state = self.lock()?;
        state.check(CalendarOperation::Delete)?;
        let before = state.calendars.len();
        state.calendars.retain(|c| c.id != handle.as_str());
        if state.calendars.len() == before {
            return Err(
                ServiceError::not_found(format!("no calendar {}", handle)).with_service(SERVICE)
            );
        }
        state.deleted.push(handle.clone());
        Ok(())
    }

    fn create_event_sync(
        &self,
        handle: &CalendarHandle,
        event: EventDescriptor,
    ) -> ServiceResult<String> {
        let mut state = self.lock()?;
        state.check(CalendarOperation::CreateEvent)?;
        if !state.calendars.iter().any(|c| c.id == handle.as_str()) {
            return Err(
                ServiceError::not_found(format!("no calendar {}", handle)).with_service(SERVICE)
            );
        }
        let id = state.next_id("memevt");
        state.events.push(RecordedEvent {
            id: id.clone(),
            calendar: handle.clone(),
            event,
        });
        Ok(id)
    }
}

impl CalendarService for MemoryCalendarService {
    fn name(&self) -> &str {
        SERVICE
    }

    fn list_calendars(&self) -> BoxFuture<'_, ServiceResult<Vec<CalendarDescriptor>>> {
        Box::pin(async move { self.list_sync() })
    }

    fn create_calendar(
        &self,
        request: CalendarCreateRequest,
    ) -> BoxFuture<'_, ServiceResult<CalendarHandle>> {
        Box::pin(async move { self.create_sync(request) })
    }

    fn delete_calendar(&self, handle: &CalendarHandle) -> BoxFuture<'_, ServiceResult<()>> {
        let handle = handle.clone();
        Box::pin(async move { self.delete_sync(&handle) })
    }

    fn create_event(
        &self,
        handle: &CalendarHandle,
        event: EventDescriptor,
    ) -> BoxFuture<'_, ServiceResult<String>> {
        let handle = handle.clone();
        Box::pin(async move { self.create_event_sync(&handle, event) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceErrorCode;
    use calprov_core::EventWindow;
    use chrono::{TimeZone, Utc};

    fn icloud_calendar() -> CalendarDescriptor {
        CalendarDescriptor::new(
            "cal-work",
            "Work",
            CalendarSource::new("iCloud").with_id("src-icloud"),
        )
    }

    fn event() -> EventDescriptor {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap();
        EventDescriptor::timed("Standup", EventWindow::new(start, end).unwrap(), "UTC")
    }

    #[tokio::test]
    async fn create_cloud_calendar_inherits_source() {
        let service = MemoryCalendarService::with_calendars(vec![icloud_calendar()]);
        let handle = service
            .create_calendar(CalendarCreateRequest::cloud("Trips", "#ff0000", "src-icloud"))
            .await
            .unwrap();

        let calendars = service.list_calendars().await.unwrap();
        let created = calendars.iter().find(|c| c.id == handle.as_str()).unwrap();
        assert_eq!(created.source.id.as_deref(), Some("src-icloud"));
        assert!(created.is_owned());
        assert_eq!(service.create_requests().len(), 1);
    }

    #[tokio::test]
    async fn create_with_unknown_source_is_rejected() {
        let service = MemoryCalendarService::new();
        let err = service
            .create_calendar(CalendarCreateRequest::cloud("Trips", "#ff0000", "missing"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ServiceErrorCode::InvalidRequest);
        assert!(service.create_requests().is_empty());
    }

    #[tokio::test]
    async fn local_account_calendar_is_local() {
        let service = MemoryCalendarService::new();
        let handle = service
            .create_calendar(CalendarCreateRequest::local_account(
                "Trips",
                "#ff0000",
                "Local",
                Some("me".to_string()),
            ))
            .await
            .unwrap();

        let created = service
            .calendars()
            .into_iter()
            .find(|c| c.id == handle.as_str())
            .unwrap();
        assert!(created.source.is_local_account);
        assert_eq!(created.owner_account.as_deref(), Some("me"));
    }

    #[tokio::test]
    async fn delete_unknown_calendar_is_not_found() {
        let service = MemoryCalendarService::new();
        let err = service
            .delete_calendar(&CalendarHandle::new("ghost"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ServiceErrorCode::NotFound);
    }

    #[tokio::test]
    async fn events_are_recorded_per_calendar() {
        let service = MemoryCalendarService::with_calendars(vec![icloud_calendar()]);
        let handle = CalendarHandle::new("cal-work");

        let id = service.create_event(&handle, event()).await.unwrap();

        let events = service.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id);
        assert_eq!(events[0].calendar, handle);
        assert_eq!(events[0].event.title, "Standup");

        let err = service
            .create_event(&CalendarHandle::new("ghost"), event())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ServiceErrorCode::NotFound);
    }

    #[tokio::test]
    async fn injected_failures() {
        let service = MemoryCalendarService::with_calendars(vec![icloud_calendar()]);
        service.fail(CalendarOperation::List, "backend offline");

        let err = service.list_calendars().await.unwrap_err();
        assert_eq!(err.code(), ServiceErrorCode::Backend);
        assert_eq!(err.message(), "backend offline");

        service.clear_failures();
        assert_eq!(service.list_calendars().await.unwrap().len(), 1);
    }
}
