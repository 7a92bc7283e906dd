//! Event writes to the app calendar.

use calprov_core::{CalendarHandle, EventDescriptor, EventWindow};
use calprov_services::{CalendarService, LocaleService};
use tracing::{debug, warn};

use crate::error::{ProvisionError, ProvisionResult};

/// Builds a timed event in the device's current timezone with one alert at
/// the start instant.
pub fn build_event(
    locale: &dyn LocaleService,
    title: &str,
    window: EventWindow,
) -> ProvisionResult<EventDescriptor> {
    let zone = locale.current_timezone()?;
    Ok(EventDescriptor::timed(title, window, zone))
}

/// Writes `event` to the calendar behind `handle` and returns the new
/// event's identifier.
pub async fn write_event(
    service: &dyn CalendarService,
    handle: &CalendarHandle,
    event: EventDescriptor,
) -> ProvisionResult<String> {
    let title = event.title.clone();
    match service.create_event(handle, event).await {
        Ok(id) => {
            debug!(calendar = %handle, event = %id, title = %title, "event written");
            Ok(id)
        }
        Err(e) => {
            warn!(calendar = %handle, error = %e, title = %title, "event write failed");
            Err(ProvisionError::WriteFailed(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calprov_core::{Alarm, CalendarSource, CalendarDescriptor};
    use calprov_services::memory::{CalendarOperation, FixedLocale, MemoryCalendarService};
    use chrono::{TimeZone, Utc};

    fn window() -> EventWindow {
        EventWindow::new(
            Utc.with_ymd_and_hms(2025, 9, 3, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 9, 3, 15, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn event_uses_locale_zone() {
        let event = build_event(&FixedLocale::new("America/Sao_Paulo"), "Dentist", window()).unwrap();
        assert_eq!(event.time_zone, "America/Sao_Paulo");
        assert_eq!(event.alarms, vec![Alarm::at_start()]);
        assert_eq!(event.start_date, window().start());
    }

    #[tokio::test]
    async fn write_failure_is_typed() {
        let backend = MemoryCalendarService::with_calendars(vec![CalendarDescriptor::new(
            "cal-1",
            "App",
            CalendarSource::new("Local"),
        )]);
        backend.fail(CalendarOperation::CreateEvent, "read-only calendar");

        let event = build_event(&FixedLocale::new("UTC"), "Dentist", window()).unwrap();
        let err = write_event(&backend, &CalendarHandle::new("cal-1"), event)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::WriteFailed(_)));
        assert!(backend.events().is_empty());
    }
}
