//! App calendar creation and deletion.

use calprov_core::{CalendarCreateRequest, CalendarDescriptor, CalendarHandle, SourceRef};
use calprov_services::CalendarService;
use tracing::{debug, info, warn};

use crate::error::{ProvisionError, ProvisionResult};
use crate::resolver::SourceResolver;

/// Builds a creation request anchored to the source `resolver` picks from
/// `calendars`.
pub fn build_create_request(
    resolver: &SourceResolver,
    calendars: &[CalendarDescriptor],
    title: &str,
    color: &str,
) -> ProvisionResult<CalendarCreateRequest> {
    let request = match resolver.resolve(calendars)? {
        SourceRef::Cloud { source_id } => CalendarCreateRequest::cloud(title, color, source_id),
        SourceRef::LocalAccount {
            source_name,
            owner_account,
        } => CalendarCreateRequest::local_account(title, color, source_name, owner_account),
    };
    debug!(platform = %resolver.platform(), source = ?request.source, "built create request");
    Ok(request)
}

/// Creates the app calendar and returns its handle.
///
/// # Errors
///
/// [`ProvisionError::SourceNotFound`] if no parent source qualifies;
/// [`ProvisionError::CreateFailed`] if the backend rejects the request.
pub async fn create_calendar(
    service: &dyn CalendarService,
    resolver: &SourceResolver,
    calendars: &[CalendarDescriptor],
    title: &str,
    color: &str,
) -> ProvisionResult<CalendarHandle> {
    let request = build_create_request(resolver, calendars, title, color)?;
    match service.create_calendar(request).await {
        Ok(handle) => {
            info!(backend = service.name(), calendar = %handle, title, "created calendar");
            Ok(handle)
        }
        Err(e) => {
            warn!(backend = service.name(), error = %e, title, "calendar creation failed");
            Err(ProvisionError::CreateFailed(e))
        }
    }
}

/// Deletes the calendar behind `handle`.
///
/// Returns `false` without calling the backend when there is no handle.
/// Backend errors (including an unknown handle) are passed through.
pub async fn delete_calendar(
    service: &dyn CalendarService,
    handle: Option<&CalendarHandle>,
) -> ProvisionResult<bool> {
    let Some(handle) = handle else {
        debug!("no calendar handle, nothing to delete");
        return Ok(false);
    };
    service.delete_calendar(handle).await?;
    info!(backend = service.name(), calendar = %handle, "deleted calendar");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calprov_core::{AccessLevel, CalendarSource, EntityType, Platform};
    use calprov_services::ServiceErrorCode;
    use calprov_services::memory::{CalendarOperation, MemoryCalendarService};

    fn calendars() -> Vec<CalendarDescriptor> {
        vec![
            CalendarDescriptor::new(
                "cal-work",
                "Work",
                CalendarSource::new("iCloud").with_id("src-icloud"),
            ),
            CalendarDescriptor::new("cal-home", "Home", CalendarSource::new("Local"))
                .with_access_level(AccessLevel::Owner)
                .with_owner_account("me"),
        ]
    }

    #[test]
    fn ios_request_is_cloud_anchored() {
        let resolver = SourceResolver::new(Platform::Ios, "iCloud");
        let request = build_create_request(&resolver, &calendars(), "Trips", "#ff0000").unwrap();

        assert_eq!(request.title, "Trips");
        assert_eq!(request.name, "Trips");
        assert_eq!(request.color, "#ff0000");
        assert_eq!(request.entity_type, EntityType::Event);
        assert_eq!(request.access_level, AccessLevel::Owner);
        assert_eq!(
            request.source,
            SourceRef::Cloud {
                source_id: "src-icloud".to_string()
            }
        );
    }

    #[test]
    fn android_request_wire_shape() {
        let resolver = SourceResolver::new(Platform::Android, "iCloud");
        let request = build_create_request(&resolver, &calendars(), "Trips", "#ff0000").unwrap();

        insta::assert_json_snapshot!(request, @r###"
        {
          "title": "Trips",
          "name": "Trips",
          "color": "#ff0000",
          "entity_type": "event",
          "access_level": "owner",
          "source": {
            "kind": "local_account",
            "source_name": "Local",
            "owner_account": "me"
          }
        }
        "###);
    }

    #[tokio::test]
    async fn create_returns_backend_handle() {
        let backend = MemoryCalendarService::with_calendars(calendars());
        let resolver = SourceResolver::new(Platform::Ios, "iCloud");

        let handle = create_calendar(&backend, &resolver, &calendars(), "Trips", "#ff0000")
            .await
            .unwrap();
        assert!(backend.contains(&handle));
    }

    #[tokio::test]
    async fn create_failure_is_typed() {
        let backend = MemoryCalendarService::with_calendars(calendars());
        backend.fail(CalendarOperation::Create, "quota exceeded");
        let resolver = SourceResolver::new(Platform::Ios, "iCloud");

        let err = create_calendar(&backend, &resolver, &calendars(), "Trips", "#ff0000")
            .await
            .unwrap_err();
        match err {
            ProvisionError::CreateFailed(source) => {
                assert_eq!(source.code(), ServiceErrorCode::Backend);
                assert_eq!(source.message(), "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn create_without_source_never_reaches_backend() {
        let backend = MemoryCalendarService::new();
        let resolver = SourceResolver::new(Platform::Android, "iCloud");

        let err = create_calendar(&backend, &resolver, &[], "Trips", "#ff0000")
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::SourceNotFound { .. }));
        assert!(backend.create_requests().is_empty());
    }

    #[tokio::test]
    async fn delete_absent_handle_is_noop() {
        let backend = MemoryCalendarService::new();
        backend.fail(CalendarOperation::Delete, "should not be called");
        assert!(!delete_calendar(&backend, None).await.unwrap());
    }

    #[tokio::test]
    async fn delete_unknown_handle_propagates() {
        let backend = MemoryCalendarService::new();
        let err = delete_calendar(&backend, Some(&CalendarHandle::new("ghost")))
            .await
            .unwrap_err();
        match err {
            ProvisionError::Service(source) => assert_eq!(source.code(), ServiceErrorCode::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }
}
