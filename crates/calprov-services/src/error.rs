//! Error types for host service calls.
//!
//! Every adapter (permission prompt, calendar backend, secure store, locale)
//! reports failures as a [`ServiceError`] carrying a coarse
//! [`ServiceErrorCode`] and the name of the service that raised it.

use std::fmt;
use thiserror::Error;

/// The category of a service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceErrorCode {
    /// The host refused the call for lack of permission.
    PermissionDenied,
    /// The referenced calendar or event does not exist.
    NotFound,
    /// The request was rejected as malformed.
    InvalidRequest,
    /// The backend failed while handling a valid request.
    Backend,
    /// The secure store could not be read or written.
    Storage,
    /// The device timezone could not be resolved.
    Locale,
    /// Unexpected state inside an adapter.
    Internal,
}

impl ServiceErrorCode {
    /// Returns a snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::InvalidRequest => "invalid_request",
            Self::Backend => "backend",
            Self::Storage => "storage",
            Self::Locale => "locale",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error reported by a host service adapter.
#[derive(Debug, Error)]
pub struct ServiceError {
    code: ServiceErrorCode,
    message: String,
    /// Adapter that raised the error (e.g. "memory-calendar", "file-store").
    service: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ServiceError {
    /// Creates a new service error with the given code and message.
    pub fn new(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            service: None,
            source: None,
        }
    }

    /// Creates a permission denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::PermissionDenied, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::NotFound, message)
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::InvalidRequest, message)
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::Backend, message)
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::Storage, message)
    }

    /// Creates a locale error.
    pub fn locale(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::Locale, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::Internal, message)
    }

    /// Sets the name of the service that raised this error.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ServiceErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the service name, if set.
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Returns a copy without the boxed source, for reporting the same
    /// failure more than once.
    pub fn detached(&self) -> Self {
        Self {
            code: self.code,
            message: self.message.clone(),
            service: self.service.clone(),
            source: None,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref service) = self.service {
            write!(f, "[{}] ", service)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_names() {
        assert_eq!(ServiceErrorCode::PermissionDenied.as_str(), "permission_denied");
        assert_eq!(ServiceErrorCode::NotFound.to_string(), "not_found");
    }

    #[test]
    fn service_error_creation() {
        let err = ServiceError::backend("calendar provider crashed");
        assert_eq!(err.code(), ServiceErrorCode::Backend);
        assert_eq!(err.message(), "calendar provider crashed");
        assert!(err.service().is_none());
    }

    #[test]
    fn service_error_display() {
        let err = ServiceError::not_found("no calendar cal-7").with_service("memory-calendar");
        let display = err.to_string();
        assert!(display.contains("[memory-calendar]"));
        assert!(display.contains("not_found"));
        assert!(display.contains("no calendar cal-7"));
    }

    #[test]
    fn service_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = ServiceError::storage("failed to write store").with_source(io_err);
        assert!(err.source().is_some());
        assert!(err.detached().source().is_none());
        assert_eq!(err.detached().code(), ServiceErrorCode::Storage);
    }
}
