//! Device locale: timezone resolution.

use crate::error::ServiceResult;
#[cfg(feature = "system-locale")]
use crate::error::ServiceError;

/// Zone name used when the host zone cannot be determined.
pub const FALLBACK_TIMEZONE: &str = "UTC";

/// Resolves the device's current timezone.
pub trait LocaleService: Send + Sync {
    /// Returns the current IANA zone name (e.g. "Europe/Paris").
    fn current_timezone(&self) -> ServiceResult<String>;
}

/// Reads the host timezone from the operating system.
///
/// When the OS gives no answer, or names a zone the tz database does not
/// know, [`FALLBACK_TIMEZONE`] is used and a warning is logged.
#[cfg(feature = "system-locale")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocale;

#[cfg(feature = "system-locale")]
impl SystemLocale {
    /// Creates a new system locale reader.
    pub fn new() -> Self {
        Self
    }

    fn or_fallback(zone: ServiceResult<String>) -> String {
        zone.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "host timezone unusable, using {}", FALLBACK_TIMEZONE);
            FALLBACK_TIMEZONE.to_string()
        })
    }

    fn validate(zone: String) -> ServiceResult<String> {
        match zone.parse::<chrono_tz::Tz>() {
            Ok(_) => Ok(zone),
            Err(e) => Err(
                ServiceError::locale(format!("unknown timezone {:?}: {}", zone, e))
                    .with_service("system-locale"),
            ),
        }
    }
}

#[cfg(feature = "system-locale")]
impl LocaleService for SystemLocale {
    fn current_timezone(&self) -> ServiceResult<String> {
        let zone = iana_time_zone::get_timezone()
            .map_err(|e| ServiceError::locale(e.to_string()).with_service("system-locale"))
            .and_then(Self::validate);
        Ok(Self::or_fallback(zone))
    }
}
