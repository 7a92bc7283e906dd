//! Calendar types.
//!
//! This module holds the read-only [`CalendarDescriptor`] reported by a host
//! calendar service, the opaque [`CalendarHandle`] returned when a calendar is
//! created, and the [`CalendarCreateRequest`] used to create one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source name used by the Apple family for cloud-synced calendars.
pub const DEFAULT_CLOUD_SOURCE_NAME: &str = "iCloud";

/// Host platform family.
///
/// The two families differ in how permissions are split and in how a new
/// calendar is anchored to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Apple family (iOS, iPadOS). Calendars hang off a cloud-sync source.
    Ios,
    /// Android. Calendars hang off a local account owned by the app.
    Android,
}

impl Platform {
    /// Returns the platform of the compilation target, if it is a known family.
    pub fn detect() -> Option<Self> {
        if cfg!(any(target_os = "ios", target_os = "macos")) {
            Some(Self::Ios)
        } else if cfg!(target_os = "android") {
            Some(Self::Android)
        } else {
            None
        }
    }

    /// Returns true if the platform prompts for reminders separately from
    /// calendars.
    pub fn has_reminder_permission(&self) -> bool {
        matches!(self, Self::Ios)
    }

    /// Returns the lowercase name of this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller's permission tier on a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Full control, including deletion.
    Owner,
    /// May add and edit events.
    Contributor,
    /// May edit events and some settings.
    Editor,
    /// Read-only access.
    Read,
    /// Only free/busy information is visible.
    FreeBusy,
    /// Any other tier reported by the host.
    #[serde(other)]
    Other,
}

/// Kind of entries a calendar holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Timed events.
    #[default]
    Event,
    /// Reminders (Apple family only).
    Reminder,
}

/// The account or grouping a calendar belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    /// Source identifier, when the host exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name (e.g. "iCloud").
    pub name: String,
    /// Account type reported by the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// Whether this is a device-local account.
    #[serde(default)]
    pub is_local_account: bool,
}

impl CalendarSource {
    /// Creates a source with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            source_type: None,
            is_local_account: false,
        }
    }

    /// Builder method to set the source identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method to mark the source as a local account.
    pub fn with_local_account(mut self, local: bool) -> Self {
        self.is_local_account = local;
        self
    }
}

/// A calendar as reported by the host calendar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDescriptor {
    /// Calendar identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Display color, usually `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Access level, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    /// Parent source.
    pub source: CalendarSource,
    /// Kind of entries held.
    #[serde(default)]
    pub entity_type: EntityType,
    /// Owning account name (Android).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_account: Option<String>,
}

impl CalendarDescriptor {
    /// Creates a descriptor with the given identifier, title and source.
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: CalendarSource) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            color: None,
            access_level: None,
            source,
            entity_type: EntityType::Event,
            owner_account: None,
        }
    }

    /// Builder method to set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder method to set the access level.
    pub fn with_access_level(mut self, level: AccessLevel) -> Self {
        self.access_level = Some(level);
        self
    }

    /// Builder method to set the entity type.
    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = entity_type;
        self
    }

    /// Builder method to set the owner account.
    pub fn with_owner_account(mut self, account: impl Into<String>) -> Self {
        self.owner_account = Some(account.into());
        self
    }

    /// Returns true if the caller owns this calendar.
    pub fn is_owned(&self) -> bool {
        self.access_level == Some(AccessLevel::Owner)
    }
}

/// Opaque identifier of a calendar created by this library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarHandle(String);

impl CalendarHandle {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CalendarHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where a new calendar is anchored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceRef {
    /// An existing cloud-sync source, by identifier (Apple family).
    Cloud {
        /// Identifier of the source.
        source_id: String,
    },
    /// A local account owned by the app (Android).
    LocalAccount {
        /// Name of the account's source.
        source_name: String,
        /// Owner account of the anchoring calendar.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner_account: Option<String>,
    },
}

/// A fully specified calendar creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCreateRequest {
    /// Display title.
    pub title: String,
    /// Internal name; mirrors the title.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Always [`EntityType::Event`].
    pub entity_type: EntityType,
    /// Always [`AccessLevel::Owner`].
    pub access_level: AccessLevel,
    /// Anchoring source.
    pub source: SourceRef,
}

impl CalendarCreateRequest {
    /// Builds a request anchored to a cloud-sync source.
    pub fn cloud(
        title: impl Into<String>,
        color: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self::anchored(
            title.into(),
            color.into(),
            SourceRef::Cloud {
                source_id: source_id.into(),
            },
        )
    }

    /// Builds a request anchored to a local account.
    pub fn local_account(
        title: impl Into<String>,
        color: impl Into<String>,
        source_name: impl Into<String>,
        owner_account: Option<String>,
    ) -> Self {
        Self::anchored(
            title.into(),
            color.into(),
            SourceRef::LocalAccount {
                source_name: source_name.into(),
                owner_account,
            },
        )
    }

    /// Builds a request for an already resolved source.
    pub fn anchored(title: String, color: String, source: SourceRef) -> Self {
        Self {
            name: title.clone(),
            title,
            color,
            entity_type: EntityType::Event,
            access_level: AccessLevel::Owner,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_names() {
        let ios: Platform = serde_json::from_str("\"ios\"").unwrap();
        assert_eq!(ios, Platform::Ios);
        assert_eq!(Platform::Android.to_string(), "android");
        assert!(serde_json::from_str::<Platform>("\"windows\"").is_err());
    }

    #[test]
    fn reminder_permission_only_on_apple() {
        assert!(Platform::Ios.has_reminder_permission());
        assert!(!Platform::Android.has_reminder_permission());
    }

    #[test]
    fn descriptor_builder() {
        let cal = CalendarDescriptor::new("cal-1", "Home", CalendarSource::new("Local"))
            .with_access_level(AccessLevel::Owner)
            .with_owner_account("me")
            .with_color("#00ff00");

        assert!(cal.is_owned());
        assert_eq!(cal.owner_account.as_deref(), Some("me"));
        assert_eq!(cal.entity_type, EntityType::Event);
    }

    #[test]
    fn descriptor_deserializes_unknown_access_level() {
        let json = r#"{
            "id": "cal-9",
            "title": "Shared",
            "access_level": "respond",
            "source": { "name": "Exchange" }
        }"#;
        let cal: CalendarDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(cal.access_level, Some(AccessLevel::Other));
        assert!(!cal.is_owned());
        assert!(!cal.source.is_local_account);
    }

    #[test]
    fn create_request_mirrors_title_into_name() {
        let req = CalendarCreateRequest::cloud("Trips", "#ff0000", "src-1");
        assert_eq!(req.name, "Trips");
        assert_eq!(req.access_level, AccessLevel::Owner);
        assert_eq!(req.entity_type, EntityType::Event);
    }

    #[test]
    fn create_request_wire_shape() {
        let req = CalendarCreateRequest::local_account(
            "Trips",
            "#ff0000",
            "Local",
            Some("me".to_string()),
        );
        insta::assert_json_snapshot!(req, @r###"
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

    #[test]
    fn handle_display() {
        let handle = CalendarHandle::new("abc");
        assert_eq!(handle.to_string(), "abc");
        assert_eq!(handle.as_str(), "abc");
    }
}
