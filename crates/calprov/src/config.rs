//! Provisioner configuration.
//!
//! Settings can be built in code or read from a TOML file, by default
//! `~/.config/calprov/config.toml`:
//!
//! ```toml
//! platform = "android"
//! cloud_source_name = "iCloud"
//! on_existing = "replace"
//! store_path = "/data/app/calprov/secure-store.json"
//! ```

use std::path::{Path, PathBuf};

use calprov_core::{DEFAULT_CLOUD_SOURCE_NAME, Platform};
use calprov_services::FileSecureStore;
use serde::{Deserialize, Serialize};

use crate::error::{ProvisionError, ProvisionResult};

/// What `provision_calendar` does when the slot already holds a handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReprovisionPolicy {
    /// Fail with `AlreadyProvisioned` and leave everything untouched.
    #[default]
    Reject,
    /// Create the new calendar, store it, then delete the old one.
    Replace,
    /// Create the new calendar and leave the old one orphaned.
    AllowDuplicate,
}

/// Configuration for [`CalendarProvisioner`](crate::CalendarProvisioner).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Platform family. Detected from the build target when unset.
    pub platform: Option<Platform>,

    /// Source name that marks cloud-synced calendars on the Apple family.
    pub cloud_source_name: String,

    /// Behavior when provisioning an occupied slot.
    pub on_existing: ReprovisionPolicy,

    /// Location of the file-backed secure store.
    pub store_path: Option<PathBuf>,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            platform: None,
            cloud_source_name: DEFAULT_CLOUD_SOURCE_NAME.to_string(),
            on_existing: ReprovisionPolicy::default(),
            store_path: None,
        }
    }
}

impl ProvisionerConfig {
    /// Creates a configuration for the given platform.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform: Some(platform),
            ..Default::default()
        }
    }

    /// Loads configuration from the default path, or defaults if it is absent.
    pub fn load() -> ProvisionResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ProvisionResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProvisionError::config(format!("failed to read config: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> ProvisionResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ProvisionError::config(format!("failed to parse config: {}", e)))?;
        if config.cloud_source_name.trim().is_empty() {
            return Err(ProvisionError::config("cloud_source_name must not be empty"));
        }
        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calprov")
            .join("config.toml")
    }

    /// Returns the default secure store path.
    pub fn default_store_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calprov")
            .join("secure-store.json")
    }

    /// Returns the configured platform, falling back to the build target.
    pub fn resolved_platform(&self) -> ProvisionResult<Platform> {
        self.platform.or_else(Platform::detect).ok_or_else(|| {
            ProvisionError::config("platform is not set and cannot be detected for this target")
        })
    }

    /// Opens the file-backed secure store at `store_path` (or the default).
    pub fn open_store(&self) -> ProvisionResult<FileSecureStore> {
        let path = self
            .store_path
            .clone()
            .unwrap_or_else(Self::default_store_path);
        Ok(FileSecureStore::open(path)?)
    }

    /// Builder: set platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Builder: set cloud source name.
    pub fn with_cloud_source_name(mut self, name: impl Into<String>) -> Self {
        self.cloud_source_name = name.into();
        self
    }

    /// Builder: set reprovision policy.
    pub fn with_on_existing(mut self, policy: ReprovisionPolicy) -> Self {
        self.on_existing = policy;
        self
    }

    /// Builder: set store path.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }
}
