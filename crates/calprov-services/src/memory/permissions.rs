//! Fixed-answer permission prompts.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::BoxFuture;
use crate::error::ServiceResult;
use crate::permission::{PermissionCategory, PermissionService, PermissionStatus};

/// [`PermissionService`] that answers every prompt from a fixed table.
///
/// Categories missing from the table answer `Undetermined`. Each prompt is
/// recorded so callers can assert which categories were asked for.
#[derive(Debug, Default)]
pub struct StaticPermissions {
    statuses: HashMap<PermissionCategory, PermissionStatus>,
    prompts: Mutex<Vec<PermissionCategory>>,
}

impl StaticPermissions {
    /// Creates a table with no answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants every category.
    pub fn granted() -> Self {
        Self::new()
            .with_status(PermissionCategory::Calendar, PermissionStatus::Granted)
            .with_status(PermissionCategory::Reminders, PermissionStatus::Granted)
    }

    /// Denies every category.
    pub fn denied() -> Self {
        Self::new()
            .with_status(PermissionCategory::Calendar, PermissionStatus::Denied)
            .with_status(PermissionCategory::Reminders, PermissionStatus::Denied)
    }

    /// Builder method to set the answer for one category.
    pub fn with_status(mut self, category: PermissionCategory, status: PermissionStatus) -> Self {
        self.statuses.insert(category, status);
        self
    }

    /// Categories prompted so far, in order.
    pub fn prompts(&self) -> Vec<PermissionCategory> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl PermissionService for StaticPermissions {
    fn request(&self, category: PermissionCategory) -> BoxFuture<'_, ServiceResult<PermissionStatus>> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(category);
        }
        let status = self
            .statuses
            .get(&category)
            .copied()
            .unwrap_or(PermissionStatus::Undetermined);
        Box::pin(async move { Ok(status) })
    }
}
