use serde::Serialize;
use std::fmt;

use crate::property::PropertyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient user-facing message produced by a review action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub property_id: PropertyId,
    pub message: String,
}

impl Notification {
    pub fn success(property_id: PropertyId, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            property_id,
            message: message.into(),
        }
    }

    pub fn error(property_id: PropertyId, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            property_id,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.level {
            NotificationLevel::Success => "✅",
            NotificationLevel::Error => "❌",
        };
        write!(f, "{icon} [{}] {}", self.property_id, self.message)
    }
}
