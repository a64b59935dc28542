//! In-app alert records.
//!
//! A `Notification` is the persistent inbox entry; the transient toast a
//! store emits when one is added is a separate, ephemeral echo (see
//! [`crate::events::ToastEvent`]).

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The inbox keeps at most this many entries, newest first.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Success,
    Warning,
    Destructive,
    Info,
}

/// A user-facing alert record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Locally generated unique token.
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub variant: NotificationVariant,
    pub read: bool,
    /// RFC 3339 in the persisted blob.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Input for [`crate::stores::NotificationStore::add`]; the store fills
/// in the id, timestamp, and read flag.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub variant: NotificationVariant,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        variant: NotificationVariant,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            variant,
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}
