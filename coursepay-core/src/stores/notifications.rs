//! The notification store: the process-wide in-app alert inbox.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::{MAX_NOTIFICATIONS, NewNotification, Notification, NotificationVariant};
use crate::events::{ToastEvent, ToastSender};
use crate::persist::{NOTIFICATION_STORAGE_KEY, Persist};

/// Newest-first inbox of user-facing alerts, capped at
/// [`MAX_NOTIFICATIONS`] entries.
pub struct NotificationStore {
    entries: Vec<Notification>,
    persist: Arc<dyn Persist>,
    toast_tx: Option<ToastSender>,
}

impl NotificationStore {
    /// Rehydrate the inbox from durable storage.
    ///
    /// Timestamps come back from the RFC 3339 strings in the blob. Fails
    /// soft: any load or parse error logs and yields an empty inbox.
    pub fn load(persist: Arc<dyn Persist>) -> Self {
        let entries = match persist.load(NOTIFICATION_STORAGE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Notification>>(&blob) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Corrupt notification snapshot, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read notification snapshot, starting empty");
                Vec::new()
            }
        };

        Self {
            entries,
            persist,
            toast_tx: None,
        }
    }

    /// Echo each added notification as a transient toast.
    pub fn with_toast_sender(mut self, tx: ToastSender) -> Self {
        self.toast_tx = Some(tx);
        self
    }

    /// Add a notification: fresh id, timestamped now, unread, prepended,
    /// inbox truncated to the most recent [`MAX_NOTIFICATIONS`]. Returns
    /// the generated id.
    pub fn add(&mut self, new: NewNotification) -> Uuid {
        let id = Uuid::new_v4();
        let notification = Notification {
            id,
            title: new.title,
            message: new.message,
            variant: new.variant,
            read: false,
            timestamp: OffsetDateTime::now_utc(),
            link: new.link,
        };

        self.toast(&notification);
        self.entries.insert(0, notification);
        self.entries.truncate(MAX_NOTIFICATIONS);
        self.save();
        id
    }

    /// Mark one notification as read. Idempotent; unknown ids are ignored.
    pub fn mark_as_read(&mut self, id: Uuid) {
        let Some(entry) = self.entries.iter_mut().find(|n| n.id == id) else {
            return;
        };
        if entry.read {
            return;
        }
        entry.read = true;
        self.save();
    }

    /// Mark every notification as read.
    pub fn mark_all_as_read(&mut self) {
        let mut changed = false;
        for entry in &mut self.entries {
            changed |= !entry.read;
            entry.read = true;
        }
        if changed {
            self.save();
        }
    }

    /// Delete one notification.
    pub fn remove(&mut self, id: Uuid) {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        if self.entries.len() != before {
            self.save();
        }
    }

    /// Delete every notification.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.save();
    }

    /// Newest-first view of the inbox.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Count of unread entries, recomputed on every call.
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    fn save(&self) {
        let blob = match serde_json::to_string(&self.entries) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to serialize notification snapshot");
                return;
            }
        };
        if let Err(e) = self.persist.save(NOTIFICATION_STORAGE_KEY, &blob) {
            warn!(error = %e, "Failed to persist notification snapshot");
        }
    }

    fn toast(&self, notification: &Notification) {
        let Some(tx) = &self.toast_tx else { return };
        let event = ToastEvent {
            title: notification.title.clone(),
            message: notification.message.clone(),
            variant: notification.variant,
        };
        if let Err(e) = tx.try_send(event) {
            debug!(error = %e, "Toast dropped, no consumer keeping up");
        }
    }
}
