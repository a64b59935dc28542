pub mod notification;

pub use notification::{MAX_NOTIFICATIONS, NewNotification, Notification, NotificationVariant};
