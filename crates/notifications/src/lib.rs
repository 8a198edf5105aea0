//! In-app notifications (stock alerts and other producers).

pub mod notification;

pub use notification::{NewNotification, Notification, NotificationKind, unread_count};
