use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizlens_core::{DomainError, DomainResult, Entity, RecordId, UserId};
use bizlens_inventory::InventoryItem;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Warning,
    Info,
    Success,
    Error,
}

/// Stored notification. Only the `read` flag changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub owner_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    /// Inventory row this notification is about, for stock alerts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<RecordId>,
}

impl Notification {
    pub fn from_new(owner_id: UserId, input: NewNotification, now: DateTime<Utc>) -> DomainResult<Self> {
        input.validate()?;
        Ok(Self {
            id: RecordId::new(),
            owner_id,
            kind: input.kind,
            title: input.title,
            message: input.message,
            read: false,
            created_at: now,
            item_id: input.item_id,
        })
    }

    /// An unread stock alert for `item_id` is still pending for the user.
    pub fn is_pending_stock_alert_for(&self, item_id: RecordId) -> bool {
        !self.read && self.kind == NotificationKind::Warning && self.item_id == Some(item_id)
    }
}

impl Entity for Notification {
    fn id(&self) -> RecordId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Input for creating a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub item_id: Option<RecordId>,
}

impl NewNotification {
    /// Warning raised when an item falls below its minimum level.
    pub fn stock_alert(item: &InventoryItem) -> Self {
        Self {
            kind: NotificationKind::Warning,
            title: "Estoque baixo".to_string(),
            message: format!(
                "{} está com {} unidade(s), abaixo do mínimo de {}.",
                item.name, item.quantity, item.minimum_level
            ),
            item_id: Some(item.id),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        Ok(())
    }
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn low_item() -> InventoryItem {
        InventoryItem {
            id: RecordId::new(),
            owner_id: UserId::new(),
            name: "Parafuso".to_string(),
            sku: "P-10".to_string(),
            quantity: 2,
            minimum_level: 10,
            unit_price: 0.5,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stock_alert_mentions_item_and_levels() {
        let item = low_item();
        let alert = NewNotification::stock_alert(&item);
        assert_eq!(alert.kind, NotificationKind::Warning);
        assert_eq!(alert.item_id, Some(item.id));
        assert!(alert.message.contains("Parafuso"));
        assert!(alert.message.contains("10"));
    }

    #[test]
    fn new_notifications_start_unread() {
        let item = low_item();
        let n = Notification::from_new(item.owner_id, NewNotification::stock_alert(&item), Utc::now()).unwrap();
        assert!(!n.read);
        assert!(n.is_pending_stock_alert_for(item.id));
        assert_eq!(unread_count(&[n]), 1);
    }

    #[test]
    fn read_alert_is_no_longer_pending() {
        let item = low_item();
        let mut n = Notification::from_new(item.owner_id, NewNotification::stock_alert(&item), Utc::now()).unwrap();
        n.read = true;
        assert!(!n.is_pending_stock_alert_for(item.id));
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&NotificationKind::Success).unwrap(), "\"success\"");
    }

    #[test]
    fn blank_title_is_rejected() {
        let input = NewNotification {
            kind: NotificationKind::Info,
            title: " ".to_string(),
            message: String::new(),
            item_id: None,
        };
        assert!(Notification::from_new(UserId::new(), input, Utc::now()).is_err());
    }
}
