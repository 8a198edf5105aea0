use std::sync::Arc;

use tracing::warn;

use bizlens_core::{RecordId, UserId};
use bizlens_events::{ChangeKind, Collection, DataChange};
use bizlens_notifications::{Notification, unread_count};

use super::{ChangeBus, publish};
use crate::data_source::{DataResult, DataSource};
use crate::query_cache::{QueryCache, QueryKey};

#[derive(Clone)]
pub struct NotificationService {
    data: Arc<dyn DataSource>,
    cache: Arc<QueryCache<Vec<Notification>>>,
    bus: ChangeBus,
}

impl NotificationService {
    pub fn new(data: Arc<dyn DataSource>, cache: Arc<QueryCache<Vec<Notification>>>, bus: ChangeBus) -> Self {
        Self { data, cache, bus }
    }

    /// Newest first. Backend errors yield an empty list.
    pub async fn list(&self, user: UserId) -> Vec<Notification> {
        let key = QueryKey::owned(Collection::Notifications.as_str(), user);
        match self.cache.get_or_fetch(key, || self.data.list_notifications(user)).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(user_id = %user, error = %err, "failed to load notifications");
                Vec::new()
            }
        }
    }

    pub async fn unread_count(&self, user: UserId) -> usize {
        unread_count(&self.list(user).await)
    }

    pub async fn mark_read(&self, user: UserId, id: RecordId, read: bool) -> DataResult<Notification> {
        let updated = self.data.set_notification_read(user, id, read).await?;
        self.changed(user, Some(id));
        Ok(updated)
    }

    /// Returns how many notifications flipped to read.
    pub async fn mark_all_read(&self, user: UserId) -> DataResult<usize> {
        let changed = self.data.mark_all_notifications_read(user).await?;
        if changed > 0 {
            self.changed(user, None);
        }
        Ok(changed)
    }

    fn changed(&self, user: UserId, id: Option<RecordId>) {
        self.cache.invalidate_owner(Collection::Notifications.as_str(), user);
        publish(
            &self.bus,
            DataChange::new(user, Collection::Notifications, ChangeKind::Update, id),
        );
    }
}
