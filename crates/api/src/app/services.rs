use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use bizlens_ai::{ChatAssistant, ChatClientConfig, DisabledAssistant, OpenAiChatClient};
use bizlens_core::UserId;
use bizlens_events::DataChange;
use bizlens_infra::{
    AppConfig, BackendConfig, ChangeFilter, ChangeWorker, DataSource, InMemoryDataSource, MetricsSyncWorker, PostgrestDataSource,
    Services, WorkerHandle,
};

/// Realtime message broadcast via SSE.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub user_id: UserId,
    pub topic: String,
    pub payload: serde_json::Value,
}

impl From<&DataChange> for RealtimeMessage {
    fn from(change: &DataChange) -> Self {
        Self {
            user_id: change.user_id,
            topic: change.topic(),
            payload: serde_json::json!({
                "kind": "data_change",
                "collection": change.collection,
                "change": change.kind,
                "record_id": change.record_id.map(|id| id.to_string()),
                "occurred_at": change.occurred_at,
            }),
        }
    }
}

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub services: Services,
    pub assistant: Arc<dyn ChatAssistant>,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
    _workers: Vec<WorkerHandle>,
}

impl AppServices {
    /// Wire the services and start the background workers.
    ///
    /// Must be called from inside a tokio runtime (either flavor); the
    /// metrics-sync worker runs its resyncs as tasks on that runtime.
    pub fn start(services: Services, assistant: Arc<dyn ChatAssistant>) -> anyhow::Result<Self> {
        // Realtime channel (SSE): lossy broadcast, user-filtered in handlers.
        let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

        // Background subscriber: change bus -> SSE broadcast.
        let forward_tx = realtime_tx.clone();
        let forwarder = ChangeWorker::spawn(
            "realtime-forwarder",
            services.bus(),
            ChangeFilter::all(),
            move |batch: Vec<DataChange>| {
                for change in &batch {
                    // No receivers is normal when nobody is streaming.
                    let _ = forward_tx.send(RealtimeMessage::from(change));
                }
                Ok::<(), Infallible>(())
            },
        )?;

        let metrics_sync = MetricsSyncWorker::spawn(
            services.bus(),
            services.metrics_sync.clone(),
            services.stock_alerts.clone(),
            tokio::runtime::Handle::try_current()?,
        )?;

        Ok(Self {
            services,
            assistant,
            realtime_tx,
            _workers: vec![forwarder, metrics_sync],
        })
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }
}

/// Build the data source, assistant and services described by `config`.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let data: Arc<dyn DataSource> = match &config.backend {
        BackendConfig::InMemory => {
            let store = InMemoryDataSource::new();
            if let Some(user) = config.seed_demo_user {
                store.seed_demo(user)?;
                tracing::info!(user_id = %user, "seeded demo data");
            }
            Arc::new(store)
        }
        BackendConfig::Postgrest { url, api_key } => {
            tracing::info!(backend = %url, "using PostgREST backend");
            Arc::new(PostgrestDataSource::new(url.clone(), api_key.clone()))
        }
    };

    let assistant: Arc<dyn ChatAssistant> = match &config.ai {
        Some(ai) => {
            let mut cfg = ChatClientConfig::new(ai.api_key.clone()).with_model(ai.model.clone());
            if let Some(base_url) = &ai.base_url {
                cfg = cfg.with_base_url(base_url.clone());
            }
            Arc::new(OpenAiChatClient::new(cfg))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; assistant routes are disabled");
            Arc::new(DisabledAssistant)
        }
    };

    let services = Services::new(data, config.cache_max_age);

    // Startup pass ("mount"): sync metrics and scan stock for known users.
    let mut mount_users = config.sync_on_start_users.clone();
    if let Some(user) = config.seed_demo_user {
        if !mount_users.contains(&user) {
            mount_users.push(user);
        }
    }
    services.mount(&mount_users).await;

    AppServices::start(services, assistant)
}

pub fn user_sse_stream(
    services: Arc<AppServices>,
    user_id: UserId,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(m) if m.user_id == user_id => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizlens_events::{ChangeKind, Collection};

    #[test]
    fn realtime_message_carries_topic_and_record() {
        let user = UserId::new();
        let id = bizlens_core::RecordId::new();
        let change = DataChange::new(user, Collection::Inventory, ChangeKind::Delete, Some(id));

        let msg = RealtimeMessage::from(&change);
        assert_eq!(msg.user_id, user);
        assert_eq!(msg.topic, "inventory.delete");
        assert_eq!(msg.payload["collection"], "inventory");
        assert_eq!(msg.payload["change"], "delete");
        assert_eq!(msg.payload["record_id"], id.to_string());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn changes_reach_the_realtime_channel() {
        let data = Arc::new(InMemoryDataSource::new());
        let app = AppServices::start(Services::new(data, None), Arc::new(DisabledAssistant)).unwrap();
        let mut rx = app.realtime_tx().subscribe();

        let user = UserId::new();
        let input = bizlens_inventory::NewInventoryItem {
            name: "Cabo".to_string(),
            sku: String::new(),
            quantity: 1,
            minimum_level: 0,
            unit_price: 1.0,
        };
        app.services.inventory.create(user, input).await.unwrap();

        let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert_eq!(msg.user_id, user);
        assert_eq!(msg.topic, "inventory.insert");
    }
}
