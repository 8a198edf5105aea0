use std::collections::BTreeSet;
use std::sync::mpsc;

use tokio::runtime::Handle;
use tracing::debug;

use bizlens_core::UserId;
use bizlens_events::{Collection, DataChange};

use super::change_worker::{ChangeFilter, ChangeWorker, WorkerHandle};
use crate::services::{ChangeBus, MetricsSync, StockAlertGenerator};

/// Reacts to inventory changes: re-syncs the user's latest metric and
/// re-runs the stock scan.
///
/// A burst of inventory writes is handled once per user. The work is spawned
/// onto `runtime` and the worker thread waits for it, so users are processed
/// one after another and backend IO is driven by the runtime itself (this
/// also works on a `current_thread` runtime).
#[derive(Debug)]
pub struct MetricsSyncWorker;

#[derive(Debug, thiserror::Error)]
#[error("runtime shut down before resync finished for user {0}")]
struct RuntimeGone(UserId);

impl MetricsSyncWorker {
    pub fn spawn(
        bus: ChangeBus,
        metrics_sync: MetricsSync,
        stock_alerts: StockAlertGenerator,
        runtime: Handle,
    ) -> std::io::Result<WorkerHandle> {
        let filter = ChangeFilter::all().collections(&[Collection::Inventory]);
        ChangeWorker::spawn("metrics-sync", bus, filter, move |batch: Vec<DataChange>| {
            for user in affected_users(&batch) {
                debug!(user_id = %user, changes = batch.len(), "inventory changed; resyncing");
                let (done_tx, done_rx) = mpsc::channel::<()>();
                let metrics_sync = metrics_sync.clone();
                let stock_alerts = stock_alerts.clone();
                runtime.spawn(async move {
                    metrics_sync.sync(user).await;
                    stock_alerts.scan(user).await;
                    let _ = done_tx.send(());
                });
                done_rx.recv().map_err(|_| RuntimeGone(user))?;
            }
            Ok::<(), RuntimeGone>(())
        })
    }
}

/// Distinct users in `batch`, in a stable order.
fn affected_users(batch: &[DataChange]) -> BTreeSet<UserId> {
    batch.iter().map(|c| c.user_id).collect()
}
