//! Background workers driven by the change bus.

pub mod change_worker;
pub mod metrics_sync_worker;

pub use change_worker::{ChangeFilter, ChangeWorker, WorkerHandle};
pub use metrics_sync_worker::MetricsSyncWorker;
