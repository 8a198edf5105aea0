//! Background consumer of the change bus.
//!
//! A worker owns one bus subscription and hands matching `DataChange`s to
//! its handler in batches: everything already queued when the thread wakes
//! up is delivered together, so bursts of writes can be coalesced.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use bizlens_core::UserId;
use bizlens_events::{Collection, DataChange, EventBus};

use crate::services::ChangeBus;

const POLL: Duration = Duration::from_millis(250);

/// Which changes a worker wants to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeFilter {
    user: Option<UserId>,
    collections: Vec<Collection>,
}

impl ChangeFilter {
    /// Every change on the bus.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Restrict to `collections`; an empty list means all of them.
    pub fn collections(mut self, collections: &[Collection]) -> Self {
        self.collections = collections.to_vec();
        self
    }

    pub fn matches(&self, change: &DataChange) -> bool {
        if self.user.is_some_and(|u| u != change.user_id) {
            return false;
        }
        self.collections.is_empty() || self.collections.contains(&change.collection)
    }
}

/// Handle to stop and join a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    name: &'static str,
    stop: Arc<AtomicBool>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop after the current batch and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

#[derive(Debug)]
pub struct ChangeWorker;

impl ChangeWorker {
    /// Subscribe to `bus` now and process changes on a named thread.
    ///
    /// Changes published before this call are not seen. The handler gets
    /// non-empty batches in publish order; a failed batch is logged and
    /// the loop carries on.
    pub fn spawn<H, E>(
        name: &'static str,
        bus: ChangeBus,
        filter: ChangeFilter,
        mut handler: H,
    ) -> std::io::Result<WorkerHandle>
    where
        H: FnMut(Vec<DataChange>) -> Result<(), E> + Send + 'static,
        E: core::fmt::Display,
    {
        let sub = bus.subscribe();
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = stop.clone();

        let join = thread::Builder::new().name(name.to_string()).spawn(move || {
            while !stopped.load(Ordering::SeqCst) {
                let first = match sub.recv_timeout(POLL) {
                    Ok(change) => change,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                };

                let batch: Vec<DataChange> = std::iter::once(first)
                    .chain(std::iter::from_fn(|| sub.try_recv().ok()))
                    .filter(|c| filter.matches(c))
                    .collect();
                if batch.is_empty() {
                    continue;
                }

                let size = batch.len();
                if let Err(err) = handler(batch) {
                    warn!(worker = name, batch = size, error = %err, "change handler failed");
                }
            }
            debug!(worker = name, "change worker stopped");
        })?;

        Ok(WorkerHandle {
            name,
            stop,
            join: Some(join),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;
    use std::time::Instant;

    use bizlens_events::{ChangeKind, InMemoryEventBus};

    fn bus() -> ChangeBus {
        Arc::new(InMemoryEventBus::new())
    }

    fn change(user: UserId, collection: Collection) -> DataChange {
        DataChange::new(user, collection, ChangeKind::Update, None)
    }

    fn wait_until(cond: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn filter_by_user_and_collection() {
        let alice = UserId::new();
        let bob = UserId::new();
        let filter = ChangeFilter::all().user(alice).collections(&[Collection::Inventory]);

        assert!(filter.matches(&change(alice, Collection::Inventory)));
        assert!(!filter.matches(&change(bob, Collection::Inventory)));
        assert!(!filter.matches(&change(alice, Collection::Metrics)));
        assert!(ChangeFilter::all().matches(&change(bob, Collection::Employees)));
    }

    #[test]
    fn delivers_only_matching_changes() {
        let bus = bus();
        let alice = UserId::new();
        let bob = UserId::new();
        let (seen_tx, seen_rx) = mpsc::channel::<DataChange>();

        let handle = ChangeWorker::spawn("test-worker", bus.clone(), ChangeFilter::all().user(alice), move |batch| {
            for c in batch {
                seen_tx.send(c).map_err(|_| "closed")?;
            }
            Ok::<(), &str>(())
        })
        .unwrap();

        bus.publish(change(bob, Collection::Inventory)).unwrap();
        bus.publish(change(alice, Collection::Inventory)).unwrap();

        let got = seen_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(got.user_id, alice);
        assert!(seen_rx.recv_timeout(Duration::from_millis(300)).is_err());

        handle.shutdown();
    }

    #[test]
    fn queued_changes_arrive_as_one_batch_in_order() {
        let bus = bus();
        let user = UserId::new();
        let batches: Arc<Mutex<Vec<Vec<Collection>>>> = Arc::default();
        let sink = batches.clone();

        // Publish before the thread can drain anything: hold the handler on a gate.
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let handle = ChangeWorker::spawn("batch-worker", bus.clone(), ChangeFilter::all(), move |batch| {
            let _ = gate_rx.recv_timeout(Duration::from_secs(2));
            sink.lock().unwrap().push(batch.iter().map(|c| c.collection).collect());
            Ok::<(), Infallible>(())
        })
        .unwrap();

        bus.publish(change(user, Collection::Metrics)).unwrap();
        thread::sleep(Duration::from_millis(50));
        for collection in [Collection::Inventory, Collection::Notifications, Collection::Employees] {
            bus.publish(change(user, collection)).unwrap();
        }
        gate_tx.send(()).unwrap();
        gate_tx.send(()).unwrap();

        assert!(wait_until(|| batches.lock().unwrap().len() == 2));
        assert_eq!(
            *batches.lock().unwrap(),
            vec![
                vec![Collection::Metrics],
                vec![Collection::Inventory, Collection::Notifications, Collection::Employees],
            ]
        );
        handle.shutdown();
    }

    #[test]
    fn handler_errors_do_not_stop_the_loop() {
        let bus = bus();
        let user = UserId::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let handle = ChangeWorker::spawn("failing-worker", bus.clone(), ChangeFilter::all(), move |batch| {
            c.fetch_add(batch.len(), Ordering::SeqCst);
            Err::<(), _>("boom")
        })
        .unwrap();

        for _ in 0..3 {
            bus.publish(change(user, Collection::Metrics)).unwrap();
            thread::sleep(Duration::from_millis(20));
        }

        assert!(wait_until(|| count.load(Ordering::SeqCst) == 3));
        assert_eq!(handle.name(), "failing-worker");
        handle.shutdown();
    }
}
