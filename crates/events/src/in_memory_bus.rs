//! In-process change bus.

use std::convert::Infallible;
use std::sync::{Mutex, MutexGuard, PoisonError, mpsc};

use crate::bus::{EventBus, Subscription};

/// Fan-out bus over std channels.
///
/// Every live subscription gets a clone of each published message.
/// Subscriptions whose receiver was dropped are pruned on the next publish.
/// Publishing never fails: the sender list stays valid even if a holder of
/// the lock panicked, so a poisoned lock is simply taken over.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    fn senders(&self) -> MutexGuard<'_, Vec<mpsc::Sender<M>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = Infallible;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut senders = self.senders();
        if let Some((last, rest)) = senders.split_last() {
            let mut delivered: Vec<bool> = rest.iter().map(|tx| tx.send(message.clone()).is_ok()).collect();
            delivered.push(last.send(message).is_ok());
            let mut alive = delivered.into_iter();
            senders.retain(|_| alive.next().unwrap_or(false));
        }
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();
        self.senders().push(tx);
        Subscription::new(rx)
    }
}
