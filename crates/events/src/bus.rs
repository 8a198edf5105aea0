//! Change publishing/subscription abstraction (mechanics only).
//!
//! The bus is a best-effort, in-process broadcast:
//!
//! - **Transport-agnostic**: the in-memory implementation uses std channels;
//!   a backend realtime feed can be bridged onto the same trait.
//! - **At-least-once**: a consumer may see a change more than once and must be
//!   idempotent (metrics sync recomputes from scratch, so it is).
//! - **No persistence**: the backend store is the source of truth; a missed
//!   change only delays the next recomputation.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a change stream.
///
/// Each subscription receives a copy of every message published after it was
/// created. Meant to be drained by a single thread.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Publish/subscribe contract for change notifications.
///
/// Implementations must be shareable across threads: services publish from
/// request handlers while workers consume on their own threads.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
