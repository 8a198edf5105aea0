//! Data change notifications and the in-process bus that fans them out.
//!
//! The backend reports writes as `DataChange` messages; consumers (metrics
//! sync, the SSE stream) subscribe through an `EventBus`.

pub mod bus;
pub mod change;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use change::{ChangeKind, Collection, DataChange};
pub use in_memory_bus::InMemoryEventBus;
