//! Inventory rows and the stock rules the dashboard applies to them.
//!
//! Pure domain logic (no IO): the low-stock predicate used by the alert
//! generator, on-hand totals used by metrics sync, and input validation for
//! inventory writes.

pub mod item;
pub mod stock;

pub use item::{InventoryItem, InventoryPatch, NewInventoryItem};
pub use stock::{count_low_stock, is_low_stock, low_stock_items, total_on_hand};
