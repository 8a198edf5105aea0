//! Stock rules over a set of inventory rows.

use crate::item::InventoryItem;

/// An item is low on stock when on-hand quantity is strictly below its minimum.
pub fn is_low_stock(item: &InventoryItem) -> bool {
    item.quantity < item.minimum_level
}

pub fn low_stock_items<'a>(items: &'a [InventoryItem]) -> impl Iterator<Item = &'a InventoryItem> + 'a {
    items.iter().filter(|i| is_low_stock(i))
}

/// Number of items currently below their minimum level.
pub fn count_low_stock(items: &[InventoryItem]) -> usize {
    low_stock_items(items).count()
}

/// Total on-hand quantity across all items; `None` if the sum overflows `i64`.
pub fn total_on_hand(items: &[InventoryItem]) -> Option<i64> {
    items.iter().try_fold(0i64, |acc, i| acc.checked_add(i.quantity))
}
