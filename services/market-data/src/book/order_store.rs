//! O(1) order-by-id store
//!
//! Holds every currently live order across all symbols. Capacity is
//! reserved up front so the hot path never rehashes.

use ahash::AHashMap;

use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::side::Side;
use types::symbol::Symbol;

/// Expected live-order population; reserved at construction.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// A live order as the consumer knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub symbol: Symbol,
    pub price: Price,
    pub remaining: Quantity,
}

/// Open-addressed map from OrderId to its live [`Order`].
///
/// An id is present iff the order has nonzero remaining quantity and has
/// not been cancelled.
pub struct OrderStore {
    orders: AHashMap<OrderId, Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: AHashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(&id)
    }

    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        self.orders.remove(&id)
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(id: u64) -> Order {
        Order {
            id: OrderId::new(id),
            side: Side::Buy,
            symbol: Symbol::new("AAPL"),
            price: Price::from_raw(1_850_000),
            remaining: Quantity::new(100),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = OrderStore::with_capacity(16);
        store.insert(sample_order(1));

        let order = store.get(OrderId::new(1)).unwrap();
        assert_eq!(order.remaining, Quantity::new(100));
        assert!(store.get(OrderId::new(2)).is_none());
    }

    #[test]
    fn test_remove_returns_order() {
        let mut store = OrderStore::with_capacity(16);
        store.insert(sample_order(7));

        let removed = store.remove(OrderId::new(7)).unwrap();
        assert_eq!(removed.id, OrderId::new(7));
        assert!(store.is_empty());
        assert!(store.remove(OrderId::new(7)).is_none());
    }

    #[test]
    fn test_get_mut_mutates_in_place() {
        let mut store = OrderStore::with_capacity(16);
        store.insert(sample_order(3));

        store.get_mut(OrderId::new(3)).unwrap().remaining = Quantity::new(40);
        assert_eq!(
            store.get(OrderId::new(3)).unwrap().remaining,
            Quantity::new(40)
        );
    }
}
