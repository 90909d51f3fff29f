//! Binary max-heap of orders, ranked by total price.
//!
//! ## Ordering
//!
//! The order with the highest `total_price` sits at the root. Ties between
//! equal totals come out in whatever order the sift operations leave them;
//! no FIFO or LIFO guarantee is made.
//!
//! ## Full Enumeration
//!
//! The heap has no ordered iterator. [`OrderHeap::sorted_desc`] clones the
//! heap and drains the clone, so the original stays intact for further
//! inserts.

use crate::types::Order;

/// Max-heap over [`Order`]s.
///
/// # Example
///
/// ```
/// use famin_store::index::{LinkedList, OrderHeap};
/// use famin_store::types::{format_order_id, format_tracking_id, Order, PaymentMethod};
/// use rust_decimal::Decimal;
///
/// let mut heap = OrderHeap::new();
/// for (seq, total) in [(1, 100), (2, 500), (3, 250)] {
///     heap.insert(Order {
///         order_id: format_order_id(seq),
///         tracking_id: format_tracking_id(seq),
///         timestamp: "2025-01-01 12:00:00".into(),
///         customer_name: "Hina".into(),
///         customer_address: "Mall Road".into(),
///         customer_phone: "0321".into(),
///         payment_method: PaymentMethod::Cash,
///         items: LinkedList::new(),
///         total_price: Decimal::from(total),
///     });
/// }
///
/// let totals: Vec<_> = heap.sorted_desc().into_iter().map(|o| o.total_price).collect();
/// assert_eq!(totals, vec![Decimal::from(500), Decimal::from(250), Decimal::from(100)]);
/// assert_eq!(heap.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderHeap {
    orders: Vec<Order>,
}

impl OrderHeap {
    pub fn new() -> Self {
        Self { orders: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Push an order, O(log n)
    pub fn insert(&mut self, order: Order) {
        self.orders.push(order);
        self.sift_up(self.orders.len() - 1);
    }

    /// Highest-total order without removing it
    #[inline]
    pub fn peek_max(&self) -> Option<&Order> {
        self.orders.first()
    }

    /// Remove and return the highest-total order, O(log n)
    pub fn pop_max(&mut self) -> Option<Order> {
        if self.orders.is_empty() {
            return None;
        }

        let last = self.orders.len() - 1;
        self.orders.swap(0, last);
        let max = self.orders.pop();
        self.sift_down(0);
        max
    }

    /// Every order, highest total first. Drains a copy; `self` is unchanged.
    pub fn sorted_desc(&self) -> Vec<Order> {
        let mut copy = self.clone();
        let mut result = Vec::with_capacity(copy.len());
        while let Some(order) = copy.pop_max() {
            result.push(order);
        }
        result
    }

    /// Orders in storage (heap array) order
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.orders[index].total_price <= self.orders[parent].total_price {
                break;
            }
            self.orders.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.orders.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut largest = index;

            if left < len && self.orders[left].total_price > self.orders[largest].total_price {
                largest = left;
            }
            if right < len && self.orders[right].total_price > self.orders[largest].total_price {
                largest = right;
            }
            if largest == index {
                break;
            }

            self.orders.swap(index, largest);
            index = largest;
        }
    }
}

impl FromIterator<Order> for OrderHeap {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        let mut heap = OrderHeap::new();
        for order in iter {
            heap.insert(order);
        }
        heap
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
