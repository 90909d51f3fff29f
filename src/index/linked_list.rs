//! Singly linked list backed by a slab arena.
//!
//! ## Design
//!
//! Nodes live in a [`Slab`] owned by the list and are linked by slab key:
//!
//! ```text
//! head -> node -> node -> node (tail, next = None)
//! ```
//!
//! - Insertion order is preserved
//! - [`LinkedList::push_back`] walks from the head to find the tail (no
//!   tail pointer is kept), so it is O(n)
//! - [`LinkedList::remove`] unlinks the first element equal to the argument
//! - [`LinkedList::find`] looks up by product id and only exists for element
//!   types implementing [`ProductKeyed`]; calling it on any other list is a
//!   compile error
//!
//! ## Example
//!
//! ```
//! use famin_store::index::LinkedList;
//!
//! let mut list = LinkedList::new();
//! list.push_back("a");
//! list.push_back("b");
//! list.push_back("c");
//!
//! assert!(list.remove(&"b"));
//! assert!(!list.remove(&"z"));
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
//! assert_eq!(list.len(), 2);
//! ```

use slab::Slab;

use crate::index::ListNode;

// ============================================================================
// ProductKeyed
// ============================================================================

/// Elements that embed a product identifier.
///
/// Implemented by the two line shapes the store keeps in lists:
/// [`crate::types::CartItem`] and [`crate::types::OrderLine`].
pub trait ProductKeyed {
    /// The embedded product id used by [`LinkedList::find`]
    fn product_id(&self) -> &str;
}

// ============================================================================
// LinkedList
// ============================================================================

/// An insertion-ordered singly linked list.
#[derive(Debug, Clone)]
pub struct LinkedList<T> {
    /// Node storage; keys are only reachable through `head`/`next`
    nodes: Slab<ListNode<T>>,

    /// First node (slab key)
    head: Option<usize>,

    /// Element count, maintained on every push/remove
    len: usize,
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            head: None,
            len: 0,
        }
    }

    /// Number of elements, O(1)
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list has no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First element, if any
    pub fn front(&self) -> Option<&T> {
        self.head.map(|key| &self.nodes[key].value)
    }

    /// Append an element at the tail.
    ///
    /// Walks the chain from the head to find the tail, O(n).
    pub fn push_back(&mut self, value: T) {
        let tail = self.tail_key();
        let key = self.nodes.insert(ListNode::new(value));

        match tail {
            Some(tail_key) => self.nodes[tail_key].next = Some(key),
            // Empty list - this is also the head
            None => self.head = Some(key),
        }

        self.len += 1;
    }

    /// Remove every element and free its node.
    pub fn clear(&mut self) {
        let mut cursor = self.head.take();
        while let Some(key) = cursor {
            cursor = self.nodes.remove(key).next;
        }
        self.len = 0;
    }

    /// Iterate elements in insertion order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Walk to the last node
    fn tail_key(&self) -> Option<usize> {
        let mut cursor = self.head?;
        while let Some(next) = self.nodes[cursor].next {
            cursor = next;
        }
        Some(cursor)
    }

    /// Find the first node whose value satisfies `pred`
    fn position_key(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        let mut cursor = self.head;
        while let Some(key) = cursor {
            let node = &self.nodes[key];
            if pred(&node.value) {
                return Some(key);
            }
            cursor = node.next;
        }
        None
    }
}

impl<T: PartialEq> LinkedList<T> {
    /// Remove the first element equal to `item`.
    ///
    /// # Returns
    ///
    /// `true` if an element was removed; `false` leaves the list untouched
    pub fn remove(&mut self, item: &T) -> bool {
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(key) = cursor {
            let next = self.nodes[key].next;

            if self.nodes[key].value == *item {
                match prev {
                    Some(prev_key) => self.nodes[prev_key].next = next,
                    // This was the head
                    None => self.head = next,
                }
                self.nodes.remove(key);
                self.len -= 1;
                return true;
            }

            prev = Some(key);
            cursor = next;
        }

        false
    }
}

impl<T: ProductKeyed> LinkedList<T> {
    /// Find the element carrying product `id`
    pub fn find(&self, id: &str) -> Option<&T> {
        self.position_key(|value| value.product_id() == id)
            .map(|key| &self.nodes[key].value)
    }

    /// Find the element carrying product `id`, mutably
    pub fn find_mut(&mut self, id: &str) -> Option<&mut T> {
        let key = self.position_key(|value| value.product_id() == id)?;
        Some(&mut self.nodes[key].value)
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Iterator
// ============================================================================

/// Borrowing iterator over a [`LinkedList`], head to tail.
pub struct Iter<'a, T> {
    nodes: &'a Slab<ListNode<T>>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = &self.nodes[key];
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

// ============================================================================
// Unit Tests
// ============================================================================
