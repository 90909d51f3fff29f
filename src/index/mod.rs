//! In-memory index structures.
//!
//! ## Components
//!
//! - [`ChainedHashMap`]: Fixed-bucket separate-chaining map (customers,
//!   monthly sales, admin credentials)
//! - [`LinkedList`]: Insertion-ordered list (cart lines, order lines)
//! - [`ProductTree`]: AVL tree of products keyed by id
//! - [`OrderHeap`]: Max-heap of orders by total price
//!
//! The list and the tree keep their nodes in a [`slab::Slab`] arena and
//! link them by key. See [`node`] for the node layouts.

pub mod node;
mod avl;
mod hash_table;
mod heap;
mod linked_list;

pub use avl::{Iter as TreeIter, ProductTree};
pub use hash_table::{ChainedHashMap, FixedState, DEFAULT_BUCKET_COUNT};
pub use heap::OrderHeap;
pub use linked_list::{Iter as ListIter, LinkedList, ProductKeyed};
pub use node::{AvlNode, ListNode};
