//! Arena nodes for the linked list and the product tree.
//!
//! ## Design
//!
//! Both node types live in a [`slab::Slab`] owned by their container and
//! point at each other by slab key (`usize`), never by reference:
//!
//! - [`ListNode`]: value plus a `next` key (singly linked)
//! - [`AvlNode`]: product plus `left`/`right` keys and a cached height
//!
//! Every node has exactly one owner edge (its parent or the container's
//! root/head), so removing a key from the slab frees exactly that node.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup

use crate::types::Product;

// ============================================================================
// ListNode
// ============================================================================

/// Linked list node stored in the list's slab.
#[derive(Debug, Clone)]
pub struct ListNode<T> {
    /// The stored element
    pub value: T,

    /// Next node (slab key), `None` at the tail
    pub next: Option<usize>,
}

impl<T> ListNode<T> {
    /// Create an unlinked node
    #[inline]
    pub fn new(value: T) -> Self {
        Self { value, next: None }
    }

    /// Check if this node is the last one in its list
    #[inline]
    pub fn is_tail(&self) -> bool {
        self.next.is_none()
    }
}

// ============================================================================
// AvlNode
// ============================================================================

/// Product tree node stored in the tree's slab.
///
/// ## Memory Layout
///
/// ```text
/// AvlNode {
///     product: Product
///     left:    Option<usize>   (smaller ids)
///     right:   Option<usize>   (larger ids)
///     height:  i32             (leaf = 1)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AvlNode {
    /// The product record; `product.id` is the node key
    pub product: Product,

    /// Left child (slab key)
    pub left: Option<usize>,

    /// Right child (slab key)
    pub right: Option<usize>,

    /// Height of the subtree rooted here; a fresh leaf has height 1
    pub height: i32,
}

impl AvlNode {
    /// Create a new leaf node
    ///
    /// # Example
    ///
    /// ```
    /// use famin_store::index::AvlNode;
    /// use famin_store::types::Product;
    ///
    /// let node = AvlNode::new(Product::default());
    /// assert!(node.is_leaf());
    /// assert_eq!(node.height, 1);
    /// ```
    #[inline]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            left: None,
            right: None,
            height: 1,
        }
    }

    /// Node key
    #[inline]
    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// Check if this node has no children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn create_test_product(id: &str) -> Product {
        Product::new(id, "Shawl", "Women", "New In", Decimal::from(900), 4)
    }

    #[test]
    fn test_list_node_new() {
        let node = ListNode::new(7u32);

        assert_eq!(node.value, 7);
        assert!(node.next.is_none());
        assert!(node.is_tail());
    }

    #[test]
    fn test_list_node_linking() {
        let mut node = ListNode::new("a");
        node.next = Some(3);
        assert!(!node.is_tail());
    }

    #[test]
    fn test_avl_node_new() {
        let node = AvlNode::new(create_test_product("P1"));

        assert_eq!(node.id(), "P1");
        assert_eq!(node.height, 1);
        assert!(node.is_leaf());
    }

    #[test]
    fn test_avl_node_children() {
        let mut node = AvlNode::new(create_test_product("P1"));

        node.left = Some(0);
        assert!(!node.is_leaf());

        node.left = None;
        node.right = Some(1);
        assert!(!node.is_leaf());
    }
}
