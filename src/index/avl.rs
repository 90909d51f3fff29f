//! AVL tree of products, keyed by product id.
//!
//! ## Architecture
//!
//! Nodes are [`AvlNode`]s in a [`Slab`]; children are slab keys. The tree
//! owns the slab, so each node has exactly one owner edge and removing a key
//! frees exactly one node.
//!
//! ## Ordering
//!
//! Keys compare as plain strings: `"10" < "2" < "A"`. In-order traversal
//! is strictly ascending.
//!
//! ## Rebalancing
//!
//! Insert and delete choose rotations differently:
//!
//! | Path | Left-heavy (`bf > 1`) | Right-heavy (`bf < -1`) |
//! |------|-----------------------|-------------------------|
//! | insert | new id `<` left child id: LL, else LR | new id `>` right child id: RR, else RL |
//! | delete | `bf(left) >= 0`: LL, else LR | `bf(right) <= 0`: RR, else RL |
//!
//! Inserting an id that already exists replaces the stored record and does
//! not restructure the tree.
//!
//! ## Example
//!
//! ```
//! use famin_store::index::ProductTree;
//! use famin_store::types::Product;
//! use rust_decimal::Decimal;
//!
//! let mut tree = ProductTree::new();
//! for id in ["B", "A", "C"] {
//!     tree.insert(Product::new(id, "Kurta", "Men", "Casual", Decimal::from(2000), 5));
//! }
//!
//! assert_eq!(tree.len(), 3);
//! assert!(tree.find("A").is_some());
//! assert!(tree.remove("A"));
//! assert!(!tree.remove("A"));
//!
//! let ids: Vec<_> = tree.get_all().into_iter().map(|p| p.id).collect();
//! assert_eq!(ids, vec!["B", "C"]);
//! ```

use std::cmp::Ordering;

use slab::Slab;

use crate::index::AvlNode;
use crate::types::Product;

/// Self-balancing search tree over products.
#[derive(Debug, Clone, Default)]
pub struct ProductTree {
    /// Node storage
    nodes: Slab<AvlNode>,

    /// Root node (slab key), `None` when empty
    root: Option<usize>,
}

impl ProductTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
        }
    }

    /// Create an empty tree with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: None,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of products in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no products
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree (0 when empty)
    #[inline]
    pub fn height(&self) -> i32 {
        self.height_of(self.root)
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Insert a product, or replace the record stored under the same id.
    ///
    /// # Returns
    ///
    /// The replaced record when the id was already present, else `None`
    pub fn insert(&mut self, product: Product) -> Option<Product> {
        let mut replaced = None;
        let root = self.insert_node(self.root, product, &mut replaced);
        self.root = Some(root);
        replaced
    }

    /// Look up a product by id, O(log n)
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.find_key(id).map(|key| &self.nodes[key].product)
    }

    /// Look up a product by id for in-place mutation.
    ///
    /// Callers must not change `id` through this reference; use
    /// [`ProductTree::remove`] and [`ProductTree::insert`] to re-key.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Product> {
        let key = self.find_key(id)?;
        Some(&mut self.nodes[key].product)
    }

    /// Check if a product id is present
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.find_key(id).is_some()
    }

    /// Remove a product by id.
    ///
    /// # Returns
    ///
    /// `true` if a product was removed
    pub fn remove(&mut self, id: &str) -> bool {
        if self.find_key(id).is_none() {
            return false;
        }
        self.root = self.remove_node(self.root, id);
        true
    }

    /// All products in ascending id order
    pub fn get_all(&self) -> Vec<Product> {
        let mut result = Vec::with_capacity(self.len());
        self.collect_in_order(self.root, &mut result);
        result
    }

    /// Borrowing in-order iterator
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
        };
        iter.push_left(self.root);
        iter
    }

    /// Free every node, children before parents.
    pub fn clear(&mut self) {
        let root = self.root.take();
        self.free_subtree(root);
        self.nodes.clear();
    }

    /// Verify the AVL and search-tree invariants at every node.
    ///
    /// Checks cached heights, `|balance| <= 1`, strictly ascending in-order
    /// ids and that every stored node is reachable from the root.
    pub fn is_valid(&self) -> bool {
        if self.check_subtree(self.root).is_none() {
            return false;
        }

        let mut reachable = 0;
        let mut prev: Option<&str> = None;
        for product in self.iter() {
            if let Some(p) = prev {
                if p >= product.id.as_str() {
                    return false;
                }
            }
            prev = Some(&product.id);
            reachable += 1;
        }

        reachable == self.nodes.len()
    }

    // ========================================================================
    // Height and balance helpers
    // ========================================================================

    #[inline]
    fn height_of(&self, key: Option<usize>) -> i32 {
        key.map_or(0, |k| self.nodes[k].height)
    }

    /// height(left) - height(right); 0 for an empty subtree
    #[inline]
    fn balance_of(&self, key: Option<usize>) -> i32 {
        match key {
            Some(k) => {
                let node = &self.nodes[k];
                self.height_of(node.left) - self.height_of(node.right)
            }
            None => 0,
        }
    }

    #[inline]
    fn update_height(&mut self, key: usize) {
        let node = &self.nodes[key];
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.nodes[key].height = height;
    }

    // ========================================================================
    // Rotations
    // ========================================================================

    /// ```text
    ///       y            x
    ///      / \          / \
    ///     x   C   =>   A   y
    ///    / \              / \
    ///   A   T2           T2  C
    /// ```
    fn rotate_right(&mut self, y: usize) -> usize {
        let Some(x) = self.nodes[y].left else {
            return y;
        };
        let t2 = self.nodes[x].right;

        self.nodes[x].right = Some(y);
        self.nodes[y].left = t2;

        self.update_height(y);
        self.update_height(x);
        x
    }

    /// Mirror of [`Self::rotate_right`]
    fn rotate_left(&mut self, x: usize) -> usize {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        let t2 = self.nodes[y].left;

        self.nodes[y].left = Some(x);
        self.nodes[x].right = t2;

        self.update_height(x);
        self.update_height(y);
        y
    }

    // ========================================================================
    // Insert
    // ========================================================================

    fn insert_node(
        &mut self,
        node: Option<usize>,
        product: Product,
        replaced: &mut Option<Product>,
    ) -> usize {
        let Some(key) = node else {
            return self.nodes.insert(AvlNode::new(product));
        };

        let id = product.id.clone();
        match id.as_str().cmp(self.nodes[key].id()) {
            Ordering::Less => {
                let left = self.insert_node(self.nodes[key].left, product, replaced);
                self.nodes[key].left = Some(left);
            }
            Ordering::Greater => {
                let right = self.insert_node(self.nodes[key].right, product, replaced);
                self.nodes[key].right = Some(right);
            }
            Ordering::Equal => {
                *replaced = Some(std::mem::replace(&mut self.nodes[key].product, product));
                return key;
            }
        }

        self.update_height(key);
        let balance = self.balance_of(Some(key));

        if balance > 1 {
            if let Some(left) = self.nodes[key].left {
                // Left Left
                if id.as_str() < self.nodes[left].id() {
                    return self.rotate_right(key);
                }
                // Left Right
                if id.as_str() > self.nodes[left].id() {
                    let new_left = self.rotate_left(left);
                    self.nodes[key].left = Some(new_left);
                    return self.rotate_right(key);
                }
            }
        }

        if balance < -1 {
            if let Some(right) = self.nodes[key].right {
                // Right Right
                if id.as_str() > self.nodes[right].id() {
                    return self.rotate_left(key);
                }
                // Right Left
                if id.as_str() < self.nodes[right].id() {
                    let new_right = self.rotate_right(right);
                    self.nodes[key].right = Some(new_right);
                    return self.rotate_left(key);
                }
            }
        }

        key
    }

    // ========================================================================
    // Remove
    // ========================================================================

    fn remove_node(&mut self, node: Option<usize>, id: &str) -> Option<usize> {
        let key = node?;

        match id.cmp(self.nodes[key].id()) {
            Ordering::Less => {
                let left = self.remove_node(self.nodes[key].left, id);
                self.nodes[key].left = left;
            }
            Ordering::Greater => {
                let right = self.remove_node(self.nodes[key].right, id);
                self.nodes[key].right = right;
            }
            Ordering::Equal => match (self.nodes[key].left, self.nodes[key].right) {
                (Some(_), Some(right)) => {
                    // Promote the in-order successor, then delete it below
                    let successor = self.min_key(right);
                    let promoted = self.nodes[successor].product.clone();
                    let new_right = self.remove_node(Some(right), &promoted.id);
                    self.nodes[key].right = new_right;
                    self.nodes[key].product = promoted;
                }
                (child, None) | (None, child) => {
                    // Leaf or single child: the child (already balanced) takes our place
                    self.nodes.remove(key);
                    return child;
                }
            },
        }

        self.update_height(key);
        let balance = self.balance_of(Some(key));
        let left = self.nodes[key].left;
        let right = self.nodes[key].right;

        if balance > 1 {
            // Left Left
            if self.balance_of(left) >= 0 {
                return Some(self.rotate_right(key));
            }
            // Left Right
            if let Some(l) = left {
                let new_left = self.rotate_left(l);
                self.nodes[key].left = Some(new_left);
            }
            return Some(self.rotate_right(key));
        }

        if balance < -1 {
            // Right Right
            if self.balance_of(right) <= 0 {
                return Some(self.rotate_left(key));
            }
            // Right Left
            if let Some(r) = right {
                let new_right = self.rotate_right(r);
                self.nodes[key].right = Some(new_right);
            }
            return Some(self.rotate_left(key));
        }

        Some(key)
    }

    fn min_key(&self, mut key: usize) -> usize {
        while let Some(left) = self.nodes[key].left {
            key = left;
        }
        key
    }

    // ========================================================================
    // Lookup and traversal
    // ========================================================================

    fn find_key(&self, id: &str) -> Option<usize> {
        let mut cursor = self.root;
        while let Some(key) = cursor {
            let node = &self.nodes[key];
            cursor = match id.cmp(node.id()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(key),
            };
        }
        None
    }

    fn collect_in_order(&self, node: Option<usize>, out: &mut Vec<Product>) {
        if let Some(key) = node {
            let n = &self.nodes[key];
            self.collect_in_order(n.left, out);
            out.push(n.product.clone());
            self.collect_in_order(n.right, out);
        }
    }

    fn free_subtree(&mut self, node: Option<usize>) {
        if let Some(key) = node {
            let (left, right) = (self.nodes[key].left, self.nodes[key].right);
            self.free_subtree(left);
            self.free_subtree(right);
            self.nodes.remove(key);
        }
    }

    /// Height of a valid subtree, or `None` on the first violation
    fn check_subtree(&self, node: Option<usize>) -> Option<i32> {
        let Some(key) = node else {
            return Some(0);
        };
        let n = self.nodes.get(key)?;
        let left = self.check_subtree(n.left)?;
        let right = self.check_subtree(n.right)?;

        if (left - right).abs() > 1 || n.height != 1 + left.max(right) {
            return None;
        }
        Some(n.height)
    }
}

// ============================================================================
// Iterator
// ============================================================================

/// In-order iterator over a [`ProductTree`].
pub struct Iter<'a> {
    nodes: &'a Slab<AvlNode>,
    stack: Vec<usize>,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut node: Option<usize>) {
        while let Some(key) = node {
            self.stack.push(key);
            node = self.nodes[key].left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Product;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.stack.pop()?;
        let node = &self.nodes[key];
        self.push_left(node.right);
        Some(&node.product)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
