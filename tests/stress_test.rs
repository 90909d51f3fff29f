//! Stress tests for the index structures.
//!
//! These tests verify:
//! 1. The AVL invariants hold after every insert and remove
//! 2. The hash map and linked list agree with std reference models
//! 3. Heap drains come out in descending total order
//! 4. Identical seeds produce identical structures
//!
//! ## Running Stress Tests
//!
//! ```bash
//! # Run all stress tests (release mode recommended)
//! cargo test --release --test stress_test -- --nocapture
//!
//! # Run specific test
//! cargo test --release --test stress_test stress_avl_random_ops -- --nocapture
//! ```

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use famin_store::{ChainedHashMap, LinkedList, Order, OrderHeap, PaymentMethod, Product, ProductTree};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Operations in the fully-checked AVL run
const AVL_CHECKED_OPS: usize = 5_000;

/// Distinct product ids drawn from in the AVL runs
const ID_POOL: u32 = 500;

/// Products in the large tree run
const LARGE_TREE_SIZE: usize = 100_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn make_product(id: &str, quantity: u32) -> Product {
    Product::new(id, format!("Item {}", id), "Women", "New In", Decimal::from(100), quantity)
}

fn make_order(seq: u64, total: Decimal) -> Order {
    Order {
        order_id: format!("ORD{:06}", seq),
        tracking_id: format!("TRK{:06}", seq),
        timestamp: "2025-06-01 12:00:00".to_string(),
        customer_name: "Stress".to_string(),
        customer_address: "Nowhere".to_string(),
        customer_phone: "0".to_string(),
        payment_method: PaymentMethod::Cash,
        items: LinkedList::new(),
        total_price: total,
    }
}

/// Random id from the pool; deliberately not zero-padded so string order
/// differs from numeric order
fn random_id(rng: &mut ChaCha8Rng) -> String {
    rng.gen_range(0..ID_POOL).to_string()
}

/// Build a tree from a seeded mix of inserts and removes
fn run_tree_sequence(seed: u64, ops: usize) -> ProductTree {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tree = ProductTree::new();
    for _ in 0..ops {
        let id = random_id(&mut rng);
        if rng.gen_bool(0.6) {
            tree.insert(make_product(&id, rng.gen_range(0..50)));
        } else {
            tree.remove(&id);
        }
    }
    tree
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Random inserts, replacements and removes against a BTreeMap model.
///
/// # Verification
/// - `is_valid()` (balance, heights, ordering) after every operation
/// - `find` agrees with the model after every operation
/// - Final in-order traversal equals the model's ascending order
#[test]
fn stress_avl_random_ops() {
    println!("\n=== STRESS TEST: AVL random operations ===\n");

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut tree = ProductTree::new();
    let mut model: BTreeMap<String, u32> = BTreeMap::new();

    let start = Instant::now();
    for step in 0..AVL_CHECKED_OPS {
        let id = random_id(&mut rng);

        if rng.gen_bool(0.6) {
            let quantity = rng.gen_range(0..100);
            let before = tree.len();
            let replaced = tree.insert(make_product(&id, quantity));

            assert_eq!(replaced.is_some(), model.contains_key(&id));
            if replaced.is_some() {
                assert_eq!(tree.len(), before, "replace must not add a node");
            }
            model.insert(id.clone(), quantity);
            assert_eq!(tree.find(&id).map(|p| p.quantity), Some(quantity));
        } else {
            let removed = tree.remove(&id);
            assert_eq!(removed, model.remove(&id).is_some());
            assert!(tree.find(&id).is_none());
        }

        assert!(tree.is_valid(), "AVL invariant broken at step {}", step);
        assert_eq!(tree.len(), model.len());
    }
    println!("  {} checked operations in {:.2?}", AVL_CHECKED_OPS, start.elapsed());

    let ids: Vec<String> = tree.get_all().into_iter().map(|p| p.id).collect();
    let expected: Vec<String> = model.keys().cloned().collect();
    assert_eq!(ids, expected);

    println!("  Final size: {}, height: {}", tree.len(), tree.height());
    println!("\n=== AVL RANDOM OPERATIONS PASSED ===\n");
}

/// Sequential ids are the worst case for an unbalanced BST.
#[test]
fn stress_avl_sequential_inserts_then_drain() {
    let mut tree = ProductTree::with_capacity(LARGE_TREE_SIZE);

    let start = Instant::now();
    for i in 0..LARGE_TREE_SIZE {
        tree.insert(make_product(&format!("{:08}", i), 1));
    }
    println!("  Inserted {} sequential ids in {:.2?}", LARGE_TREE_SIZE, start.elapsed());

    assert_eq!(tree.len(), LARGE_TREE_SIZE);
    // 1.44 * log2(100_002) is about 23.9
    assert!(tree.height() <= 24, "height {} too large", tree.height());
    assert!(tree.is_valid());

    // Remove every other id, then the rest
    for i in (0..LARGE_TREE_SIZE).step_by(2) {
        assert!(tree.remove(&format!("{:08}", i)));
    }
    assert!(tree.is_valid());
    assert_eq!(tree.len(), LARGE_TREE_SIZE / 2);

    for i in (1..LARGE_TREE_SIZE).step_by(2) {
        assert!(tree.remove(&format!("{:08}", i)));
    }
    assert!(tree.is_empty());
}

/// Same seed, same tree; different seed, different tree.
#[test]
fn verify_determinism() {
    const OPS: usize = 10_000;
    const SEED: u64 = 12345;

    let ids = |tree: &ProductTree| tree.iter().map(|p| p.id.clone()).collect::<Vec<_>>();

    let a = run_tree_sequence(SEED, OPS);
    let b = run_tree_sequence(SEED, OPS);
    assert_eq!(ids(&a), ids(&b), "same seed must give the same catalog");
    assert_eq!(a.height(), b.height());

    let c = run_tree_sequence(SEED + 1, OPS);
    assert_ne!(ids(&a), ids(&c), "different seeds should give different catalogs");

    // Hash map enumeration order is fixed across instances
    let keys: Vec<String> = (0..1_000).map(|i| format!("{}", 1000 + i)).collect();
    let m1: ChainedHashMap<String, usize> = keys.iter().cloned().zip(0..).collect();
    let m2: ChainedHashMap<String, usize> = keys.iter().cloned().zip(0..).collect();
    assert!(m1.keys().eq(m2.keys()));
}

/// Random inserts, overwrites and removes against std HashMap.
#[test]
fn stress_hash_map_vs_reference() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut map: ChainedHashMap<String, u64> = ChainedHashMap::new();
    let mut model: HashMap<String, u64> = HashMap::new();

    for _ in 0..50_000 {
        let key = format!("{}", rng.gen_range(0..2_000u32));
        match rng.gen_range(0..3) {
            0 | 1 => {
                let value = rng.gen::<u64>();
                assert_eq!(map.insert(key.clone(), value), model.insert(key.clone(), value));
            }
            _ => {
                assert_eq!(map.remove(&key), model.remove(&key).is_some());
            }
        }
        assert_eq!(map.len(), model.len());
    }

    for (k, v) in &model {
        assert_eq!(map.find(k), Some(v));
    }
    assert_eq!(map.iter().count(), model.len());
    assert_eq!(map.bucket_count(), 100);
}

/// Heap drain order is non-increasing and contains every order.
#[test]
fn stress_heap_drain() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut heap = OrderHeap::new();
    let mut totals = Vec::new();

    for seq in 0..10_000u64 {
        // Cents precision, plenty of ties
        let total = Decimal::new(rng.gen_range(0..5_000i64), 2);
        totals.push(total);
        heap.insert(make_order(seq, total));
    }

    let drained = heap.sorted_desc();
    assert_eq!(drained.len(), totals.len());
    assert!(drained.windows(2).all(|w| w[0].total_price >= w[1].total_price));

    totals.sort_by(|a, b| b.cmp(a));
    let drained_totals: Vec<Decimal> = drained.iter().map(|o| o.total_price).collect();
    assert_eq!(drained_totals, totals);

    // The heap itself is untouched
    assert_eq!(heap.len(), 10_000);
    assert_eq!(heap.peek_max().map(|o| o.total_price), totals.first().copied());
}

/// Linked list push/remove against a Vec model.
#[test]
fn stress_linked_list_vs_vec() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut list: LinkedList<u32> = LinkedList::new();
    let mut model: Vec<u32> = Vec::new();

    for _ in 0..5_000 {
        let value = rng.gen_range(0..200);
        if rng.gen_bool(0.55) {
            list.push_back(value);
            model.push(value);
        } else {
            let expected = match model.iter().position(|v| *v == value) {
                Some(pos) => {
                    model.remove(pos);
                    true
                }
                None => false,
            };
            assert_eq!(list.remove(&value), expected);
        }
        assert_eq!(list.len(), model.len());
    }

    assert!(list.iter().copied().eq(model.iter().copied()));
}
