//! Benchmarks for the store's index structures.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- product_tree
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use famin_store::{ChainedHashMap, Customer, LinkedList, Order, OrderHeap, PaymentMethod, Product, ProductTree};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

// ============================================================================
// HELPER FUNCTIONS - Deterministic data generation
// ============================================================================

fn make_product(id: String) -> Product {
    Product::new(id, "Bench Item", "Women", "New In", Decimal::from(1999), 50)
}

/// Shuffled product ids, same seed = same order
fn generate_product_ids(count: usize, seed: u64) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ids: Vec<String> = (0..count).map(|i| format!("P{:07}", i)).collect();
    for i in (1..ids.len()).rev() {
        let j = rng.gen_range(0..=i);
        ids.swap(i, j);
    }
    ids
}

fn generate_orders(count: usize, seed: u64) -> Vec<Order> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| Order {
            order_id: format!("ORD{:06}", i + 1),
            tracking_id: format!("TRK{:06}", i + 1),
            timestamp: "2025-06-01 12:00:00".to_string(),
            customer_name: "Bench".to_string(),
            customer_address: "Street".to_string(),
            customer_phone: "0".to_string(),
            payment_method: PaymentMethod::OnlinePayment,
            items: LinkedList::new(),
            total_price: Decimal::new(rng.gen_range(100..10_000_000), 2),
        })
        .collect()
}

fn populate_tree(ids: &[String]) -> ProductTree {
    let mut tree = ProductTree::with_capacity(ids.len());
    for id in ids {
        tree.insert(make_product(id.clone()));
    }
    tree
}

// ============================================================================
// BENCHMARK: Product tree
// ============================================================================

fn bench_product_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_tree");
    group.measurement_time(Duration::from_secs(5));

    for size in [1_000, 10_000, 100_000] {
        let ids = generate_product_ids(size, 42);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &ids, |b, ids| {
            b.iter_batched(
                || ids.clone(),
                |ids| {
                    let mut tree = ProductTree::with_capacity(ids.len());
                    for id in ids {
                        tree.insert(make_product(id));
                    }
                    black_box(tree.height())
                },
                BatchSize::LargeInput,
            );
        });
    }

    // Lookups in a 100k catalog
    let ids = generate_product_ids(100_000, 7);
    let tree = populate_tree(&ids);
    group.throughput(Throughput::Elements(1));
    group.bench_function("find_in_100k", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 7919) % ids.len();
            black_box(tree.find(&ids[i]))
        });
    });

    group.bench_function("remove_1k_from_10k", |b| {
        b.iter_batched(
            || populate_tree(&ids[..10_000]),
            |mut tree| {
                for id in &ids[..1_000] {
                    tree.remove(id);
                }
                black_box(tree.len())
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("in_order_100k", |b| {
        b.iter(|| black_box(tree.iter().count()));
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Customer table
// ============================================================================

fn bench_hash_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("chained_hash_map");
    group.measurement_time(Duration::from_secs(5));

    // 100 buckets at a load factor of 10 and 100
    for count in [1_000, 10_000] {
        let customers: Vec<Customer> = (0..count)
            .map(|i| Customer::new(format!("{}", 100_000 + i), "Bench", "bench@example.com"))
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("insert", count), &customers, |b, customers| {
            b.iter_batched(
                || customers.clone(),
                |customers| {
                    let mut map = ChainedHashMap::new();
                    for customer in customers {
                        map.insert(customer.id.clone(), customer);
                    }
                    black_box(map.len())
                },
                BatchSize::LargeInput,
            );
        });

        let map: ChainedHashMap<String, Customer> =
            customers.iter().map(|c| (c.id.clone(), c.clone())).collect();
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("find", count), &count, |b, &count| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 31) % count;
                black_box(map.find(customers[i].id.as_str()))
            });
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Order heap
// ============================================================================

fn bench_order_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_heap");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(50);

    for count in [1_000, 10_000] {
        let orders = generate_orders(count, 99);
        let heap: OrderHeap = orders.iter().cloned().collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("insert", count), &orders, |b, orders| {
            b.iter_batched(
                || orders.clone(),
                |orders| {
                    let mut heap = OrderHeap::new();
                    for order in orders {
                        heap.insert(order);
                    }
                    black_box(heap.len())
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("sorted_desc", count), &heap, |b, heap| {
            b.iter(|| black_box(heap.sorted_desc().len()));
        });
    }

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(benches, bench_product_tree, bench_hash_map, bench_order_heap);

criterion_main!(benches);
