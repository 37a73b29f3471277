use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use apriori_miner::{generate_rules, mine_frequent_itemsets, Dataset};

/// Deterministic baskets over `items` products with a skewed popularity.
fn synthetic_baskets(baskets: usize, items: usize) -> Dataset {
    let names: Vec<String> = (0..items).map(|i| format!("item{i:03}")).collect();
    let transactions = (0..baskets).map(|b| {
        let size = 2 + (b * 7) % 6;
        (0..size)
            .map(|j| {
                let pick = (b * 31 + j * j * 17 + j * 13) % (items * 3);
                names[pick % items].clone()
            })
            .collect::<Vec<_>>()
    });
    Dataset::from_transactions(transactions)
}

fn benchmark_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("mine_frequent_itemsets");

    for baskets in [1_000, 10_000] {
        let dataset = synthetic_baskets(baskets, 50);
        group.throughput(Throughput::Elements(baskets as u64));

        for max_len in [2, 3, 4] {
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("n{baskets}_len{max_len}")),
                &max_len,
                |b, &max_len| {
                    b.iter(|| {
                        mine_frequent_itemsets(&dataset, std::hint::black_box(0.02), max_len)
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_rules");
    let dataset = synthetic_baskets(10_000, 50);
    let itemsets = mine_frequent_itemsets(&dataset, 0.01, 4);

    for min_confidence in [0.1, 0.5] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("conf{min_confidence}")),
            &min_confidence,
            |b, &min_confidence| {
                b.iter(|| generate_rules(&itemsets, std::hint::black_box(min_confidence)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_mining, benchmark_rules);
criterion_main!(benches);
