use chain_table::{builtin_strategies, ChainedTable};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

const BUCKETS: usize = 1021;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize, strategy: &dyn chain_table::HashStrategy) -> (ChainedTable, Vec<String>) {
    let mut t = ChainedTable::new(BUCKETS).unwrap();
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        t.insert(k, i as i64, strategy);
    }
    (t, keys)
}

fn bench_insert_10k(c: &mut Criterion) {
    let keys: Vec<_> = lcg(1).take(10_000).map(key).collect();
    for (name, s) in builtin_strategies() {
        c.bench_function(&format!("{name}::insert_10k"), |b| {
            b.iter_batched(
                || ChainedTable::new(BUCKETS).unwrap(),
                |mut t| {
                    for (i, k) in keys.iter().enumerate() {
                        t.insert(k, i as i64, s);
                    }
                    black_box(t)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_search_hit(c: &mut Criterion) {
    for (name, s) in builtin_strategies() {
        let (t, keys) = filled(7, 10_000, s);
        let mut it = keys.iter().cycle();
        c.bench_function(&format!("{name}::search_hit"), |b| {
            b.iter(|| {
                let k = it.next().unwrap();
                black_box(t.search(k, s))
            })
        });
    }
}

fn bench_search_miss(c: &mut Criterion) {
    for (name, s) in builtin_strategies() {
        let (t, _keys) = filled(11, 10_000, s);
        let mut miss = lcg(0xdead_beef);
        c.bench_function(&format!("{name}::search_miss"), |b| {
            b.iter(|| {
                let k = key(miss.next().unwrap());
                black_box(t.search(&k, s))
            })
        });
    }
}

fn bench_delete_reinsert(c: &mut Criterion) {
    for (name, s) in builtin_strategies() {
        let (mut t, keys) = filled(13, 10_000, s);
        let mut it = keys.iter().cycle();
        c.bench_function(&format!("{name}::delete_reinsert"), |b| {
            b.iter(|| {
                let k = it.next().unwrap();
                let e = t.delete(k, s).unwrap();
                t.insert(k, e.value(), s);
            })
        });
    }
}

// Not timed: prints the longest chain per strategy so distribution
// differences are visible next to the timings.
fn report_chain_spread(_c: &mut Criterion) {
    for (name, s) in builtin_strategies() {
        let (t, _keys) = filled(17, 10_000, s);
        let lengths = t.chain_lengths();
        let longest = lengths.iter().copied().max().unwrap_or(0);
        let empty = lengths.iter().filter(|&&n| n == 0).count();
        eprintln!(
            "{name}: load factor {:.2}, longest chain {longest}, empty buckets {empty}",
            t.load_factor()
        );
    }
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = report_chain_spread, bench_insert_10k, bench_search_hit, bench_search_miss, bench_delete_reinsert
}
criterion_main!(benches);
