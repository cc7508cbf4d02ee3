use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use oa_hashmap::OaHashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (OaHashMap<String, u64>, Vec<String>) {
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    let m = keys.iter().cloned().zip(0u64..).collect();
    (m, keys)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("oa_hashmap_insert_10k", |b| {
        b.iter_batched(
            OaHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_extend_presized(c: &mut Criterion) {
    c.bench_function("oa_hashmap_extend_10k", |b| {
        let items: Vec<_> = lcg(3).take(10_000).map(key).zip(0u64..).collect();
        b.iter_batched(
            || items.clone(),
            |items| {
                let mut m = OaHashMap::<String, u64>::new();
                m.extend(items);
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("oa_hashmap_get_hit", |b| {
        let (m, keys) = filled(7, 20_000);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("oa_hashmap_get_miss", |b| {
        let (m, _) = filled(11, 10_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in map
            let k = key(miss.next().unwrap());
            black_box(m.get(&k));
        })
    });
}

// Remove and re-insert the same keys so probes keep walking tombstones.
fn bench_churn(c: &mut Criterion) {
    c.bench_function("oa_hashmap_remove_reinsert", |b| {
        let (mut m, keys) = filled(13, 10_000);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            let v = m.remove(k).unwrap();
            black_box(m.insert(k.clone(), v));
        })
    });
}

fn bench_cursor_drain(c: &mut Criterion) {
    c.bench_function("oa_hashmap_cursor_drain_10k", |b| {
        let (m, _) = filled(17, 10_000);
        b.iter_batched(
            || m.clone(),
            |mut m| {
                let mut cur = m.cursor();
                while cur.advance(&m).unwrap() {
                    black_box(cur.remove(&mut m).unwrap());
                }
                m
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_extend_presized, bench_get_hit, bench_get_miss, bench_churn,
        bench_cursor_drain
}
criterion_main!(benches);
