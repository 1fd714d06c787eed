// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_label_index::{BuildOptions, IndexBuilder, LabelInput, QueryWindow, scan};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Labels spread over a `size` x `size` map with elimination times skewed low,
/// the way few labels survive far zoom-outs.
fn gen_uniform_labels(count: usize, size: f64) -> Vec<LabelInput> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|i| {
            let x = rng.next_f64() * size;
            let y = rng.next_f64() * size;
            let u = rng.next_f64();
            LabelInput::new(x, y, u * u * u * 100.0, i as i64, format!("label {i}"))
        })
        .collect()
}

fn gen_clustered_labels(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<LabelInput> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for c in 0..n_clusters {
        let (cx, cy) = (rng.next_f64() * 10_000.0, rng.next_f64() * 10_000.0);
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            let id = out.len() as i64;
            out.push(LabelInput::new(
                cx + dx,
                cy + dy,
                rng.next_f64() * 100.0,
                id,
                format!("c{c}"),
            ));
        }
    }
    out
}

/// Viewports tiling the map, one per frame of a pan.
fn gen_viewports(size: f64, view: f64, min_t: f64) -> Vec<QueryWindow> {
    let steps = 16;
    let step = (size - view) / steps as f64;
    (0..steps * steps)
        .map(|i| {
            let x = (i % steps) as f64 * step;
            let y = (i / steps) as f64 * step;
            QueryWindow::new(min_t, x, x + view, y, y + view)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_index_build");
    for &n in &[10_000usize, 100_000] {
        let labels = gen_uniform_labels(n, 10_000.0);
        group.throughput(Throughput::Elements(n as u64));
        for &bucket_size in &[1usize, 8, 32] {
            group.bench_function(format!("n{n}_bucket{bucket_size}"), |b| {
                b.iter_batched(
                    || labels.clone(),
                    |labels| {
                        let idx = IndexBuilder::new()
                            .with_options(BuildOptions { bucket_size })
                            .build(labels)
                            .unwrap();
                        black_box(idx.node_count());
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_viewport_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_index_viewports");
    let labels = gen_uniform_labels(200_000, 10_000.0);
    let idx = IndexBuilder::new().build(labels).unwrap();
    for &(view, min_t) in &[(500.0, 0.0), (500.0, 10.0), (5_000.0, 50.0), (10_000.0, 90.0)] {
        let windows = gen_viewports(10_000.0, view, min_t);
        group.throughput(Throughput::Elements(windows.len() as u64));
        group.bench_function(format!("tree_view{view}_t{min_t}"), |b| {
            let mut buf = Vec::new();
            b.iter(|| {
                let mut total = 0;
                for w in &windows {
                    buf.clear();
                    idx.query_into(w, &mut buf);
                    total += buf.len();
                }
                black_box(total);
            })
        });
        group.bench_function(format!("count_view{view}_t{min_t}"), |b| {
            b.iter(|| {
                let total: usize = windows.iter().map(|w| idx.count(w)).sum();
                black_box(total);
            })
        });
    }
    group.finish();
}

fn bench_scan_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_index_vs_scan");
    let labels = gen_clustered_labels(64, 1024, 400.0);
    let idx = IndexBuilder::new().build(labels).unwrap();
    let w = QueryWindow::new(20.0, 2_000.0, 3_000.0, 2_000.0, 3_000.0);
    group.bench_function("tree", |b| b.iter(|| black_box(idx.query(&w).len())));
    group.bench_function("scan", |b| {
        b.iter(|| black_box(scan(idx.labels(), &w).len()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_viewport_queries,
    bench_scan_baseline
);
criterion_main!(benches);
