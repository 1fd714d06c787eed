// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_label_index::{IndexBuilder, LabelInput, QueryWindow};

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

type TimedPoint = GeomWithData<[f64; 2], f64>;

fn gen_grid_labels(n: usize, cell: f64) -> Vec<LabelInput> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let i = y * n + x;
            // Deterministic spread of elimination times over 0..100.
            let t = ((i * 7919) % 1000) as f64 / 10.0;
            out.push(LabelInput::new(
                x as f64 * cell,
                y as f64 * cell,
                t,
                i as i64,
                format!("g{i}"),
            ));
        }
    }
    out
}

fn to_rstar_points(v: &[LabelInput]) -> Vec<TimedPoint> {
    v.iter().map(|l| GeomWithData::new([l.x, l.y], l.t)).collect()
}

fn bench_rstar_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_external_compare");
    for &n in &[128usize, 512] {
        let labels = gen_grid_labels(n, 10.0);
        let window = QueryWindow::new(60.0, 100.0, 500.0, 100.0, 500.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("understory_build_query_n{n}"), |b| {
            b.iter_batched(
                || labels.clone(),
                |labels| {
                    let idx = IndexBuilder::new().build(labels).unwrap();
                    black_box(idx.count(&window));
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("rstar_build_query_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_points(&labels),
                |points| {
                    let tree = RTree::bulk_load(points);
                    let aabb = AABB::from_corners(
                        [window.rect.x0, window.rect.y0],
                        [window.rect.x1, window.rect.y1],
                    );
                    let hits = tree
                        .locate_in_envelope(&aabb)
                        .filter(|p| p.data >= window.min_t)
                        .count();
                    black_box(hits);
                },
                BatchSize::LargeInput,
            )
        });

        let idx = IndexBuilder::new().build(labels.clone()).unwrap();
        let tree = RTree::bulk_load(to_rstar_points(&labels));
        group.bench_function(format!("understory_query_n{n}"), |b| {
            b.iter(|| black_box(idx.count(&window)))
        });
        group.bench_function(format!("rstar_query_n{n}"), |b| {
            let aabb = AABB::from_corners(
                [window.rect.x0, window.rect.y0],
                [window.rect.x1, window.rect.y1],
            );
            b.iter(|| {
                black_box(
                    tree.locate_in_envelope(&aabb)
                        .filter(|p| p.data >= window.min_t)
                        .count(),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_external_compare);
criterion_main!(benches);
