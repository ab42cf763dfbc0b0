// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_quadtree::{Quadtree, SpatialObject};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;

const WORLD: Rect = Rect::new(0.0, 0.0, 2000.0, 2000.0);

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Rect::new(x0, y0, x0 + cell, y0 + cell));
        }
    }
    out
}

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

fn gen_random_rects(count: usize, max_w: f64, max_h: f64, rect_w: f64, rect_h: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (max_w - rect_w).max(1.0);
        let y0 = rng.next_f64() * (max_h - rect_h).max(1.0);
        out.push(Rect::new(x0, y0, x0 + rect_w, y0 + rect_h));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Rect::new(cx + dx, cy + dy, cx + dx + 12.0, cy + dy + 12.0));
        }
    }
    out
}

fn bench_insert_retrieve(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_retrieve");
    for &n in &[16usize, 32, 64] {
        let rects = gen_grid_rects(n, 2000.0 / n as f64);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter_batched(
                || Quadtree::with_capacity(WORLD, 10, 6),
                |mut tree| {
                    for r in rects.iter().copied() {
                        let _ = tree.insert(SpatialObject::new(r, ()));
                    }
                    let hits = tree
                        .retrieve(Rect::new(100.0, 100.0, 500.0, 500.0))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    let rects = gen_clustered_rects(16, 256, 128.0);
    group.bench_function("clustered", |b| {
        b.iter_batched(
            || Quadtree::with_capacity(WORLD, 8, 6),
            |mut tree| {
                for r in rects.iter().copied() {
                    let _ = tree.insert(SpatialObject::new(r, ()));
                }
                let hits = tree
                    .retrieve(Rect::new(800.0, 800.0, 1200.0, 1200.0))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_heavy");
    let rects = gen_grid_rects(128, 8.0);
    group.bench_function("build_then_many_queries", |b| {
        b.iter_batched(
            || {
                let mut tree = Quadtree::with_capacity(WORLD, 10, 6);
                for r in rects.iter().copied() {
                    let _ = tree.insert(SpatialObject::new(r, ()));
                }
                tree
            },
            |tree| {
                let mut total = 0usize;
                for q in 0..256 {
                    let x = (q % 64) as f64 * 8.0;
                    let y = (q / 64) as f64 * 8.0;
                    total += tree
                        .retrieve(Rect::new(x, y, x + 64.0, y + 64.0))
                        .count();
                }
                black_box(total);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let rects = gen_random_rects(4096, 2000.0, 2000.0, 12.0, 12.0);
    group.bench_function("move_quarter_then_damage", |b| {
        b.iter_batched(
            || {
                let mut tree = Quadtree::with_capacity(WORLD, 16, 6);
                let ids: Vec<_> = rects
                    .iter()
                    .copied()
                    .map(|r| (tree.insert(SpatialObject::new(r, ())), r))
                    .collect();
                (tree, ids)
            },
            |(mut tree, ids)| {
                let mut dirty = Vec::new();
                for (j, &(id, region)) in ids.iter().enumerate().step_by(4) {
                    for other in tree.remove(id) {
                        tree.reinsert(other);
                    }
                    let dx = (j % 40) as f64 - 20.0;
                    tree.set_region(
                        id,
                        Rect::new(region.x0 + dx, region.y0, region.x1 + dx, region.y1),
                    );
                    tree.reinsert(id);
                    dirty.push(id);
                }
                let damage = tree.collect_damage(dirty);
                black_box(damage.dirty_tiles.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_rebalance(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebalance");
    let rects = gen_clustered_rects(16, 256, 128.0);
    group.bench_function("clustered_4096", |b| {
        b.iter_batched(
            || {
                let mut tree = Quadtree::with_capacity(WORLD, 8, 6);
                for r in rects.iter().copied() {
                    let _ = tree.insert(SpatialObject::new(r, ()));
                }
                tree
            },
            |mut tree| {
                tree.rebalance();
                black_box(tree.all_objects().count());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_retrieve,
    bench_query_heavy,
    bench_churn,
    bench_rebalance,
);
criterion_main!(benches);
