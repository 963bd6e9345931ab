use cidrtree::{Family, Network, RecordSize, Serializer, Tree};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

struct OffsetSerializer {
    next: u32,
}

impl Serializer<u32> for OffsetSerializer {
    fn store_data(&mut self, value: &u32) -> u32 {
        let offset = self.next;
        self.next += value % 64 + 1;
        offset
    }
}

// Building trees with varying levels of data duplication, mirroring the
// teacher's high-dedup/no-dedup split for data-section builds.
fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for entry_count in [100usize, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*entry_count as u64));

        group.bench_with_input(
            BenchmarkId::new("high_dedup", entry_count),
            entry_count,
            |b, &count| {
                b.iter(|| {
                    let mut tree: Tree<u32> = Tree::new(Family::V4, RecordSize::Bits32, 1 << 16);
                    for i in 0..count {
                        let ip = format!("10.{}.{}.0", (i / 256) % 256, i % 256);
                        let net = Network::parse(&ip, 24, Family::V4).unwrap();
                        let category = (i % 10) as u32;
                        tree.insert_network(net, &category.to_le_bytes(), category)
                            .unwrap();
                    }
                    black_box(tree.finalize());
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("no_dedup", entry_count),
            entry_count,
            |b, &count| {
                b.iter(|| {
                    let mut tree: Tree<u32> = Tree::new(Family::V4, RecordSize::Bits32, 1 << 16);
                    for i in 0..count {
                        let ip = format!("10.{}.{}.0", (i / 256) % 256, i % 256);
                        let net = Network::parse(&ip, 24, Family::V4).unwrap();
                        let value = i as u32;
                        tree.insert_network(net, &value.to_le_bytes(), value)
                            .unwrap();
                    }
                    black_box(tree.finalize());
                });
            },
        );
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut tree: Tree<u32> = Tree::new(Family::V4, RecordSize::Bits32, 1 << 16);
    for i in 0..10_000u32 {
        let ip = format!("10.{}.{}.0", (i / 256) % 256, i % 256);
        let net = Network::parse(&ip, 24, Family::V4).unwrap();
        tree.insert_network(net, &i.to_le_bytes(), i).unwrap();
    }

    c.bench_function("lookup_ip_hit", |b| {
        b.iter(|| {
            let addr = "10.12.34.56".parse().unwrap();
            black_box(tree.lookup_ip(black_box(addr)).unwrap());
        });
    });
}

// Random, overlapping-prefix inserts with a fixed seed for reproducibility
// (matching the teacher's `StdRng::seed_from_u64` fixed-seed convention for
// comparable benchmark runs across builds).
fn bench_random_insert(c: &mut Criterion) {
    c.bench_function("random_prefix_insert_5000", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(0xC1D2_7733);
            let mut tree: Tree<u32> = Tree::new(Family::V4, RecordSize::Bits32, 1 << 16);
            for i in 0..5_000u32 {
                let addr: u32 = rng.random();
                let mask: u8 = rng.gen_range(8..=32);
                let masked = addr & (u32::MAX << (32 - mask));
                let ip = std::net::Ipv4Addr::from(masked);
                let net = Network::parse(&ip.to_string(), mask, Family::V4).unwrap();
                tree.insert_network(net, &i.to_le_bytes(), i).unwrap();
            }
            black_box(tree.finalize());
        });
    });
}

fn bench_write_tree(c: &mut Criterion) {
    let mut tree: Tree<u32> = Tree::new(Family::V4, RecordSize::Bits32, 1 << 16);
    for i in 0..10_000u32 {
        let ip = format!("10.{}.{}.0", (i / 256) % 256, i % 256);
        let net = Network::parse(&ip, 24, Family::V4).unwrap();
        tree.insert_network(net, &i.to_le_bytes(), i).unwrap();
    }

    c.bench_function("write_tree_10k", |b| {
        b.iter(|| {
            let mut sink = Vec::new();
            let mut serializer = OffsetSerializer { next: 0 };
            tree.write_tree(&mut sink, &mut serializer).unwrap();
            black_box(sink);
        });
    });
}

criterion_group!(
    benches,
    bench_tree_build,
    bench_lookup,
    bench_random_insert,
    bench_write_tree
);
criterion_main!(benches);
