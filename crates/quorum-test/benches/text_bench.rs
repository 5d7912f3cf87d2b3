//! Benchmarks for Quorum text helpers

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quorum_text::{bytes_to_hex, cyclic_next, split_trimmed, WeakInterner};

fn bench_split_trimmed(c: &mut Criterion) {
    let input = " n1:9000 , n2:9000,n3:9000 , n4:9000 ";

    c.bench_function("split_trimmed", |b| {
        b.iter(|| black_box(split_trimmed(black_box(Some(input)))))
    });
}

fn bench_bytes_to_hex(c: &mut Criterion) {
    let digest = [0xABu8; 32];

    c.bench_function("bytes_to_hex_32", |b| {
        b.iter(|| black_box(bytes_to_hex(black_box(Some(&digest[..])))))
    });
}

fn bench_cyclic_next(c: &mut Criterion) {
    let peers: Vec<String> = (0..16).map(|i| format!("peer-{}", i)).collect();
    let given = String::from("peer-9");

    c.bench_function("cyclic_next_16", |b| {
        b.iter(|| black_box(cyclic_next(black_box(&given), &peers)))
    });
}

fn bench_intern_hit(c: &mut Criterion) {
    let interner = WeakInterner::new();
    let _held = interner.intern_str("group-0001");

    c.bench_function("weak_intern_hit", |b| {
        b.iter(|| black_box(interner.intern_str(black_box("group-0001"))))
    });
}

criterion_group!(
    benches,
    bench_split_trimmed,
    bench_bytes_to_hex,
    bench_cyclic_next,
    bench_intern_hit
);
criterion_main!(benches);
