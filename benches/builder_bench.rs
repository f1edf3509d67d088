// Table building benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sstable_writer::env::{FileSink, WritableFile};
use sstable_writer::filter::BloomFilterPolicy;
use sstable_writer::sstable::{CompressionType, TableBuilder};
use sstable_writer::Options;
use std::hint::black_box;
use std::sync::Arc;
use tempfile::TempDir;

fn sorted_entries(size: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    (0..size)
        .map(|i| (format!("key{:08}", i).into_bytes(), format!("value{:08}", i).into_bytes()))
        .collect()
}

fn build_in_memory(options: Options, entries: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let mut sink: Vec<u8> = Vec::with_capacity(entries.len() * 32);
    let mut builder = TableBuilder::new(options, &mut sink).unwrap();
    for (key, value) in entries {
        builder.add(key, value).unwrap();
    }
    builder.finish().unwrap();
    drop(builder);
    sink
}

fn benchmark_in_memory_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_memory_build");

    for size in [100, 1000, 10000].iter() {
        let entries = sorted_entries(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| {
                let table = build_in_memory(Options::default(), entries);
                black_box(table);
            });
        });
    }

    group.finish();
}

fn benchmark_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");
    let entries = sorted_entries(10000);
    group.throughput(Throughput::Elements(entries.len() as u64));

    for (name, compression) in [("none", CompressionType::None), ("snappy", CompressionType::Snappy)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &compression, |b, &compression| {
            b.iter(|| {
                let options = Options::default().compression(compression);
                black_box(build_in_memory(options, &entries));
            });
        });
    }

    group.finish();
}

fn benchmark_bloom_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom_filter");
    let entries = sorted_entries(10000);
    group.throughput(Throughput::Elements(entries.len() as u64));

    for bits_per_key in [5, 10, 20].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(bits_per_key),
            bits_per_key,
            |b, &bits_per_key| {
                b.iter(|| {
                    let policy = Arc::new(BloomFilterPolicy::new(bits_per_key));
                    let options = Options::default().filter_policy(policy);
                    black_box(build_in_memory(options, &entries));
                });
            },
        );
    }

    group.finish();
}

fn benchmark_file_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_build");

    for value_size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Bytes((*value_size * 1000) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(value_size),
            value_size,
            |b, &value_size| {
                let temp_dir = TempDir::new().unwrap();
                let path = temp_dir.path().join("bench.ldb");
                let value = vec![b'x'; value_size];

                b.iter(|| {
                    let mut file = FileSink::create(&path).unwrap();
                    let mut builder = TableBuilder::new(Options::default(), &mut file).unwrap();
                    for i in 0..1000 {
                        let key = format!("key{:08}", i);
                        builder.add(key.as_bytes(), &value).unwrap();
                    }
                    builder.finish().unwrap();
                    black_box(builder.file_size());
                    drop(builder);
                    file.sync().unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_in_memory_build,
    benchmark_compression,
    benchmark_bloom_filter,
    benchmark_file_build
);
criterion_main!(benches);
