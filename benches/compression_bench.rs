use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::tempdir;
use zipkit::{AccessMode, AddOptions, Archive};

fn generate_compressible_data(size: usize) -> Vec<u8> {
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

fn generate_random_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = 0x12345678u32;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

fn write_one(path: &std::path::Path, name: &str, data: &[u8], options: &AddOptions) {
    let mut archive = Archive::open(path, AccessMode::Create).unwrap();
    archive.add(name, data, options).unwrap();
}

fn bench_compression_methods(c: &mut Criterion) {
    let sizes = vec![
        1024,
        10 * 1024,
        100 * 1024,
        1024 * 1024,
        10 * 1024 * 1024,
    ];

    for size in sizes {
        let mut group = c.benchmark_group(format!("write_compressible_{}", format_size(size)));
        group.throughput(Throughput::Bytes(size as u64));

        let data = generate_compressible_data(size);
        let dir = tempdir().unwrap();

        group.bench_with_input(
            BenchmarkId::new("deflate_level_6", size),
            &data,
            |b, data| {
                b.iter(|| {
                    let path = dir.path().join("bench.zip");
                    let options = AddOptions::default().with_chunk_size(16 * 1024);
                    write_one(&path, "test.bin", black_box(data), &options);
                    std::fs::remove_file(&path).unwrap();
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("deflate_level_9", size),
            &data,
            |b, data| {
                b.iter(|| {
                    let path = dir.path().join("bench.zip");
                    let mut options = AddOptions::default();
                    options.compression_level = 9;
                    write_one(&path, "test.bin", black_box(data), &options);
                    std::fs::remove_file(&path).unwrap();
                });
            },
        );

        group.finish();
    }
}

fn bench_random_data_compression(c: &mut Criterion) {
    let sizes = vec![100 * 1024, 1024 * 1024];

    for size in sizes {
        let mut group = c.benchmark_group(format!("write_random_{}", format_size(size)));
        group.throughput(Throughput::Bytes(size as u64));

        let data = generate_random_data(size);
        let dir = tempdir().unwrap();

        group.bench_with_input(
            BenchmarkId::new("deflate_level_6", size),
            &data,
            |b, data| {
                b.iter(|| {
                    let path = dir.path().join("random.zip");
                    write_one(&path, "random.bin", black_box(data), &AddOptions::default());
                    std::fs::remove_file(&path).unwrap();
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("store", size), &data, |b, data| {
            b.iter(|| {
                let path = dir.path().join("random_store.zip");
                write_one(&path, "random.bin", black_box(data), &AddOptions::store());
                std::fs::remove_file(&path).unwrap();
            });
        });

        group.finish();
    }
}

fn bench_multiple_entries(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_multiple_entries");

    let entry_count = 100;
    let entry_size = 10 * 1024;
    group.throughput(Throughput::Bytes((entry_count * entry_size) as u64));

    let data = generate_compressible_data(entry_size);
    let dir = tempdir().unwrap();

    group.bench_function("deflate_100_entries", |b| {
        b.iter(|| {
            let path = dir.path().join("multi.zip");
            let mut archive = Archive::open(&path, AccessMode::Create).unwrap();
            for i in 0..entry_count {
                archive
                    .add(
                        &format!("file_{}.txt", i),
                        black_box(&data[..]),
                        &AddOptions::default(),
                    )
                    .unwrap();
            }
            drop(archive);
            std::fs::remove_file(&path).unwrap();
        });
    });

    group.bench_function("store_100_entries", |b| {
        b.iter(|| {
            let path = dir.path().join("multi_store.zip");
            let mut archive = Archive::open(&path, AccessMode::Create).unwrap();
            for i in 0..entry_count {
                archive
                    .add(
                        &format!("file_{}.txt", i),
                        black_box(&data[..]),
                        &AddOptions::store(),
                    )
                    .unwrap();
            }
            drop(archive);
            std::fs::remove_file(&path).unwrap();
        });
    });

    group.finish();
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{}MB", bytes / (1024 * 1024))
    }
}

criterion_group!(
    benches,
    bench_compression_methods,
    bench_random_data_compression,
    bench_multiple_entries
);
criterion_main!(benches);
