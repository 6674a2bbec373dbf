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

fn create_test_zip(path: &std::path::Path, data: &[u8], level: u32) {
    let mut archive = Archive::open(path, AccessMode::Create).unwrap();
    let mut options = AddOptions::default();
    options.compression_level = level;
    archive.add("test.bin", data, &options).unwrap();
}

fn read_all_entries(path: &std::path::Path) {
    let mut archive = Archive::open(path, AccessMode::Read).unwrap();
    let entries = archive.entries().unwrap();
    let mut buf = Vec::new();
    for entry in &entries {
        buf.clear();
        archive.extract(entry, &mut buf).unwrap();
        black_box(&buf);
    }
}

fn bench_read_compressible_data(c: &mut Criterion) {
    let sizes = vec![100 * 1024, 1024 * 1024, 10 * 1024 * 1024];

    for size in sizes {
        let mut group = c.benchmark_group(format!("read_compressible_{}", format_size(size)));
        group.throughput(Throughput::Bytes(size as u64));

        let data = generate_compressible_data(size);
        let dir = tempdir().unwrap();
        let path = dir.path().join("deflate.zip");
        create_test_zip(&path, &data, 6);

        group.bench_function(BenchmarkId::new("deflate_level_6", size), |b| {
            b.iter(|| read_all_entries(&path));
        });

        group.finish();
    }
}

fn bench_read_random_data(c: &mut Criterion) {
    let sizes = vec![100 * 1024, 1024 * 1024];

    for size in sizes {
        let mut group = c.benchmark_group(format!("read_random_{}", format_size(size)));
        group.throughput(Throughput::Bytes(size as u64));

        let data = generate_random_data(size);
        let dir = tempdir().unwrap();
        let path = dir.path().join("deflate.zip");
        create_test_zip(&path, &data, 6);

        group.bench_function(BenchmarkId::new("deflate_level_6", size), |b| {
            b.iter(|| read_all_entries(&path));
        });

        group.finish();
    }
}

fn bench_read_multiple_entries(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_multiple_entries");

    let entry_count = 100;
    let entry_size = 10 * 1024;
    group.throughput(Throughput::Bytes((entry_count * entry_size) as u64));

    let data = generate_compressible_data(entry_size);
    let dir = tempdir().unwrap();
    let path = dir.path().join("multi.zip");

    let mut archive = Archive::open(&path, AccessMode::Create).unwrap();
    for i in 0..entry_count {
        archive
            .add(&format!("file_{}.txt", i), &data[..], &AddOptions::default())
            .unwrap();
    }
    drop(archive);

    group.bench_function("deflate_100_entries", |b| {
        b.iter(|| read_all_entries(&path));
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
    bench_read_compressible_data,
    bench_read_random_data,
    bench_read_multiple_entries
);
criterion_main!(benches);
