use std::fs;
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

fn test_compression(name: &str, data: &[u8], method_name: &str, level: u32, dir: &std::path::Path) {
    let path = dir.join(format!("{}-{}.zip", name.replace(' ', "_"), method_name.replace(' ', "_")));
    let mut archive = Archive::open(&path, AccessMode::Create).unwrap();
    let mut options = AddOptions::default();
    options.compression_level = level;
    archive.add("test.bin", data, &options).unwrap();
    drop(archive);

    let compressed_size = fs::metadata(&path).unwrap().len();
    let original_size = data.len() as u64;
    let ratio = (compressed_size as f64 / original_size as f64) * 100.0;

    println!(
        "{:<20} | {:<15} | {:>12} | {:>12} | {:>8.2}%",
        name,
        method_name,
        format_bytes(original_size),
        format_bytes(compressed_size),
        ratio
    );
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn main() {
    println!("\n╔════════════════════════════════════════════════════════════════════════════╗");
    println!("║                    zipkit File Size Analysis                                ║");
    println!("╚════════════════════════════════════════════════════════════════════════════╝\n");

    println!(
        "{:<20} | {:<15} | {:>12} | {:>12} | {:>8}",
        "Data Type", "Method", "Original", "Compressed", "Ratio"
    );
    println!(
        "{:-<20}-+-{:-<15}-+-{:->12}-+-{:->12}-+-{:->8}",
        "", "", "", "", ""
    );

    let dir = tempdir().unwrap();

    let compressible_1mb = generate_compressible_data(1024 * 1024);
    test_compression("Compressible 1MB", &compressible_1mb, "DEFLATE lvl 1", 1, dir.path());
    test_compression("Compressible 1MB", &compressible_1mb, "DEFLATE lvl 6", 6, dir.path());
    test_compression("Compressible 1MB", &compressible_1mb, "DEFLATE lvl 9", 9, dir.path());

    println!();

    let random_1mb = generate_random_data(1024 * 1024);
    test_compression("Random 1MB", &random_1mb, "DEFLATE lvl 6", 6, dir.path());
    test_compression("Random 1MB", &random_1mb, "DEFLATE lvl 9", 9, dir.path());

    println!();

    let compressible_10mb = generate_compressible_data(10 * 1024 * 1024);
    test_compression("Compressible 10MB", &compressible_10mb, "DEFLATE lvl 6", 6, dir.path());
    test_compression("Compressible 10MB", &compressible_10mb, "DEFLATE lvl 9", 9, dir.path());

    println!("\n");
}
