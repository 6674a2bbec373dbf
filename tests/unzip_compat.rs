use std::process::Command;
use tempfile::tempdir;
use zipkit::{AccessMode, AddOptions, Archive};

// Writes a ZIP using the library and then calls `unzip -t` to verify
// compatibility with a real-world unzip implementation. Skipped if `unzip`
// is not present on the system.

#[test]
fn unzip_compatibility() {
    let check = Command::new("unzip").arg("-v").output();
    if check.is_err() {
        eprintln!("skipping test: `unzip` not found");
        return;
    }

    let dir = tempdir().unwrap();
    let zip_path = dir.path().join("compat.zip");

    {
        let mut archive = Archive::open(&zip_path, AccessMode::Create).unwrap();
        archive
            .add("hello.txt", &b"hello from test"[..], &AddOptions::default())
            .unwrap();

        let big = vec![0u8; 1024 * 1024];
        archive
            .add("big.bin", &big[..], &AddOptions::default())
            .unwrap();
    }

    let output = Command::new("unzip")
        .arg("-t")
        .arg(&zip_path)
        .output()
        .expect("failed to run unzip");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "unzip reported failure: {} {}",
        stdout,
        stderr
    );
}
