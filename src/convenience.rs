//! Filesystem enumeration helpers, not part of the core archive engine.
//! `zip_directory` walks a directory subtree and calls `Archive::add` for
//! each file; `unzip_archive` iterates an archive and extracts each entry.
//! Both preserve relative path structure and directory-entry markers
//! (trailing `/`).

use crate::archive::{AccessMode, Archive};
use crate::config::AddOptions;
use crate::entry::EntryKind;
use crate::error::Result;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Recursively adds every file and directory under `src` to a freshly
/// created archive at `dst`, with entry paths relative to `src`.
pub fn zip_directory<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<()> {
    let src = src.as_ref();
    let mut archive = Archive::open(dst, AccessMode::Create)?;
    let mut stack = vec![src.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let relative = relative_path(src, &path);

            if entry.file_type()?.is_dir() {
                let dir_path = format!("{}/", relative);
                archive.add(&dir_path, std::io::empty(), &AddOptions::store())?;
                stack.push(path);
            } else {
                let file = File::open(&path)?;
                archive.add(&relative, file, &AddOptions::default())?;
            }
        }
    }

    Ok(())
}

/// Extracts every entry in `src` into `dst`, recreating directory
/// structure and materializing directory-entry markers as empty
/// directories.
pub fn unzip_archive<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<()> {
    let dst = dst.as_ref();
    fs::create_dir_all(dst)?;
    let mut archive = Archive::open(src, AccessMode::Read)?;
    let entries = archive.entries()?;

    for entry in &entries {
        let target = dst.join(entry.path.trim_end_matches('/'));
        match entry.kind {
            EntryKind::Directory => {
                fs::create_dir_all(&target)?;
            }
            EntryKind::File | EntryKind::Symlink => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                let file = File::create(&target)?;
                archive.extract(entry, file)?;
            }
        }
    }

    Ok(())
}

fn relative_path(base: &Path, path: &Path) -> String {
    let rel: PathBuf = path.strip_prefix(base).unwrap_or(path).to_path_buf();
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
