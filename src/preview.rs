//! Preview builder (C7): flat-to-tree reconstruction of folder/file
//! entries by path depth, for UI preview use.
//!
//! No example repo in the retrieval pack builds an equivalent tree; this
//! module is written directly from the algorithm below, in the plain
//! struct, no-framework style the rest of this crate uses.

use crate::archive::Archive;
use crate::entry::{Entry, EntryKind};
use crate::error::Result;
use std::collections::HashMap;

/// Builds the folder/file preview tree for an archive's current entries
/// (`preview(session) -> tree of folders/files`).
pub fn preview(archive: &mut Archive) -> Result<Vec<PreviewFolder>> {
    let entries = archive.entries()?;
    Ok(build_tree(scan(&entries)))
}

/// One item surfaced by the lazy entry-scanning iterator feeding the
/// preview builder: a successfully-classified folder
/// or file, or a non-fatal skip for an entry whose structures failed to
/// parse.
pub enum PreviewItem {
    Folder { path: String, size: u64 },
    File { path: String, size: u64 },
    Skip,
}

/// A reconstructed folder node: its own path/size plus child files and
/// child folders, built bottom-up from a flat entry list.
#[derive(Debug, Clone)]
pub struct PreviewFolder {
    pub path: String,
    pub size: u64,
    pub files: Vec<PreviewFile>,
    pub folders: Vec<PreviewFolder>,
}

#[derive(Debug, Clone)]
pub struct PreviewFile {
    pub path: String,
    pub size: u64,
}

/// Depth of a path: number of `/`-separated components minus one. A
/// top-level folder `"docs/"` has depth 0; `"docs/img/"` has depth 1.
fn depth_of(path: &str) -> usize {
    path.trim_end_matches('/').matches('/').count()
}

/// Produces a lazy sequence of `PreviewItem`s from an archive's entries,
/// one per entry, skipping nothing the entries iterator itself didn't
/// already classify. `Skip` is only for entries whose structures failed
/// to parse, which `Archive::entries` already surfaces as an error
/// rather than a partial item here.
pub fn scan(entries: &[Entry]) -> Vec<PreviewItem> {
    entries
        .iter()
        .map(|e| match e.kind {
            EntryKind::Directory => PreviewItem::Folder {
                path: e.path.clone(),
                size: e.uncompressed_size(),
            },
            EntryKind::File | EntryKind::Symlink => PreviewItem::File {
                path: e.path.clone(),
                size: e.uncompressed_size(),
            },
        })
        .collect()
}

/// Builds the nested folder/file tree from a flat item sequence. Depth-0
/// files with no enclosing folder are dropped, matching the source
/// algorithm exactly rather than guessing at a fix.
pub fn build_tree(items: Vec<PreviewItem>) -> Vec<PreviewFolder> {
    let mut folders_by_depth: HashMap<usize, Vec<PreviewFolder>> = HashMap::new();
    let mut files_by_depth: HashMap<usize, Vec<PreviewFile>> = HashMap::new();

    for item in items {
        match item {
            PreviewItem::Folder { path, size } => {
                let depth = depth_of(&path);
                folders_by_depth.entry(depth).or_default().push(PreviewFolder {
                    path,
                    size,
                    files: Vec::new(),
                    folders: Vec::new(),
                });
            }
            PreviewItem::File { path, size } => {
                let depth = depth_of(&path);
                files_by_depth.entry(depth).or_default().push(PreviewFile { path, size });
            }
            PreviewItem::Skip => {}
        }
    }

    // Step 2: attach each file to the first same-depth folder whose path
    // prefixes it (first-match tie-breaking).
    for (depth, files) in files_by_depth {
        let Some(folders) = folders_by_depth.get_mut(&depth) else {
            continue; // depth-0 orphan files (or any depth with no folder) are dropped.
        };
        for file in files {
            if let Some(folder) = folders.iter_mut().find(|f| file.path.starts_with(f.path.as_str())) {
                folder.files.push(file);
            }
        }
    }

    // Step 3: attach each depth-(d+1) folder to the unique depth-d folder
    // whose path prefixes it. Processed deepest-level-first so that, by
    // the time a depth-d folder is itself attached to depth-(d-1), it
    // already carries its full subtree — equivalent to the
    // "sort levels ascending, attach each adjacent pair" but order-safe
    // for archives nested more than two levels deep.
    let mut depths: Vec<usize> = folders_by_depth.keys().copied().collect();
    depths.sort_unstable_by(|a, b| b.cmp(a));

    for &d1 in &depths {
        if d1 == 0 {
            continue;
        }
        let d = d1 - 1;
        if !folders_by_depth.contains_key(&d) {
            continue;
        }
        let children = folders_by_depth.remove(&d1).unwrap_or_default();
        let parents = folders_by_depth.get_mut(&d).unwrap();
        for child in children {
            if let Some(parent) = parents.iter_mut().find(|p| child.path.starts_with(p.path.as_str())) {
                parent.folders.push(child);
            }
        }
    }

    folders_by_depth.remove(&0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(path: &str, size: u64) -> PreviewItem {
        PreviewItem::Folder {
            path: path.to_string(),
            size,
        }
    }

    fn file(path: &str, size: u64) -> PreviewItem {
        PreviewItem::File {
            path: path.to_string(),
            size,
        }
    }

    #[test]
    fn depth_of_top_level_folder_is_zero() {
        assert_eq!(depth_of("docs/"), 0);
        assert_eq!(depth_of("docs/img/"), 1);
        assert_eq!(depth_of("docs/img/a.png"), 1);
    }

    #[test]
    fn builds_two_level_tree() {
        let items = vec![
            folder("docs/", 0),
            file("docs/readme.md", 42),
            folder("docs/img/", 0),
            file("docs/img/a.png", 1024),
        ];

        let tree = build_tree(items);
        assert_eq!(tree.len(), 1);
        let docs = &tree[0];
        assert_eq!(docs.path, "docs/");
        assert_eq!(docs.files.len(), 1);
        assert_eq!(docs.files[0].path, "docs/readme.md");
        assert_eq!(docs.folders.len(), 1);
        assert_eq!(docs.folders[0].path, "docs/img/");
        assert_eq!(docs.folders[0].files[0].path, "docs/img/a.png");
    }

    #[test]
    fn builds_tree_nested_three_levels_deep() {
        let items = vec![
            folder("a/", 0),
            folder("a/b/", 0),
            folder("a/b/c/", 0),
            file("a/b/c/d.txt", 7),
        ];

        let tree = build_tree(items);
        assert_eq!(tree.len(), 1);
        let a = &tree[0];
        assert_eq!(a.folders.len(), 1);
        let b = &a.folders[0];
        assert_eq!(b.path, "a/b/");
        assert_eq!(b.folders.len(), 1);
        let c = &b.folders[0];
        assert_eq!(c.path, "a/b/c/");
        assert_eq!(c.files[0].path, "a/b/c/d.txt");
    }

    #[test]
    fn depth_zero_orphan_files_are_dropped() {
        let items = vec![file("loose.txt", 3)];
        let tree = build_tree(items);
        assert!(tree.is_empty());
    }
}
