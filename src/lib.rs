//! # zipkit: a streaming ZIP archive engine
//!
//! `zipkit` reads, writes, and incrementally mutates ZIP archives (PKZIP
//! APPNOTE-compatible Store/Deflate, no ZIP64, no multi-disk, no
//! encryption) through a single synchronous, single-threaded `Archive`
//! session. Entries stream through fixed-size chunks rather than loading
//! a whole payload into memory.
//!
//! ## Quick start
//!
//! ### Reading an archive
//!
//! ```no_run
//! use zipkit::{AccessMode, Archive};
//!
//! let mut archive = Archive::open("archive.zip", AccessMode::Read)?;
//! for entry in archive.entries()? {
//!     println!("{}: {} bytes", entry.path, entry.uncompressed_size());
//! }
//! # Ok::<(), zipkit::ZipError>(())
//! ```
//!
//! ### Writing an archive
//!
//! ```no_run
//! use zipkit::{AccessMode, AddOptions, Archive};
//!
//! let mut archive = Archive::open("output.zip", AccessMode::Create)?;
//! archive.add("file1.txt", &b"Hello, World!"[..], &AddOptions::default())?;
//! archive.add("file2.txt", &b"Another file"[..], &AddOptions::store())?;
//! # Ok::<(), zipkit::ZipError>(())
//! ```
//!
//! ### Removing an entry
//!
//! ```no_run
//! use zipkit::{AccessMode, Archive};
//!
//! let mut archive = Archive::open("output.zip", AccessMode::Update)?;
//! if let Some(entry) = archive.lookup("file1.txt")? {
//!     archive.remove(&entry)?;
//! }
//! # Ok::<(), zipkit::ZipError>(())
//! ```

pub mod archive;
pub mod codec;
pub mod config;
pub mod convenience;
pub mod crc;
pub mod deflate;
pub mod entry;
pub mod error;
pub mod format;
pub mod mutate;
pub mod preview;

pub use archive::{AccessMode, Archive};
pub use config::{AddOptions, Compression};
pub use convenience::{unzip_archive, zip_directory};
pub use entry::{Entry, EntryKind};
pub use error::{Result, ZipError};
pub use preview::{preview, PreviewFile, PreviewFolder, PreviewItem};
