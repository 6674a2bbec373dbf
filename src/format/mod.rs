//! On-disk ZIP structures (PKZIP APPNOTE v2.0, no ZIP64) and the legacy
//! filename encoding used when the UTF-8 general-purpose flag is unset.

pub mod cp437;
pub mod header;

pub use header::{CentralDirectoryHeader, DataDescriptor, EndOfCentralDirectory, LocalFileHeader};
