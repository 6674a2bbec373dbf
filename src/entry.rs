//! `Entry`: the value snapshot produced by archive iteration, and the
//! File/Directory/Symlink kind derivation rules.

use crate::format::cp437;
use crate::format::header::{CentralDirectoryHeader, DataDescriptor, LocalFileHeader};
use chrono::NaiveDateTime;

/// Unix file-type mask (`S_IFMT`) applied to the high 16 bits of
/// `external_file_attributes` when `version_made_by`'s upper byte names a
/// Unix-like OS.
const S_IFMT: u32 = 0o170000;
const S_IFDIR: u32 = 0o040000;
const S_IFLNK: u32 = 0o120000;

/// DOS attribute "directory" bit (bit 4 of the low byte).
const DOS_ATTR_DIRECTORY: u32 = 0x10;

/// Classification of an entry, derived from OS-made-by + external file
/// attributes + the trailing-`/` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

/// `(CentralDirectoryHeader, LocalFileHeader, optional DataDescriptor)`
/// plus a derived kind, taken as a value snapshot at iteration time.
#[derive(Debug, Clone)]
pub struct Entry {
    pub central: CentralDirectoryHeader,
    pub local: LocalFileHeader,
    pub data_descriptor: Option<DataDescriptor>,
    pub kind: EntryKind,
    pub path: String,
}

impl Entry {
    pub(crate) fn new(
        central: CentralDirectoryHeader,
        local: LocalFileHeader,
        data_descriptor: Option<DataDescriptor>,
    ) -> Self {
        let path = decode_path(&central.file_name, central.is_utf8());
        let kind = classify(&central, &path);
        Self {
            central,
            local,
            data_descriptor,
            kind,
            path,
        }
    }

    pub fn compression_method(&self) -> u16 {
        self.central.compression_method
    }

    /// Authoritative CRC-32. The central directory's own field is always
    /// used here, even when bit 3 of the general-purpose flag means the
    /// local header's copy was a placeholder backfilled by a trailing
    /// data descriptor.
    pub fn crc32(&self) -> u32 {
        self.central.crc32
    }

    pub fn uncompressed_size(&self) -> u64 {
        self.central.uncompressed_size as u64
    }

    pub fn compressed_size(&self) -> u64 {
        self.central.compressed_size as u64
    }

    pub fn relative_offset_of_local_header(&self) -> u64 {
        self.central.relative_offset_of_local_header as u64
    }

    /// Full on-disk span of this entry: local header through end of
    /// payload, plus a trailing data descriptor when present.
    pub fn span(&self) -> (u64, u64) {
        let start = self.relative_offset_of_local_header();
        let mut end = start + self.local.total_size() + self.central.payload_size();
        if self.central.has_data_descriptor() {
            end += crate::format::header::DATA_DESCRIPTOR_FIXED_SIZE as u64;
        }
        (start, end)
    }

    /// Decodes the MS-DOS last-modified date/time into a `chrono`
    /// timestamp.
    pub fn modified(&self) -> NaiveDateTime {
        let (hour, minute, second) = crate::format::header::dos_time_parts(self.central.last_mod_time);
        let (year, month, day) = crate::format::header::dos_date_parts(self.central.last_mod_date);
        chrono::NaiveDate::from_ymd_opt(year, month.max(1), day.max(1))
            .unwrap_or_else(|| chrono::NaiveDate::from_ymd_opt(1980, 1, 1).unwrap())
            .and_hms_opt(hour, minute, second)
            .unwrap_or_else(|| {
                chrono::NaiveDate::from_ymd_opt(1980, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            })
    }

    /// POSIX permission bits, when the OS-made-by field is Unix-like.
    pub fn unix_mode(&self) -> Option<u32> {
        if is_unix_made_by(self.central.version_made_by) {
            Some((self.central.external_file_attributes >> 16) & 0o7777)
        } else {
            None
        }
    }
}

fn is_unix_made_by(version_made_by: u16) -> bool {
    matches!(version_made_by >> 8, 3 | 19)
}

fn decode_path(file_name: &[u8], is_utf8: bool) -> String {
    if is_utf8 {
        String::from_utf8_lossy(file_name).into_owned()
    } else {
        cp437::decode(file_name)
    }
}

fn classify(central: &CentralDirectoryHeader, path: &str) -> EntryKind {
    let os = central.version_made_by >> 8;
    let ends_with_slash = path.ends_with('/');

    if is_unix_made_by(central.version_made_by) {
        let mode = central.external_file_attributes >> 16;
        match mode & S_IFMT {
            S_IFDIR => EntryKind::Directory,
            S_IFLNK => EntryKind::Symlink,
            _ => {
                if ends_with_slash {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                }
            }
        }
    } else if os == 0 {
        // MSDOS: directory if trailing slash or DOS attribute bit 0x10 set.
        let dos_attrs = central.external_file_attributes & 0xff;
        if ends_with_slash || dos_attrs & DOS_ATTR_DIRECTORY != 0 {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    } else if ends_with_slash {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}
