//! Local File Header, Central Directory Header, Data Descriptor, and
//! End-of-Central-Directory structures — PKZIP APPNOTE v2.0, no ZIP64.
//!
//! Field order and sizes follow the inline byte layout
//! in `writer.rs::finish` (central directory + EOCD) and
//! `reader.rs::read_central_directory` (EOCD parse), plus the external
//! attribute placement convention in `mtzip`'s `ZipFile` (mode bits in the
//! high 16 bits of `external_file_attributes`).

use crate::codec::{check_signature, read_exact_vec, read_u16_le, read_u32_le};
use crate::error::Result;
use std::io::{Read, Seek, SeekFrom};

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4b50;
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;
pub const EOCD_SIGNATURE: u32 = 0x0605_4b50;

pub const LOCAL_FILE_HEADER_FIXED_SIZE: usize = 30;
pub const DATA_DESCRIPTOR_FIXED_SIZE: usize = 16;
pub const CENTRAL_DIRECTORY_HEADER_FIXED_SIZE: usize = 46;
pub const EOCD_FIXED_SIZE: usize = 22;

/// General purpose bit flag: filename/comment are UTF-8 (bit 11).
pub const GP_FLAG_UTF8: u16 = 1 << 11;
/// General purpose bit flag: sizes/CRC are authoritative in a trailing
/// Data Descriptor rather than this header (bit 3).
pub const GP_FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

pub const COMPRESSION_STORE: u16 = 0;
pub const COMPRESSION_DEFLATE: u16 = 8;

pub const VERSION_NEEDED_TO_EXTRACT: u16 = 20;

#[cfg(unix)]
pub const OS_MADE_BY: u8 = 3;
#[cfg(not(unix))]
pub const OS_MADE_BY: u8 = 0;

/// `(upper byte = OS made by, lower byte = ZIP spec version * 10)`.
pub fn version_made_by() -> u16 {
    ((OS_MADE_BY as u16) << 8) | (VERSION_NEEDED_TO_EXTRACT)
}

#[derive(Debug, Clone)]
pub struct LocalFileHeader {
    pub version_needed: u16,
    pub gp_flag: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: Vec<u8>,
    pub extra_field: Vec<u8>,
}

impl LocalFileHeader {
    pub fn read_at<S: Read + Seek>(stream: &mut S, offset: u64) -> Result<Self> {
        stream.seek(SeekFrom::Start(offset))?;
        let sig = read_u32_le(stream)?;
        check_signature(LOCAL_FILE_HEADER_SIGNATURE, sig, "local file header")?;

        let version_needed = read_u16_le(stream)?;
        let gp_flag = read_u16_le(stream)?;
        let compression_method = read_u16_le(stream)?;
        let last_mod_time = read_u16_le(stream)?;
        let last_mod_date = read_u16_le(stream)?;
        let crc32 = read_u32_le(stream)?;
        let compressed_size = read_u32_le(stream)?;
        let uncompressed_size = read_u32_le(stream)?;
        let file_name_len = read_u16_le(stream)? as usize;
        let extra_len = read_u16_le(stream)? as usize;
        let file_name = read_exact_vec(stream, file_name_len)?;
        let extra_field = read_exact_vec(stream, extra_len)?;

        Ok(Self {
            version_needed,
            gp_flag,
            compression_method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name,
            extra_field,
        })
    }

    /// Total on-disk size of this header including trailing fields.
    pub fn total_size(&self) -> u64 {
        LOCAL_FILE_HEADER_FIXED_SIZE as u64
            + self.file_name.len() as u64
            + self.extra_field.len() as u64
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&LOCAL_FILE_HEADER_SIGNATURE.to_le_bytes());
        buf.extend_from_slice(&self.version_needed.to_le_bytes());
        buf.extend_from_slice(&self.gp_flag.to_le_bytes());
        buf.extend_from_slice(&self.compression_method.to_le_bytes());
        buf.extend_from_slice(&self.last_mod_time.to_le_bytes());
        buf.extend_from_slice(&self.last_mod_date.to_le_bytes());
        buf.extend_from_slice(&self.crc32.to_le_bytes());
        buf.extend_from_slice(&self.compressed_size.to_le_bytes());
        buf.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        buf.extend_from_slice(&(self.file_name.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(self.extra_field.len() as u16).to_le_bytes());
        buf.extend_from_slice(&self.file_name);
        buf.extend_from_slice(&self.extra_field);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

impl DataDescriptor {
    pub fn read_at<S: Read + Seek>(stream: &mut S, offset: u64) -> Result<Self> {
        stream.seek(SeekFrom::Start(offset))?;
        let sig = read_u32_le(stream)?;
        check_signature(DATA_DESCRIPTOR_SIGNATURE, sig, "data descriptor")?;
        let crc32 = read_u32_le(stream)?;
        let compressed_size = read_u32_le(stream)?;
        let uncompressed_size = read_u32_le(stream)?;
        Ok(Self {
            crc32,
            compressed_size,
            uncompressed_size,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&DATA_DESCRIPTOR_SIGNATURE.to_le_bytes());
        buf.extend_from_slice(&self.crc32.to_le_bytes());
        buf.extend_from_slice(&self.compressed_size.to_le_bytes());
        buf.extend_from_slice(&self.uncompressed_size.to_le_bytes());
    }
}

#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub gp_flag: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number_start: u16,
    pub internal_file_attributes: u16,
    pub external_file_attributes: u32,
    pub relative_offset_of_local_header: u32,
    pub file_name: Vec<u8>,
    pub extra_field: Vec<u8>,
    pub file_comment: Vec<u8>,
}

impl CentralDirectoryHeader {
    pub fn read_at<S: Read + Seek>(stream: &mut S, offset: u64) -> Result<Self> {
        stream.seek(SeekFrom::Start(offset))?;
        let sig = read_u32_le(stream)?;
        check_signature(CENTRAL_DIRECTORY_SIGNATURE, sig, "central directory header")?;

        let version_made_by = read_u16_le(stream)?;
        let version_needed = read_u16_le(stream)?;
        let gp_flag = read_u16_le(stream)?;
        let compression_method = read_u16_le(stream)?;
        let last_mod_time = read_u16_le(stream)?;
        let last_mod_date = read_u16_le(stream)?;
        let crc32 = read_u32_le(stream)?;
        let compressed_size = read_u32_le(stream)?;
        let uncompressed_size = read_u32_le(stream)?;
        let file_name_len = read_u16_le(stream)? as usize;
        let extra_len = read_u16_le(stream)? as usize;
        let comment_len = read_u16_le(stream)? as usize;
        let disk_number_start = read_u16_le(stream)?;
        let internal_file_attributes = read_u16_le(stream)?;
        let external_file_attributes = read_u32_le(stream)?;
        let relative_offset_of_local_header = read_u32_le(stream)?;
        let file_name = read_exact_vec(stream, file_name_len)?;
        let extra_field = read_exact_vec(stream, extra_len)?;
        let file_comment = read_exact_vec(stream, comment_len)?;

        Ok(Self {
            version_made_by,
            version_needed,
            gp_flag,
            compression_method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            disk_number_start,
            internal_file_attributes,
            external_file_attributes,
            relative_offset_of_local_header,
            file_name,
            extra_field,
            file_comment,
        })
    }

    /// Total on-disk size of this header including trailing fields, used
    /// to advance the central-directory cursor during iteration.
    pub fn total_size(&self) -> u64 {
        CENTRAL_DIRECTORY_HEADER_FIXED_SIZE as u64
            + self.file_name.len() as u64
            + self.extra_field.len() as u64
            + self.file_comment.len() as u64
    }

    /// Payload size used to locate a trailing data descriptor: compressed
    /// size for Deflate, uncompressed size for Store.
    pub fn payload_size(&self) -> u64 {
        if self.compression_method == COMPRESSION_DEFLATE {
            self.compressed_size as u64
        } else {
            self.uncompressed_size as u64
        }
    }

    pub fn has_data_descriptor(&self) -> bool {
        self.gp_flag & GP_FLAG_DATA_DESCRIPTOR != 0
    }

    pub fn is_utf8(&self) -> bool {
        self.gp_flag & GP_FLAG_UTF8 != 0
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&CENTRAL_DIRECTORY_SIGNATURE.to_le_bytes());
        buf.extend_from_slice(&self.version_made_by.to_le_bytes());
        buf.extend_from_slice(&self.version_needed.to_le_bytes());
        buf.extend_from_slice(&self.gp_flag.to_le_bytes());
        buf.extend_from_slice(&self.compression_method.to_le_bytes());
        buf.extend_from_slice(&self.last_mod_time.to_le_bytes());
        buf.extend_from_slice(&self.last_mod_date.to_le_bytes());
        buf.extend_from_slice(&self.crc32.to_le_bytes());
        buf.extend_from_slice(&self.compressed_size.to_le_bytes());
        buf.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        buf.extend_from_slice(&(self.file_name.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(self.extra_field.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(self.file_comment.len() as u16).to_le_bytes());
        buf.extend_from_slice(&self.disk_number_start.to_le_bytes());
        buf.extend_from_slice(&self.internal_file_attributes.to_le_bytes());
        buf.extend_from_slice(&self.external_file_attributes.to_le_bytes());
        buf.extend_from_slice(&self.relative_offset_of_local_header.to_le_bytes());
        buf.extend_from_slice(&self.file_name);
        buf.extend_from_slice(&self.extra_field);
        buf.extend_from_slice(&self.file_comment);
    }
}

#[derive(Debug, Clone)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_central_directory: u16,
    pub entries_on_this_disk: u16,
    pub total_entries: u16,
    pub central_directory_size: u32,
    pub central_directory_offset: u32,
    pub comment: Vec<u8>,
}

impl EndOfCentralDirectory {
    /// A freshly created empty archive's sole content: a 22-byte EOCD with
    /// every count zeroed.
    pub fn empty() -> Self {
        Self {
            disk_number: 0,
            disk_with_central_directory: 0,
            entries_on_this_disk: 0,
            total_entries: 0,
            central_directory_size: 0,
            central_directory_offset: 0,
            comment: Vec::new(),
        }
    }

    pub fn read_at<S: Read + Seek>(stream: &mut S, offset: u64) -> Result<Self> {
        stream.seek(SeekFrom::Start(offset))?;
        let sig = read_u32_le(stream)?;
        check_signature(EOCD_SIGNATURE, sig, "end of central directory")?;

        let disk_number = read_u16_le(stream)?;
        let disk_with_central_directory = read_u16_le(stream)?;
        let entries_on_this_disk = read_u16_le(stream)?;
        let total_entries = read_u16_le(stream)?;
        let central_directory_size = read_u32_le(stream)?;
        let central_directory_offset = read_u32_le(stream)?;
        let comment_len = read_u16_le(stream)? as usize;
        let comment = read_exact_vec(stream, comment_len)?;

        Ok(Self {
            disk_number,
            disk_with_central_directory,
            entries_on_this_disk,
            total_entries,
            central_directory_size,
            central_directory_offset,
            comment,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&EOCD_SIGNATURE.to_le_bytes());
        buf.extend_from_slice(&self.disk_number.to_le_bytes());
        buf.extend_from_slice(&self.disk_with_central_directory.to_le_bytes());
        buf.extend_from_slice(&self.entries_on_this_disk.to_le_bytes());
        buf.extend_from_slice(&self.total_entries.to_le_bytes());
        buf.extend_from_slice(&self.central_directory_size.to_le_bytes());
        buf.extend_from_slice(&self.central_directory_offset.to_le_bytes());
        buf.extend_from_slice(&(self.comment.len() as u16).to_le_bytes());
        buf.extend_from_slice(&self.comment);
    }
}

/// Splits a 16-bit DOS time into (hour, minute, second) — second is stored
/// in 2-second increments per the format.
pub fn dos_time_parts(t: u16) -> (u32, u32, u32) {
    (
        ((t >> 11) & 0x1f) as u32,
        ((t >> 5) & 0x3f) as u32,
        ((t & 0x1f) as u32) * 2,
    )
}

/// Splits a 16-bit DOS date into (year, month, day) — year is offset from 1980.
pub fn dos_date_parts(d: u16) -> (i32, u32, u32) {
    (
        1980 + ((d >> 9) & 0x7f) as i32,
        ((d >> 5) & 0x0f) as u32,
        (d & 0x1f) as u32,
    )
}

pub fn to_dos_time(hour: u32, minute: u32, second: u32) -> u16 {
    (((hour & 0x1f) << 11) | ((minute & 0x3f) << 5) | ((second / 2) & 0x1f)) as u16
}

pub fn to_dos_date(year: i32, month: u32, day: u32) -> u16 {
    let y = ((year - 1980).max(0) as u32) & 0x7f;
    (((y << 9) | ((month & 0x0f) << 5) | (day & 0x1f)) as u16) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dos_time_round_trips() {
        let packed = to_dos_time(13, 45, 36);
        assert_eq!(dos_time_parts(packed), (13, 45, 36));
    }

    #[test]
    fn dos_date_round_trips() {
        let packed = to_dos_date(2024, 6, 15);
        assert_eq!(dos_date_parts(packed), (2024, 6, 15));
    }

    #[test]
    fn dos_epoch_is_1980() {
        assert_eq!(dos_date_parts(to_dos_date(1980, 1, 1)), (1980, 1, 1));
    }

    #[test]
    fn empty_eocd_is_22_bytes() {
        let mut buf = Vec::new();
        EndOfCentralDirectory::empty().write_to(&mut buf);
        assert_eq!(buf.len(), EOCD_FIXED_SIZE);
        assert_eq!(&buf[0..4], &[0x50, 0x4b, 0x05, 0x06]);
    }
}
