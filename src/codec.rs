//! Little-endian scalar pack/unpack shared by every on-disk structure.
//!
//! Local file header, data descriptor, central directory header, and EOCD
//! each have a fixed-size prefix followed by trailing variable-length
//! regions (filename, extra field, comment); these helpers cover the
//! fixed-size field reads every one of them needs.

use crate::error::{Result, ZipError};
use std::io::Read;

pub fn read_u16_le<R: Read>(r: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub fn read_u32_le<R: Read>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Reads exactly `len` bytes from `r` into a freshly allocated buffer.
pub fn read_exact_vec<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub(crate) fn check_signature(expected: u32, found: u32, what: &str) -> Result<()> {
    if found != expected {
        return Err(ZipError::UnreadableArchive(format!(
            "invalid {} signature: expected 0x{:08x}, found 0x{:08x}",
            what, expected, found
        )));
    }
    Ok(())
}
