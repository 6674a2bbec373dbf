//! Mutation engine (C6): add-entry and remove-entry transactions.
//!
//! Follows `StreamingZipWriter::finish`'s central-directory rewrite loop
//! and `bakezip`'s omit-by-index rebuild shape
//! (`other_examples/7fd8a2e3_SegaraRai-bakezip...rebuild.rs`) for the
//! "rewrite every surviving central directory header" pattern.

use crate::archive::Archive;
use crate::config::AddOptions;
use crate::entry::Entry;
use crate::error::{Result, ZipError};
use crate::format::cp437;
use crate::format::header::{
    CentralDirectoryHeader, DataDescriptor, EndOfCentralDirectory, LocalFileHeader,
    COMPRESSION_DEFLATE, COMPRESSION_STORE, GP_FLAG_DATA_DESCRIPTOR, GP_FLAG_UTF8,
    VERSION_NEEDED_TO_EXTRACT,
};
use std::io::{Read, Seek, SeekFrom, Write};

const MAX_U32: u64 = u32::MAX as u64;

fn check_cd_offset(offset: u64) -> Result<u32> {
    if offset > MAX_U32 {
        return Err(ZipError::InvalidStartOfCentralDirectoryOffset);
    }
    Ok(offset as u32)
}

/// Validates an entry path is representable and picks the general-purpose
/// UTF-8 flag bit accordingly (step 1): CP437 when every
/// character round-trips through it, UTF-8 otherwise.
fn encode_path(path: &str) -> Result<(Vec<u8>, bool)> {
    if path.is_empty() {
        return Err(ZipError::InvalidEntryPath("empty path".to_string()));
    }
    if let Some(bytes) = cp437::encode(path) {
        Ok((bytes, false))
    } else {
        Ok((path.as_bytes().to_vec(), true))
    }
}

/// Adds a new entry to the archive by streaming `source`'s bytes through
/// Store or Deflate, then rewriting the central directory and EOCD.
pub fn add_entry<R: Read>(
    archive: &mut Archive,
    path: &str,
    mut source: R,
    options: &AddOptions,
) -> Result<Entry> {
    let (file_name, is_utf8) = encode_path(path)?;
    log::debug!("adding entry {} ({} bytes name)", path, file_name.len());

    let gp_flag_utf8 = if is_utf8 { GP_FLAG_UTF8 } else { 0 };

    let cd_start = archive.eocd.central_directory_offset as u64;

    // Read the existing central directory into memory before step 2
    // overwrites it on disk — the new local header and payload land
    // exactly where the old central directory used to sit.
    let existing = collect_existing_central_headers(archive)?;

    // Step 2: seek to the old central directory start; the new local
    // header and payload overwrite it.
    let local_header_offset = cd_start;

    // Step 3: placeholder local file header with bit 3 set.
    let placeholder = LocalFileHeader {
        version_needed: VERSION_NEEDED_TO_EXTRACT,
        gp_flag: gp_flag_utf8 | GP_FLAG_DATA_DESCRIPTOR,
        compression_method: options.compression.method_id(),
        last_mod_time: 0,
        last_mod_date: 0,
        crc32: 0,
        compressed_size: 0,
        uncompressed_size: 0,
        file_name: file_name.clone(),
        extra_field: Vec::new(),
    };
    let mut header_buf = Vec::new();
    placeholder.write_to(&mut header_buf);

    {
        let writer = archive.writer_mut()?;
        writer.seek(SeekFrom::Start(local_header_offset))?;
        writer.write_all(&header_buf)?;
    }

    // Step 4: stream payload through Store or Deflate.
    let payload_start = local_header_offset + header_buf.len() as u64;
    let (crc, uncompressed_size, compressed_size) = {
        let writer = archive.writer_mut()?;
        writer.seek(SeekFrom::Start(payload_start))?;
        stream_payload(&mut source, writer, options)?
    };

    // Step 5: data descriptor with final CRC and sizes.
    let dd = DataDescriptor {
        crc32: crc,
        compressed_size: compressed_size as u32,
        uncompressed_size: uncompressed_size as u32,
    };
    let mut dd_buf = Vec::new();
    dd.write_to(&mut dd_buf);
    let dd_offset = payload_start + compressed_size;
    {
        let writer = archive.writer_mut()?;
        writer.seek(SeekFrom::Start(dd_offset))?;
        writer.write_all(&dd_buf)?;
    }

    // Step 6: rewrite every existing central directory header at its new
    // location (unchanged content, only physical position moves), then
    // append a new header for this entry.
    let new_cd_start = dd_offset + dd_buf.len() as u64;
    let mut cd_buf = Vec::new();
    for header in &existing {
        header.write_to(&mut cd_buf);
    }

    let external_attrs = ((0o100000u32 | options.permissions) & 0xffff) << 16;
    let new_central = CentralDirectoryHeader {
        version_made_by: crate::format::header::version_made_by(),
        version_needed: VERSION_NEEDED_TO_EXTRACT,
        gp_flag: gp_flag_utf8 | GP_FLAG_DATA_DESCRIPTOR,
        compression_method: options.compression.method_id(),
        last_mod_time: 0,
        last_mod_date: 0,
        crc32: crc,
        compressed_size: compressed_size as u32,
        uncompressed_size: uncompressed_size as u32,
        disk_number_start: 0,
        internal_file_attributes: 0,
        external_file_attributes: external_attrs,
        relative_offset_of_local_header: check_cd_offset(local_header_offset)?,
        file_name: file_name.clone(),
        extra_field: Vec::new(),
        file_comment: Vec::new(),
    };
    new_central.write_to(&mut cd_buf);

    {
        let writer = archive.writer_mut()?;
        writer.seek(SeekFrom::Start(new_cd_start))?;
        writer.write_all(&cd_buf)?;
    }

    // Step 7: new EOCD with incremented counts.
    let new_eocd = EndOfCentralDirectory {
        disk_number: 0,
        disk_with_central_directory: 0,
        entries_on_this_disk: existing.len() as u16 + 1,
        total_entries: existing.len() as u16 + 1,
        central_directory_size: cd_buf.len() as u32,
        central_directory_offset: check_cd_offset(new_cd_start)?,
        comment: archive.eocd.comment.clone(),
    };
    let eocd_offset = new_cd_start + cd_buf.len() as u64;
    let mut eocd_buf = Vec::new();
    new_eocd.write_to(&mut eocd_buf);

    {
        let writer = archive.writer_mut()?;
        writer.seek(SeekFrom::Start(eocd_offset))?;
        writer.write_all(&eocd_buf)?;
        // Step 8: truncate to current position.
        writer.set_len(eocd_offset + eocd_buf.len() as u64)?;
        writer.flush()?;
    }

    // In-memory EOCD updates only after the on-disk EOCD has been flushed.
    archive.set_eocd(new_eocd);

    let local = LocalFileHeader {
        version_needed: VERSION_NEEDED_TO_EXTRACT,
        gp_flag: gp_flag_utf8 | GP_FLAG_DATA_DESCRIPTOR,
        compression_method: options.compression.method_id(),
        last_mod_time: 0,
        last_mod_date: 0,
        crc32: crc,
        compressed_size: compressed_size as u32,
        uncompressed_size: uncompressed_size as u32,
        file_name,
        extra_field: Vec::new(),
    };

    Ok(Entry::new(new_central, local, Some(dd)))
}

fn stream_payload<R: Read, W: Write + Seek>(
    source: &mut R,
    writer: &mut W,
    options: &AddOptions,
) -> Result<(u32, u64, u64)> {
    match options.compression {
        crate::config::Compression::Store => {
            let outcome = crate::deflate::store_copy(source, &mut *writer, options.chunk_size)?;
            Ok((outcome.crc, outcome.bytes_out, outcome.bytes_out))
        }
        crate::config::Compression::Deflate => {
            let outcome = crate::deflate::compress(
                source,
                &mut *writer,
                options.chunk_size,
                options.compression_level,
            )?;
            Ok((outcome.crc, outcome.bytes_in, outcome.bytes_out))
        }
    }
}

fn collect_existing_central_headers(archive: &mut Archive) -> Result<Vec<CentralDirectoryHeader>> {
    let count = archive.eocd.total_entries as usize;
    let mut offset = archive.eocd.central_directory_offset as u64;
    let mut headers = Vec::with_capacity(count);
    for _ in 0..count {
        let stream = archive.stream_mut();
        let header = CentralDirectoryHeader::read_at(stream, offset)?;
        offset += header.total_size();
        headers.push(header);
    }
    Ok(headers)
}

/// Removes `entry` from the archive: shifts the payload of every
/// subsequent entry leftward over the removed span, rewrites the central
/// directory (omitting the removed entry, shifting surviving offsets),
/// and emits a new EOCD.
pub fn remove_entry(archive: &mut Archive, entry: &Entry) -> Result<()> {
    let (a, b) = entry.span();
    log::debug!("removing entry {} (span {}..{})", entry.path, a, b);

    let cd_offset = archive.eocd.central_directory_offset as u64;
    let shift = b - a;

    shift_left(archive, b, cd_offset, shift)?;

    let new_cd_offset = cd_offset - shift;
    let existing = collect_existing_central_headers(archive)?;

    let mut cd_buf = Vec::new();
    let mut survivors = 0u16;
    for mut header in existing {
        if header.relative_offset_of_local_header as u64 == a {
            continue;
        }
        if header.relative_offset_of_local_header as u64 >= b {
            header.relative_offset_of_local_header = check_cd_offset(
                header.relative_offset_of_local_header as u64 - shift,
            )?;
        }
        header.write_to(&mut cd_buf);
        survivors += 1;
    }

    {
        let writer = archive.writer_mut()?;
        writer.seek(SeekFrom::Start(new_cd_offset))?;
        writer.write_all(&cd_buf)?;
    }

    let new_eocd = EndOfCentralDirectory {
        disk_number: 0,
        disk_with_central_directory: 0,
        entries_on_this_disk: survivors,
        total_entries: survivors,
        central_directory_size: cd_buf.len() as u32,
        central_directory_offset: check_cd_offset(new_cd_offset)?,
        comment: archive.eocd.comment.clone(),
    };
    let eocd_offset = new_cd_offset + cd_buf.len() as u64;
    let mut eocd_buf = Vec::new();
    new_eocd.write_to(&mut eocd_buf);

    {
        let writer = archive.writer_mut()?;
        writer.seek(SeekFrom::Start(eocd_offset))?;
        writer.write_all(&eocd_buf)?;
        writer.set_len(eocd_offset + eocd_buf.len() as u64)?;
        writer.flush()?;
    }

    archive.set_eocd(new_eocd);
    Ok(())
}

/// Copies the byte range `[from, to)` leftward by `shift` bytes, in
/// bounded 16 KiB chunks, without ever materializing the whole range.
fn shift_left(archive: &mut Archive, from: u64, to: u64, shift: u64) -> Result<()> {
    const CHUNK: usize = 16 * 1024;
    let mut buf = vec![0u8; CHUNK];
    let mut read_pos = from;
    let mut write_pos = from - shift;

    while read_pos < to {
        let want = CHUNK.min((to - read_pos) as usize);
        {
            let writer = archive.writer_mut()?;
            writer.seek(SeekFrom::Start(read_pos))?;
            writer.read_exact(&mut buf[..want])?;
        }
        {
            let writer = archive.writer_mut()?;
            writer.seek(SeekFrom::Start(write_pos))?;
            writer.write_all(&buf[..want])?;
        }
        read_pos += want as u64;
        write_pos += want as u64;
    }

    Ok(())
}

/// Validates a central directory header names a compression method this
/// crate understands, used by `extract` before streaming a payload.
pub(crate) fn validate_compression_method(method: u16) -> Result<()> {
    if method == COMPRESSION_STORE || method == COMPRESSION_DEFLATE {
        Ok(())
    } else {
        Err(ZipError::InvalidCompressionMethod(method))
    }
}

/// Streams `entry`'s payload into `sink`, decompressing as needed, and
/// verifies the recorded CRC-32 unless `skip_crc` is set. Directory
/// entries write nothing; callers materialize
/// an empty directory themselves. Symlink entries extract their target
/// path as plain bytes, same as a regular file, and leave deciding whether
/// to recreate an OS symlink to the caller.
pub fn extract_entry<W: Write>(
    archive: &mut Archive,
    entry: &Entry,
    mut sink: W,
    chunk_size: usize,
    skip_crc: bool,
) -> Result<u64> {
    if entry.kind == crate::entry::EntryKind::Directory {
        return Ok(0);
    }

    validate_compression_method(entry.compression_method())?;

    let payload_start = entry.relative_offset_of_local_header() + entry.local.total_size();
    let payload_len = entry.compressed_size();

    {
        let stream = archive.stream_mut();
        stream.seek(SeekFrom::Start(payload_start))?;
    }

    let outcome = {
        let stream = archive.stream_mut();
        let limited = stream.take(payload_len);
        match entry.compression_method() {
            COMPRESSION_DEFLATE => {
                crate::deflate::decompress(limited, &mut sink, chunk_size, entry.uncompressed_size())?
            }
            _ => crate::deflate::store_copy(limited, &mut sink, chunk_size)?,
        }
    };

    if !skip_crc && outcome.crc != entry.crc32() {
        return Err(ZipError::InvalidCRC32);
    }

    Ok(outcome.bytes_out)
}

