//! Streaming Deflate/Inflate codec tied to CRC-32 verification.
//!
//! Both directions pull/push fixed-size chunks (default 16 KiB) so a 1 GiB
//! entry never needs to be resident in memory at once. The codec is
//! restartable per call and shares no state between entries, matching
//! `StreamingZipWriter`/`StreamingZipReader`'s on-the-fly compression.

use crate::crc::Crc32;
use crate::error::Result;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Outcome of a `compress` call.
pub struct CompressOutcome {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub crc: u32,
}

/// Outcome of a `decompress` call.
pub struct DecompressOutcome {
    pub bytes_out: u64,
    pub crc: u32,
}

/// Streams `source` through a Deflate encoder into `sink`, reading and
/// writing in `chunk_size` pieces, and returns the running CRC-32 over the
/// **uncompressed** bytes along with byte counts. The sink is wrapped in a
/// counting writer so `bytes_out` comes back without re-seeking the
/// underlying stream.
pub fn compress<R: Read, W: Write>(
    mut source: R,
    sink: W,
    chunk_size: usize,
    level: u32,
) -> Result<CompressOutcome> {
    use crate::crc::Crc32Writer;

    let counting = Crc32Writer::new(sink);
    let mut encoder = DeflateEncoder::new(counting, Compression::new(level.min(9)));
    let mut crc = Crc32::new();
    let mut bytes_in: u64 = 0;
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = source.read(&mut buf)?;
        if n == 0 {
            break;
        }
        crc.update(&buf[..n]);
        bytes_in += n as u64;
        encoder.write_all(&buf[..n])?;
    }

    let counting = encoder.finish()?;
    let bytes_out = counting.count();

    Ok(CompressOutcome {
        bytes_in,
        bytes_out,
        crc: crc.finalize(),
    })
}

/// Streams `source` (compressed bytes) through a Deflate decoder into
/// `sink`, in `chunk_size` pieces, returning the CRC-32 over the
/// decompressed bytes. `expected_size` is advisory only (used to
/// preallocate) and is not validated here; callers compare it to the
/// recorded uncompressed size.
pub fn decompress<R: Read, W: Write>(
    source: R,
    mut sink: W,
    chunk_size: usize,
    _expected_size: u64,
) -> Result<DecompressOutcome> {
    let mut decoder = DeflateDecoder::new(source);
    let mut crc = Crc32::new();
    let mut bytes_out: u64 = 0;
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = decoder.read(&mut buf)?;
        if n == 0 {
            break;
        }
        crc.update(&buf[..n]);
        bytes_out += n as u64;
        sink.write_all(&buf[..n])?;
    }

    Ok(DecompressOutcome {
        bytes_out,
        crc: crc.finalize(),
    })
}

/// Store-mode path: bypasses Deflate entirely but still computes CRC-32 and
/// forwards bytes chunk by chunk.
pub fn store_copy<R: Read, W: Write>(
    mut source: R,
    mut sink: W,
    chunk_size: usize,
) -> Result<DecompressOutcome> {
    let mut crc = Crc32::new();
    let mut bytes_out: u64 = 0;
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = source.read(&mut buf)?;
        if n == 0 {
            break;
        }
        crc.update(&buf[..n]);
        bytes_out += n as u64;
        sink.write_all(&buf[..n])?;
    }

    Ok(DecompressOutcome {
        bytes_out,
        crc: crc.finalize(),
    })
}
