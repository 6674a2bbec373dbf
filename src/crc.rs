//! Streaming CRC-32 (IEEE 802.3, polynomial 0xEDB88320, reflected, seed 0,
//! final XOR 0xFFFFFFFF) over chunked input, matching `crc32fast`'s own
//! implementation of the standard. This module wraps it so the rest of the
//! crate computes CRC incrementally without materializing whole payloads.

use std::io::{self, Write};

/// Incremental CRC-32 accumulator. Restartable per call; holds no state
/// shared across entries.
#[derive(Default)]
pub struct Crc32 {
    hasher: crc32fast::Hasher,
}

impl Crc32 {
    pub fn new() -> Self {
        Self {
            hasher: crc32fast::Hasher::new(),
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

/// A `Write` adapter that accumulates CRC-32 and byte count over whatever
/// is written through it before forwarding to `inner`. Grounded directly on
/// `StreamingZipWriter`'s `CrcCountingWriter`.
pub struct Crc32Writer<W> {
    inner: W,
    crc: Crc32,
    count: u64,
}

impl<W: Write> Crc32Writer<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            crc: Crc32::new(),
            count: 0,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn finalize(self) -> u32 {
        self.crc.finalize()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for Crc32Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.crc.update(&buf[..n]);
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
