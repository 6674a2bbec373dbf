//! Typed configuration, not global mutable state (Design Notes §9).

/// Default chunk size (bytes) for streaming compression/decompression and
/// payload shift-copies during mutation.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Default POSIX mode bits applied to a newly added file entry.
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o755;

/// Default POSIX mode bits applied to a newly added directory entry.
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o755;

/// Default Deflate compression level (0-9), matching `flate2::Compression`.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Compression method selectable when adding an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Store,
    Deflate,
}

impl Compression {
    pub fn method_id(self) -> u16 {
        match self {
            Compression::Store => crate::format::header::COMPRESSION_STORE,
            Compression::Deflate => crate::format::header::COMPRESSION_DEFLATE,
        }
    }
}

/// Configuration accepted by `Archive::add`.
#[derive(Debug, Clone)]
pub struct AddOptions {
    pub compression: Compression,
    pub chunk_size: usize,
    pub permissions: u32,
    pub skip_crc: bool,
    pub compression_level: u32,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflate,
            chunk_size: DEFAULT_CHUNK_SIZE,
            permissions: DEFAULT_FILE_PERMISSIONS,
            skip_crc: false,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl AddOptions {
    pub fn store() -> Self {
        Self {
            compression: Compression::Store,
            ..Default::default()
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_skip_crc(mut self, skip_crc: bool) -> Self {
        self.skip_crc = skip_crc;
        self
    }
}
