//! Archive session: open/create/update lifecycle, EOCD scan, entry
//! iteration, and path lookup.
//!
//! Follows `StreamingZipReader::open` / `find_eocd` /
//! `read_central_directory` (`reader.rs`), unified behind a single session
//! type carrying an access mode.

use crate::entry::Entry;
use crate::error::{Result, ZipError};
use crate::format::header::{
    CentralDirectoryHeader, DataDescriptor, EndOfCentralDirectory, LocalFileHeader,
};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How an archive was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Create,
    Update,
}

/// EOCD search window: 22-byte record plus up to a 65535-byte comment,
/// rounded up as the source does.
const EOCD_SEARCH_WINDOW: u64 = 66000;

/// An open ZIP archive: the backing file location, access mode, a
/// buffered positioned stream, and the parsed EOCD.
///
/// Single-threaded per session; not safe for concurrent access.
/// Stream position after any public operation is unspecified.
pub struct Archive {
    path: PathBuf,
    mode: AccessMode,
    stream: BufferedStream,
    pub(crate) eocd: EndOfCentralDirectory,
}

/// A positioned, buffered file stream. Read-only sessions use a
/// `BufReader`; Create/Update sessions need read-write access, so they
/// wrap the file directly with manual buffering left to the OS — matching
/// reads being buffered (`BufReader<File>`) while writes go through `File`
/// directly, mirroring `StreamingZipWriter`.
enum BufferedStream {
    Reader(BufReader<File>),
    Writer(File),
}

impl Read for BufferedStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            BufferedStream::Reader(r) => r.read(buf),
            BufferedStream::Writer(w) => w.read(buf),
        }
    }
}

impl Write for BufferedStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            BufferedStream::Reader(_) => Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "archive opened read-only",
            )),
            BufferedStream::Writer(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            BufferedStream::Reader(r) => r.flush(),
            BufferedStream::Writer(w) => w.flush(),
        }
    }
}

impl Seek for BufferedStream {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match self {
            BufferedStream::Reader(r) => r.seek(pos),
            BufferedStream::Writer(w) => w.seek(pos),
        }
    }
}

impl Archive {
    /// Opens, creates, or re-opens an archive at `path` per `mode`.
    pub fn open<P: AsRef<Path>>(path: P, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        match mode {
            AccessMode::Read => {
                log::debug!("opening archive for read: {}", path.display());
                let file = File::open(&path).map_err(|e| {
                    ZipError::UnreadableArchive(format!("{}: {}", path.display(), e))
                })?;
                let mut stream = BufferedStream::Reader(BufReader::new(file));
                let eocd = scan_eocd(&mut stream)?;
                Ok(Self {
                    path,
                    mode,
                    stream,
                    eocd,
                })
            }
            AccessMode::Create => {
                log::debug!("creating archive: {}", path.display());
                if path.exists() {
                    return Err(ZipError::UnwritableArchive(format!(
                        "{} already exists",
                        path.display()
                    )));
                }
                let mut file = File::create(&path)?;
                let eocd = EndOfCentralDirectory::empty();
                let mut buf = Vec::with_capacity(crate::format::header::EOCD_FIXED_SIZE);
                eocd.write_to(&mut buf);
                file.write_all(&buf)?;
                file.flush()?;

                let file = OpenOptions::new().read(true).write(true).open(&path)?;
                Ok(Self {
                    path,
                    mode,
                    stream: BufferedStream::Writer(file),
                    eocd,
                })
            }
            AccessMode::Update => {
                log::debug!("opening archive for update: {}", path.display());
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(&path)
                    .map_err(|e| {
                        ZipError::UnwritableArchive(format!("{}: {}", path.display(), e))
                    })?;
                let mut stream = BufferedStream::Writer(file);
                let eocd = scan_eocd(&mut stream)?;
                stream.seek(SeekFrom::Start(0))?;
                Ok(Self {
                    path,
                    mode,
                    stream,
                    eocd,
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.eocd.total_entries as usize
    }

    pub fn is_empty(&self) -> bool {
        self.eocd.total_entries == 0
    }

    fn writable(&mut self) -> Result<&mut File> {
        match &mut self.stream {
            BufferedStream::Writer(f) => Ok(f),
            BufferedStream::Reader(_) => Err(ZipError::UnwritableArchive(
                "archive opened read-only".to_string(),
            )),
        }
    }

    pub(crate) fn stream_mut(&mut self) -> &mut (impl Read + Write + Seek) {
        &mut self.stream
    }

    pub(crate) fn writer_mut(&mut self) -> Result<&mut File> {
        self.writable()
    }

    /// A restartable cursor over the central directory, in physical
    /// (central-directory) order — the canonical enumeration order for
    /// every public API.
    pub fn iter(&mut self) -> EntryIter<'_> {
        EntryIter {
            archive: self,
            offset: None,
            index: 0,
        }
    }

    /// Collects every entry eagerly. `lookup`/`preview`/tests use this;
    /// streaming callers should prefer `iter`.
    pub fn entries(&mut self) -> Result<Vec<Entry>> {
        let mut out = Vec::with_capacity(self.len());
        let mut cursor = self.iter();
        while let Some(entry) = cursor.next_entry()? {
            out.push(entry);
        }
        Ok(out)
    }

    /// First entry whose path matches `path` exactly (stable first-match).
    pub fn lookup(&mut self, path: &str) -> Result<Option<Entry>> {
        let mut cursor = self.iter();
        while let Some(entry) = cursor.next_entry()? {
            if entry.path == path {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    pub(crate) fn set_eocd(&mut self, eocd: EndOfCentralDirectory) {
        self.eocd = eocd;
    }

    /// Adds a new entry, streaming `source`'s bytes through Store or
    /// Deflate per `options`.
    pub fn add<R: Read>(
        &mut self,
        path: &str,
        source: R,
        options: &crate::config::AddOptions,
    ) -> Result<Entry> {
        crate::mutate::add_entry(self, path, source, options)
    }

    /// Removes `entry`, shifting every subsequent entry's payload leftward
    /// and rewriting the central directory.
    pub fn remove(&mut self, entry: &Entry) -> Result<()> {
        crate::mutate::remove_entry(self, entry)
    }

    /// Streams `entry`'s payload into `sink`, verifying its CRC-32 unless
    /// `skip_crc` is set.
    pub fn extract<W: Write>(&mut self, entry: &Entry, sink: W) -> Result<u64> {
        crate::mutate::extract_entry(self, entry, sink, crate::config::DEFAULT_CHUNK_SIZE, false)
    }
}

impl Drop for Archive {
    /// Best-effort flush of any buffered writer state. Mutation methods
    /// already flush after each transaction, so this is a safety net for
    /// the rare caller that reaches into `stream_mut`/`writer_mut`
    /// directly and forgets to flush before dropping the session.
    fn drop(&mut self) {
        if let BufferedStream::Writer(f) = &mut self.stream {
            let _ = f.flush();
        }
    }
}

/// Walks backwards from `archive_length - 22` looking for the EOCD
/// signature, then parses the full record including its comment tail.
/// Grounded on `StreamingZipReader::find_eocd`.
fn scan_eocd<S: Read + Seek>(stream: &mut S) -> Result<EndOfCentralDirectory> {
    let file_size = stream.seek(SeekFrom::End(0))?;
    let search_start = file_size.saturating_sub(EOCD_SEARCH_WINDOW);
    stream.seek(SeekFrom::Start(search_start))?;

    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer)?;

    for i in (0..buffer.len().saturating_sub(3)).rev() {
        if buffer[i] == 0x50 && buffer[i + 1] == 0x4b && buffer[i + 2] == 0x05 && buffer[i + 3] == 0x06
        {
            let offset = search_start + i as u64;
            return EndOfCentralDirectory::read_at(stream, offset);
        }
    }

    Err(ZipError::MissingEndOfCentralDirectoryRecord)
}

/// Restartable cursor over the central directory. Holds a running byte offset into the central directory and
/// an entry counter; resetting is re-seeking to the EOCD's central
/// directory start.
pub struct EntryIter<'a> {
    archive: &'a mut Archive,
    offset: Option<u64>,
    index: u32,
}

impl<'a> EntryIter<'a> {
    fn current_offset(&self) -> u64 {
        self.offset
            .unwrap_or(self.archive.eocd.central_directory_offset as u64)
    }

    /// Pulls the next entry, or `None` once the entry counter is
    /// exhausted. Kept as an explicit method (rather than `Iterator`)
    /// because parsing each entry is fallible.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        if self.index >= self.archive.eocd.total_entries as u32 {
            return Ok(None);
        }

        let offset = self.current_offset();
        let central = {
            let stream = self.archive.stream_mut();
            CentralDirectoryHeader::read_at(stream, offset)?
        };

        let local = {
            let stream = self.archive.stream_mut();
            LocalFileHeader::read_at(stream, central.relative_offset_of_local_header as u64)?
        };

        let data_descriptor = if central.has_data_descriptor() {
            // The descriptor follows the local payload, so the local
            // header's own name/extra-field lengths are authoritative —
            // they may differ from the central copy in foreign archives.
            let dd_offset =
                central.relative_offset_of_local_header as u64 + local.total_size() + central.payload_size();
            let stream = self.archive.stream_mut();
            Some(DataDescriptor::read_at(stream, dd_offset)?)
        } else {
            None
        };

        self.offset = Some(offset + central.total_size());
        self.index += 1;

        Ok(Some(Entry::new(central, local, data_descriptor)))
    }
}

impl<'a> Iterator for EntryIter<'a> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_entry() {
            Ok(Some(e)) => Some(Ok(e)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
