//! # Source Adapter
//!
//! Normalizes file paths, in-memory buffers and memory-mapped regions into a
//! single randomly addressable byte sequence.

use crate::error::{Mp3Error, Result};
use bytes::Bytes;
use core_runtime::logging::strip_path;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Bytes fetched from disk per refill of a file window.
const FILE_WINDOW_BYTES: usize = 64 * 1024;

/// Caller-facing description of where MP3 bytes come from.
///
/// Borrowed variants are wrapped without copying; the source only lives for
/// the duration of one probe or read call.
#[derive(Debug, Clone)]
pub enum SourceInput<'a> {
    /// File on the local filesystem, opened and closed within the call.
    Path(PathBuf),
    /// Borrowed in-memory buffer.
    Memory(&'a [u8]),
    /// Shared, reference-counted buffer.
    Shared(Bytes),
    /// Memory-mapped file region.
    Mapped(&'a Mmap),
}

impl SourceInput<'_> {
    /// Map a file read-only so it can be passed as [`SourceInput::Mapped`].
    pub fn map_file(path: impl AsRef<Path>) -> Result<Mmap> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // SAFETY: the map is read-only. Concurrent truncation of the file by
        // another process is outside the contract of a mapped source.
        let map = unsafe { Mmap::map(&file)? };
        Ok(map)
    }
}

impl From<PathBuf> for SourceInput<'_> {
    fn from(path: PathBuf) -> Self {
        SourceInput::Path(path)
    }
}

impl From<&Path> for SourceInput<'_> {
    fn from(path: &Path) -> Self {
        SourceInput::Path(path.to_path_buf())
    }
}

impl From<&str> for SourceInput<'_> {
    fn from(path: &str) -> Self {
        SourceInput::Path(PathBuf::from(path))
    }
}

impl From<String> for SourceInput<'_> {
    fn from(path: String) -> Self {
        SourceInput::Path(PathBuf::from(path))
    }
}

impl<'a> From<&'a [u8]> for SourceInput<'a> {
    fn from(data: &'a [u8]) -> Self {
        SourceInput::Memory(data)
    }
}

impl<'a> From<&'a Vec<u8>> for SourceInput<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        SourceInput::Memory(data.as_slice())
    }
}

impl From<Bytes> for SourceInput<'_> {
    fn from(data: Bytes) -> Self {
        SourceInput::Shared(data)
    }
}

impl<'a> From<&'a Mmap> for SourceInput<'a> {
    fn from(map: &'a Mmap) -> Self {
        SourceInput::Mapped(map)
    }
}

/// In-memory bytes, either borrowed or shared.
#[derive(Debug)]
pub enum MemoryBytes<'a> {
    Borrowed(&'a [u8]),
    Shared(Bytes),
}

impl MemoryBytes<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            MemoryBytes::Borrowed(data) => data,
            MemoryBytes::Shared(data) => data.as_ref(),
        }
    }
}

/// Finite, randomly addressable byte sequence resolved once per call.
#[derive(Debug)]
pub enum ByteSource<'a> {
    FilePath(FileSource),
    MemoryBuffer(MemoryBytes<'a>),
    MappedRegion(&'a [u8]),
}

impl<'a> ByteSource<'a> {
    /// Resolve a caller input into a byte source.
    ///
    /// # Errors
    ///
    /// - [`Mp3Error::InvalidArgument`] for an empty path, before any I/O
    /// - [`Mp3Error::Io`] if the file cannot be opened or inspected
    pub fn open(input: SourceInput<'a>) -> Result<Self> {
        match input {
            SourceInput::Path(path) => Ok(ByteSource::FilePath(FileSource::open(&path)?)),
            SourceInput::Memory(data) => Ok(ByteSource::MemoryBuffer(MemoryBytes::Borrowed(data))),
            SourceInput::Shared(data) => Ok(ByteSource::MemoryBuffer(MemoryBytes::Shared(data))),
            SourceInput::Mapped(map) => Ok(ByteSource::MappedRegion(&map[..])),
        }
    }

    /// Total number of bytes in the source.
    pub fn length_bytes(&self) -> u64 {
        match self {
            ByteSource::FilePath(file) => file.len,
            ByteSource::MemoryBuffer(data) => data.as_slice().len() as u64,
            ByteSource::MappedRegion(data) => data.len() as u64,
        }
    }

    /// Return up to `max_len` bytes starting at `offset`.
    ///
    /// The slice is shorter than `max_len` only at the end of the source, and
    /// empty when `offset` is past the end.
    pub fn read_at(&mut self, offset: u64, max_len: usize) -> Result<&[u8]> {
        match self {
            ByteSource::FilePath(file) => Ok(file.read_at(offset, max_len)?),
            ByteSource::MemoryBuffer(data) => Ok(slice_at(data.as_slice(), offset, max_len)),
            ByteSource::MappedRegion(data) => Ok(slice_at(*data, offset, max_len)),
        }
    }

    /// Short name of the representation, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ByteSource::FilePath(_) => "file",
            ByteSource::MemoryBuffer(_) => "memory",
            ByteSource::MappedRegion(_) => "mmap",
        }
    }
}

fn slice_at(data: &[u8], offset: u64, max_len: usize) -> &[u8] {
    let len = data.len() as u64;
    if offset >= len {
        return &[];
    }
    let begin = offset as usize;
    let end = begin + max_len.min(data.len() - begin);
    &data[begin..end]
}

/// File opened for random-access reads through a sliding window.
///
/// The file handle is released when the source is dropped, on every exit path
/// of the call that opened it.
#[derive(Debug)]
pub struct FileSource {
    file: File,
    len: u64,
    window: Vec<u8>,
    window_start: u64,
}

impl FileSource {
    fn open(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(Mp3Error::InvalidArgument(
                "source path must not be empty".to_string(),
            ));
        }

        let path_str = path.to_string_lossy();
        let file = File::open(path).map_err(|e| {
            error!("Failed to open {}: {}", strip_path(&path_str), e);
            e
        })?;

        let metadata = file.metadata()?;
        if metadata.is_dir() {
            return Err(Mp3Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", strip_path(&path_str)),
            )));
        }

        debug!(file = %strip_path(&path_str), bytes = metadata.len(), "Opened file source");

        Ok(Self {
            file,
            len: metadata.len(),
            window: Vec::with_capacity(FILE_WINDOW_BYTES),
            window_start: 0,
        })
    }

    fn read_at(&mut self, offset: u64, max_len: usize) -> io::Result<&[u8]> {
        if offset >= self.len {
            return Ok(&[]);
        }

        let wanted_end = offset.saturating_add(max_len as u64).min(self.len);
        let window_end = self.window_start + self.window.len() as u64;
        if offset < self.window_start || wanted_end > window_end {
            self.refill(offset, max_len.max(FILE_WINDOW_BYTES))?;
        }

        // The file may have shrunk since it was opened; never index past what was read.
        let end = ((wanted_end - self.window_start) as usize).min(self.window.len());
        let begin = ((offset - self.window_start) as usize).min(end);
        Ok(&self.window[begin..end])
    }

    fn refill(&mut self, offset: u64, size: usize) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.window.clear();
        Read::by_ref(&mut self.file)
            .take(size as u64)
            .read_to_end(&mut self.window)?;
        self.window_start = offset;
        Ok(())
    }
}
