//! ZIP container reading
//!
//! Map exports are ZIP archives whose members are written with the stored
//! (uncompressed) method. This module locates the end of central directory
//! record, walks the central directory and exposes each member's content as a
//! borrowed slice of the caller's buffer. No file system access happens here.

mod reader;
mod records;

use crate::error::Result;
use crate::model::DecoderConfig;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

pub use records::{CENTRAL_HEADER_SIGNATURE, EOCD_SIGNATURE, LOCAL_HEADER_SIGNATURE};

/// Compression method declared by a member header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// Method 0: content is stored as-is
    Stored,
    /// Any other method code; never extracted
    Other(u16),
}

impl CompressionMethod {
    /// Map a raw method code
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => CompressionMethod::Stored,
            other => CompressionMethod::Other(other),
        }
    }

    /// Raw method code
    pub fn code(self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Other(code) => code,
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMethod::Stored => f.write_str("STORED"),
            CompressionMethod::Other(8) => f.write_str("DEFLATE"),
            CompressionMethod::Other(9) => f.write_str("DEFLATE64"),
            CompressionMethod::Other(12) => f.write_str("BZIP2"),
            CompressionMethod::Other(14) => f.write_str("LZMA"),
            CompressionMethod::Other(93) => f.write_str("ZSTD"),
            CompressionMethod::Other(code) => write!(f, "{}", code),
        }
    }
}

/// One extracted member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry<'a> {
    /// Member name as declared by the central directory
    pub name: String,
    /// Declared compression method (always [`CompressionMethod::Stored`] once extracted)
    pub method: CompressionMethod,
    /// Declared compressed size
    pub compressed_size: u32,
    /// Declared uncompressed size
    pub uncompressed_size: u32,
    /// Declared CRC-32
    pub crc32: u32,
    /// Byte range of the content within the source buffer
    pub range: Range<usize>,
    content: &'a [u8],
}

impl<'a> ArchiveEntry<'a> {
    /// Raw content bytes
    pub fn content(&self) -> &'a [u8] {
        self.content
    }
}

/// Members of a ZIP container, in central directory order
#[derive(Debug, Clone, Default)]
pub struct Archive<'a> {
    entries: Vec<ArchiveEntry<'a>>,
    /// Member name to position in `entries`
    index: HashMap<String, usize>,
    comment: String,
}

impl<'a> Archive<'a> {
    /// Read a container with checksum verification enabled
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dsmap::archive::Archive;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let bytes = std::fs::read("castle.ds")?;
    /// let archive = Archive::read(&bytes)?;
    /// for name in archive.names() {
    ///     println!("{}", name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn read(buffer: &'a [u8]) -> Result<Self> {
        reader::read(buffer, &DecoderConfig::default())
    }

    /// Read a container with a custom configuration
    pub fn read_with_config(buffer: &'a [u8], config: &DecoderConfig) -> Result<Self> {
        reader::read(buffer, config)
    }

    /// Later members replace earlier ones with the same name
    fn insert(&mut self, entry: ArchiveEntry<'a>) {
        match self.index.get(&entry.name) {
            Some(&position) => {
                tracing::warn!(name = %entry.name, "duplicate member name; keeping the later entry");
                self.entries[position] = entry;
            }
            None => {
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the container has no members
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Archive comment from the EOCD record
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Member names in central directory order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// All members in central directory order
    pub fn entries(&self) -> &[ArchiveEntry<'a>] {
        &self.entries
    }

    /// Look up a member by name
    pub fn get(&self, name: &str) -> Option<&ArchiveEntry<'a>> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    /// Check if a member exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Content of a member by name
    pub fn content(&self, name: &str) -> Option<&'a [u8]> {
        self.get(name).map(|e| e.content)
    }
}
