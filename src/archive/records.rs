//! Fixed-layout ZIP records
//!
//! All multi-byte fields are little-endian. Every read is bounds-checked
//! against the source buffer so a truncated or hostile file surfaces as
//! [`Error::InvalidArchive`] rather than a panic.
//!
//! @see <https://en.wikipedia.org/wiki/ZIP_(file_format)>

use crate::error::{Error, Result};

/// End of central directory signature (`PK\x05\x06`)
pub const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x05, 0x06];

/// Central directory file header signature (`PK\x01\x02`)
pub const CENTRAL_HEADER_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];

/// Local file header signature (`PK\x03\x04`)
pub const LOCAL_HEADER_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

/// Size of the EOCD record without its comment
pub const EOCD_LEN: usize = 22;

/// Size of a central directory header without its variable fields
pub const CENTRAL_HEADER_LEN: usize = 46;

/// Size of a local file header without its variable fields
pub const LOCAL_HEADER_LEN: usize = 30;

/// General purpose flag bit: sizes and CRC follow the content in a data descriptor
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

/// Cursor over a slice of the source buffer
///
/// Offsets are relative to `base`, the absolute position of the record, so
/// error messages can report where in the file a read went wrong.
pub(crate) struct FieldReader<'a> {
    buffer: &'a [u8],
    base: usize,
    record: &'static str,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(buffer: &'a [u8], base: usize, record: &'static str) -> Self {
        Self {
            buffer,
            base,
            record,
        }
    }

    pub(crate) fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let start = self
            .base
            .checked_add(offset)
            .ok_or_else(|| self.out_of_bounds(offset, len))?;
        let end = start
            .checked_add(len)
            .ok_or_else(|| self.out_of_bounds(offset, len))?;
        self.buffer
            .get(start..end)
            .ok_or_else(|| self.out_of_bounds(offset, len))
    }

    pub(crate) fn u16(&self, offset: usize) -> Result<u16> {
        let b = self.bytes(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32(&self, offset: usize) -> Result<u32> {
        let b = self.bytes(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn expect_signature(&self, signature: [u8; 4]) -> Result<()> {
        let found = self.bytes(0, 4)?;
        if found != signature {
            return Err(Error::invalid_archive_context(
                self.record,
                &format!(
                    "invalid magic {:02x?} at offset {} (expected {:02x?})",
                    found, self.base, signature
                ),
            ));
        }
        Ok(())
    }

    fn out_of_bounds(&self, offset: usize, len: usize) -> Error {
        Error::invalid_archive_context(
            self.record,
            &format!(
                "field at offset {}+{} ({} bytes) runs past the end of a {}-byte buffer",
                self.base,
                offset,
                len,
                self.buffer.len()
            ),
        )
    }
}

/// End of central directory record
///
/// After all the central directory entries comes the EOCD record, which marks
/// the end of the ZIP file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    /// Number of this disk
    pub disk_number: u16,
    /// Disk where the central directory starts
    pub central_directory_disk: u16,
    /// Number of central directory records on this disk
    pub disk_entries: u16,
    /// Total number of central directory records
    pub total_entries: u16,
    /// Size of the central directory in bytes
    pub central_directory_size: u32,
    /// Offset of the start of the central directory, relative to the start of the archive
    pub central_directory_offset: u32,
    /// Archive comment
    pub comment: String,
}

impl EndOfCentralDirectory {
    /// Parse the record starting at `offset`
    pub fn parse(buffer: &[u8], offset: usize) -> Result<Self> {
        let r = FieldReader::new(buffer, offset, "end of central directory");
        r.expect_signature(EOCD_SIGNATURE)?;
        let comment_len = r.u16(20)? as usize;
        Ok(Self {
            disk_number: r.u16(4)?,
            central_directory_disk: r.u16(6)?,
            disk_entries: r.u16(8)?,
            total_entries: r.u16(10)?,
            central_directory_size: r.u32(12)?,
            central_directory_offset: r.u32(16)?,
            comment: String::from_utf8_lossy(r.bytes(EOCD_LEN, comment_len)?).into_owned(),
        })
    }

    /// Whether any field holds a ZIP64 sentinel value
    pub fn is_zip64(&self) -> bool {
        self.total_entries == u16::MAX
            || self.central_directory_size == u32::MAX
            || self.central_directory_offset == u32::MAX
    }
}

/// Central directory file header
///
/// The central directory entry is an expanded form of the local header and is
/// the authoritative source of sizes and checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralDirectoryHeader {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number_start: u16,
    pub internal_attributes: u16,
    pub external_attributes: u32,
    /// Offset of the matching local file header
    pub local_header_offset: u32,
    pub file_name: String,
    pub extra_field: Vec<u8>,
    pub comment: String,
    /// Total length of this header including variable fields
    pub record_len: usize,
}

impl CentralDirectoryHeader {
    /// Parse the header starting at `offset`
    pub fn parse(buffer: &[u8], offset: usize) -> Result<Self> {
        let r = FieldReader::new(buffer, offset, "central directory header");
        r.expect_signature(CENTRAL_HEADER_SIGNATURE)?;

        let name_len = r.u16(28)? as usize;
        let extra_len = r.u16(30)? as usize;
        let comment_len = r.u16(32)? as usize;

        let name_start = CENTRAL_HEADER_LEN;
        let extra_start = name_start + name_len;
        let comment_start = extra_start + extra_len;

        Ok(Self {
            version_made_by: r.u16(4)?,
            version_needed: r.u16(6)?,
            flags: r.u16(8)?,
            compression_method: r.u16(10)?,
            last_mod_time: r.u16(12)?,
            last_mod_date: r.u16(14)?,
            crc32: r.u32(16)?,
            compressed_size: r.u32(20)?,
            uncompressed_size: r.u32(24)?,
            disk_number_start: r.u16(34)?,
            internal_attributes: r.u16(36)?,
            external_attributes: r.u32(38)?,
            local_header_offset: r.u32(42)?,
            file_name: String::from_utf8_lossy(r.bytes(name_start, name_len)?).into_owned(),
            extra_field: r.bytes(extra_start, extra_len)?.to_vec(),
            comment: String::from_utf8_lossy(r.bytes(comment_start, comment_len)?).into_owned(),
            record_len: comment_start + comment_len,
        })
    }
}

/// Local file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    /// Zero when [`FLAG_DATA_DESCRIPTOR`] is set
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: String,
    pub extra_field: Vec<u8>,
    /// Absolute offset of the first content byte
    pub content_offset: usize,
}

impl LocalFileHeader {
    /// Parse the header starting at `offset`
    pub fn parse(buffer: &[u8], offset: usize) -> Result<Self> {
        let r = FieldReader::new(buffer, offset, "local file header");
        r.expect_signature(LOCAL_HEADER_SIGNATURE)?;

        let name_len = r.u16(26)? as usize;
        let extra_len = r.u16(28)? as usize;
        let name_start = LOCAL_HEADER_LEN;
        let extra_start = name_start + name_len;

        Ok(Self {
            version_needed: r.u16(4)?,
            flags: r.u16(6)?,
            compression_method: r.u16(8)?,
            last_mod_time: r.u16(10)?,
            last_mod_date: r.u16(12)?,
            crc32: r.u32(14)?,
            compressed_size: r.u32(18)?,
            uncompressed_size: r.u32(22)?,
            file_name: String::from_utf8_lossy(r.bytes(name_start, name_len)?).into_owned(),
            extra_field: r.bytes(extra_start, extra_len)?.to_vec(),
            content_offset: offset + extra_start + extra_len,
        })
    }

    /// Whether sizes and CRC were deferred to a trailing data descriptor
    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }
}
