//! Container reading: EOCD discovery, central directory walk, member extraction

use super::records::{
    CentralDirectoryHeader, EOCD_LEN, EOCD_SIGNATURE, EndOfCentralDirectory, LocalFileHeader,
};
use super::{Archive, ArchiveEntry, CompressionMethod};
use crate::error::{Error, Result};
use crate::model::DecoderConfig;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Find the offset of the end of central directory record
///
/// Scans backward from `len - 4` because the record is followed by a
/// variable-length comment. A signature hit is accepted only if the record
/// and its declared comment fit in the buffer, which skips stray `PK\x05\x06`
/// sequences inside member content or the comment itself.
pub(crate) fn find_eocd(buffer: &[u8]) -> Option<usize> {
    if buffer.len() < EOCD_LEN {
        return None;
    }
    (0..=buffer.len() - 4).rev().find(|&offset| {
        if buffer[offset..offset + 4] != EOCD_SIGNATURE {
            return false;
        }
        let Some(len_bytes) = buffer.get(offset + 20..offset + 22) else {
            return false;
        };
        let comment_len = u16::from_le_bytes([len_bytes[0], len_bytes[1]]) as usize;
        offset + EOCD_LEN + comment_len <= buffer.len()
    })
}

/// Read every member of a stored-only container
pub(super) fn read<'a>(buffer: &'a [u8], config: &DecoderConfig) -> Result<Archive<'a>> {
    let eocd_offset = find_eocd(buffer).ok_or_else(|| {
        Error::invalid_archive_context(
            "end of central directory",
            "signature PK\\x05\\x06 not found; the buffer is not a ZIP container",
        )
    })?;
    let eocd = EndOfCentralDirectory::parse(buffer, eocd_offset)?;
    debug!(
        offset = eocd_offset,
        entries = eocd.total_entries,
        "found end of central directory"
    );

    if eocd.disk_number != 0 || eocd.central_directory_disk != 0 {
        return Err(Error::invalid_archive_context(
            "end of central directory",
            "multi-disk archives are not supported",
        ));
    }
    if eocd.is_zip64() {
        return Err(Error::invalid_archive_context(
            "end of central directory",
            "ZIP64 archives are not supported",
        ));
    }

    let cd_start = eocd.central_directory_offset as usize;
    let cd_end = cd_start
        .checked_add(eocd.central_directory_size as usize)
        .filter(|&end| end <= eocd_offset)
        .ok_or_else(|| {
            Error::invalid_archive_context(
                "end of central directory",
                &format!(
                    "central directory ({} bytes at offset {}) overlaps the EOCD record at {}",
                    eocd.central_directory_size, cd_start, eocd_offset
                ),
            )
        })?;

    let mut archive = Archive {
        entries: Vec::with_capacity(eocd.total_entries as usize),
        index: HashMap::with_capacity(eocd.total_entries as usize),
        comment: eocd.comment,
    };

    let mut cursor = cd_start;
    for index in 0..eocd.total_entries {
        if cursor >= cd_end {
            return Err(Error::invalid_archive_context(
                "central directory",
                &format!(
                    "declares {} entries but ends after {}",
                    eocd.total_entries, index
                ),
            ));
        }
        let header = CentralDirectoryHeader::parse(buffer, cursor)?;
        cursor += header.record_len;
        if cursor > cd_end {
            return Err(Error::invalid_archive_context(
                "central directory header",
                &format!("entry '{}' runs past the central directory", header.file_name),
            ));
        }

        let entry = extract_entry(buffer, &header, config)?;
        trace!(
            name = %entry.name,
            size = entry.uncompressed_size,
            "extracted member"
        );
        archive.insert(entry);
    }

    Ok(archive)
}

fn extract_entry<'a>(
    buffer: &'a [u8],
    header: &CentralDirectoryHeader,
    config: &DecoderConfig,
) -> Result<ArchiveEntry<'a>> {
    let local = LocalFileHeader::parse(buffer, header.local_header_offset as usize)?;

    let method = CompressionMethod::from_code(local.compression_method);
    if method != CompressionMethod::Stored {
        return Err(Error::UnsupportedCompression {
            name: header.file_name.clone(),
            method: method.to_string(),
        });
    }
    if local.compression_method != header.compression_method {
        return Err(Error::invalid_archive_context(
            "local file header",
            &format!(
                "'{}' declares method {} locally but {} in the central directory",
                header.file_name, local.compression_method, header.compression_method
            ),
        ));
    }
    if header.compressed_size != header.uncompressed_size {
        return Err(Error::invalid_archive_context(
            "central directory header",
            &format!(
                "stored member '{}' has compressed size {} but uncompressed size {}",
                header.file_name, header.compressed_size, header.uncompressed_size
            ),
        ));
    }
    if !local.has_data_descriptor() && local.compressed_size != header.compressed_size {
        return Err(Error::invalid_archive_context(
            "local file header",
            &format!(
                "'{}' declares {} bytes locally but {} in the central directory",
                header.file_name, local.compressed_size, header.compressed_size
            ),
        ));
    }

    let start = local.content_offset;
    let range = start
        .checked_add(header.compressed_size as usize)
        .filter(|&end| end <= buffer.len())
        .map(|end| start..end)
        .ok_or_else(|| {
            Error::invalid_archive_context(
                "local file header",
                &format!(
                    "content of '{}' ({} bytes at offset {}) runs past the end of the buffer",
                    header.file_name, header.compressed_size, start
                ),
            )
        })?;
    let content = &buffer[range.clone()];

    if config.verify_checksums() {
        let actual = crc32fast::hash(content);
        if actual != header.crc32 {
            return Err(Error::ChecksumMismatch {
                name: header.file_name.clone(),
                expected: header.crc32,
                actual,
            });
        }
    }

    if local.file_name != header.file_name {
        warn!(
            central = %header.file_name,
            local = %local.file_name,
            "local header name differs from central directory; using central name"
        );
    }

    Ok(ArchiveEntry {
        name: header.file_name.clone(),
        method,
        compressed_size: header.compressed_size,
        uncompressed_size: header.uncompressed_size,
        crc32: header.crc32,
        range,
        content,
    })
}
