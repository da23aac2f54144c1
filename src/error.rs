//! Error types for map decoding
//!
//! Every failure in the pipeline is fatal: a container or scene document that
//! cannot be fully resolved is never handed to a renderer half-built. All
//! errors carry a stable code so callers can categorize them without matching
//! on message text.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: Container (ZIP) errors
//! - **E2xxx**: Scene document errors
//! - **E3xxx**: Graph traversal errors
//! - **E4xxx**: Unsupported features
//! - **E5xxx**: Geometry errors
//!
//! Use [`Error::kind`] to map a variant onto the coarse [`ErrorKind`]
//! taxonomy (format, unsupported compression, traversal, geometry).

use thiserror::Error;

/// Result type for map decoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed container or document
    Format,
    /// A container member uses a compression method other than stored
    UnsupportedCompression,
    /// Dangling reference or unresolvable scope while walking the node graph
    Traversal,
    /// Empty or degenerate geometry where a measurement is required
    Geometry,
}

/// Errors that can occur when decoding a map export
#[derive(Error, Debug)]
pub enum Error {
    /// The byte buffer is not a readable ZIP container
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - No end-of-central-directory record in the buffer
    /// - Bad magic bytes on a central or local header
    /// - Header fields pointing outside the buffer (truncated file)
    /// - Multi-disk or ZIP64 archives
    #[error("[E1001] Invalid container: {0}")]
    InvalidArchive(String),

    /// No member of the container holds a scene document
    ///
    /// **Error Code**: E1002
    #[error("[E1002] Missing container member: {0}")]
    MissingMember(String),

    /// Extracted member content does not match its declared CRC-32
    ///
    /// **Error Code**: E1003
    ///
    /// **Suggestions**:
    /// - The export is corrupt; re-export the map
    #[error("[E1003] Checksum mismatch in '{name}': declared {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch {
        /// Member name
        name: String,
        /// CRC-32 declared by the central directory
        expected: u32,
        /// CRC-32 computed over the extracted content
        actual: u32,
    },

    /// JSON syntax or shape error in the scene document
    ///
    /// **Error Code**: E2001
    #[error("[E2001] Invalid scene document: {0}")]
    Json(#[from] serde_json::Error),

    /// The scene document is structurally incomplete
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - The root document node is missing from the node table
    /// - The `version` field is absent
    #[error("[E2003] Invalid scene document: {0}")]
    InvalidDocument(String),

    /// The scene document declares a format version this decoder does not read
    ///
    /// **Error Code**: E2002
    #[error("[E2002] Unsupported scene document version {0} (expected 1)")]
    UnsupportedVersion(u64),

    /// A node id referenced during traversal is absent from the node table
    ///
    /// **Error Code**: E3001
    #[error("[E3001] Node '{0}' is referenced but not defined")]
    MissingNode(String),

    /// A geometry id referenced during traversal is absent from the geometry table
    ///
    /// **Error Code**: E3002
    #[error("[E3002] Geometry '{geometry}' referenced by node '{node}' is not defined")]
    MissingGeometry {
        /// Referencing node id
        node: String,
        /// Missing geometry id
        geometry: String,
    },

    /// A node needs ancestor metadata that no enclosing group provides
    ///
    /// **Error Code**: E3003
    ///
    /// **Common Causes**:
    /// - A GRID node outside any TEMPLATE (no content bounds)
    /// - A MULTIPOLYGON or SHADOW node outside any GEOMETRY group
    #[error("[E3003] Node '{node}' has no enclosing {scope}")]
    UnresolvedScope {
        /// Node id that performed the lookup
        node: String,
        /// Human-readable name of the missing metadata
        scope: &'static str,
    },

    /// A node was reached twice while walking the graph
    ///
    /// **Error Code**: E3004
    #[error("[E3004] Node '{0}' is reachable more than once (cyclic or shared child)")]
    CycleDetected(String),

    /// Group nesting is deeper than the configured limit
    ///
    /// **Error Code**: E3005
    #[error("[E3005] Group nesting exceeds the limit of {0} levels")]
    DepthLimitExceeded(usize),

    /// A container member uses a compression method other than stored
    ///
    /// **Error Code**: E4001
    #[error("[E4001] Unsupported compression method {method} for member '{name}' (only stored members are supported)")]
    UnsupportedCompression {
        /// Member name
        name: String,
        /// Display name of the declared method
        method: String,
    },

    /// A grid declares a shape other than square
    ///
    /// **Error Code**: E4002
    #[error("[E4002] Node '{node}' uses unsupported grid shape '{shape}'")]
    UnsupportedGrid {
        /// Page or grid node id
        node: String,
        /// Declared shape
        shape: String,
    },

    /// A bounding box was requested over geometry without any points
    ///
    /// **Error Code**: E5001
    #[error("[E5001] Cannot compute bounds of empty geometry: {0}")]
    EmptyGeometry(String),

    /// Numeric input that cannot produce a layout
    ///
    /// **Error Code**: E5002
    #[error("[E5002] Invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl Error {
    /// Map this error onto the coarse [`ErrorKind`] taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArchive(_)
            | Error::MissingMember(_)
            | Error::ChecksumMismatch { .. }
            | Error::Json(_)
            | Error::InvalidDocument(_)
            | Error::UnsupportedVersion(_) => ErrorKind::Format,
            Error::UnsupportedCompression { .. } => ErrorKind::UnsupportedCompression,
            Error::MissingNode(_)
            | Error::MissingGeometry { .. }
            | Error::UnresolvedScope { .. }
            | Error::CycleDetected(_)
            | Error::DepthLimitExceeded(_)
            | Error::UnsupportedGrid { .. } => ErrorKind::Traversal,
            Error::EmptyGeometry(_) | Error::InvalidGeometry(_) => ErrorKind::Geometry,
        }
    }

    /// Create an InvalidArchive error naming the record that failed
    ///
    /// # Arguments
    /// * `record` - The ZIP structure being read (e.g., "central directory header")
    /// * `message` - Description of the error
    pub fn invalid_archive_context(record: &str, message: &str) -> Self {
        Error::InvalidArchive(format!("{}: {}", record, message))
    }

    /// Create an UnresolvedScope error
    pub fn unresolved(node: impl Into<String>, scope: &'static str) -> Self {
        Error::UnresolvedScope {
            node: node.into(),
            scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_in_messages() {
        let err = Error::InvalidArchive("no end of central directory".to_string());
        assert!(err.to_string().contains("[E1001]"));

        let err = Error::UnsupportedVersion(2);
        assert!(err.to_string().contains("[E2002]"));
        assert!(err.to_string().contains("version 2"));

        let err = Error::MissingNode("abc".to_string());
        assert!(err.to_string().contains("[E3001]"));
        assert!(err.to_string().contains("'abc'"));

        let err = Error::UnsupportedCompression {
            name: "map".to_string(),
            method: "DEFLATE".to_string(),
        };
        assert!(err.to_string().contains("[E4001]"));
        assert!(err.to_string().contains("DEFLATE"));

        let err = Error::EmptyGeometry("template 't'".to_string());
        assert!(err.to_string().contains("[E5001]"));
    }

    #[test]
    fn test_checksum_message_formats_hex() {
        let err = Error::ChecksumMismatch {
            name: "map".to_string(),
            expected: 0xdeadbeef,
            actual: 0x1,
        };
        let msg = err.to_string();
        assert!(msg.contains("0xdeadbeef"));
        assert!(msg.contains("0x00000001"));
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::InvalidArchive(String::new()).kind(), ErrorKind::Format);
        assert_eq!(Error::UnsupportedVersion(3).kind(), ErrorKind::Format);
        assert_eq!(
            Error::UnsupportedCompression {
                name: String::new(),
                method: String::new()
            }
            .kind(),
            ErrorKind::UnsupportedCompression
        );
        assert_eq!(Error::CycleDetected(String::new()).kind(), ErrorKind::Traversal);
        assert_eq!(
            Error::UnsupportedGrid {
                node: String::new(),
                shape: "hex".to_string()
            }
            .kind(),
            ErrorKind::Traversal
        );
        assert_eq!(Error::EmptyGeometry(String::new()).kind(), ErrorKind::Geometry);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = Error::from(json_err);
        assert!(err.to_string().contains("[E2001]"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_document_errors_have_distinct_codes() {
        let json_err = Error::from(serde_json::from_str::<u32>("[").unwrap_err());
        let invalid = Error::InvalidDocument("missing 'version' field".to_string());

        assert!(json_err.to_string().starts_with("[E2001]"));
        assert!(invalid.to_string().starts_with("[E2003]"));
        assert_eq!(invalid.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_helpers() {
        let err = Error::invalid_archive_context("local file header", "bad signature");
        assert!(err.to_string().contains("local file header: bad signature"));

        let err = Error::unresolved("grid-1", "content bounds");
        assert!(err.to_string().contains("'grid-1' has no enclosing content bounds"));
        assert_eq!(err.kind(), ErrorKind::Traversal);
    }
}
