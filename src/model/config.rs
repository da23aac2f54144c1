//! Decoder configuration

use super::geometry::Rect;

/// Name of the container member holding the scene document
pub const DEFAULT_MEMBER_NAME: &str = "map";

/// Half-extent of the default background canvas on each axis
pub const DEFAULT_CANVAS_EXTENT: f64 = 1024.0;

/// Default limit on nested groups
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Settings for one decode
///
/// # Example
///
/// ```
/// use dsmap::{DecoderConfig, Rect};
///
/// let config = DecoderConfig::new()
///     .with_member_name("scene.json")
///     .with_canvas(Rect::new(0.0, 0.0, 512.0, 512.0))
///     .with_checksum_verification(false);
/// assert_eq!(config.member_name(), "scene.json");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    member_name: String,
    verify_checksums: bool,
    canvas: Rect,
    max_depth: usize,
}

impl DecoderConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            member_name: DEFAULT_MEMBER_NAME.to_string(),
            verify_checksums: true,
            canvas: Rect::new(
                -DEFAULT_CANVAS_EXTENT,
                -DEFAULT_CANVAS_EXTENT,
                DEFAULT_CANVAS_EXTENT,
                DEFAULT_CANVAS_EXTENT,
            ),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Member to read the scene document from
    ///
    /// When the container has no member with this name, the first member
    /// whose content looks like a JSON object is used instead.
    pub fn with_member_name(mut self, name: impl Into<String>) -> Self {
        self.member_name = name.into();
        self
    }

    /// Enable or disable CRC-32 verification of extracted members
    pub fn with_checksum_verification(mut self, enabled: bool) -> Self {
        self.verify_checksums = enabled;
        self
    }

    /// Area covered by the page background grid
    pub fn with_canvas(mut self, canvas: Rect) -> Self {
        self.canvas = canvas;
        self
    }

    /// Maximum number of simultaneously open groups
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    pub fn verify_checksums(&self) -> bool {
        self.verify_checksums
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.member_name(), "map");
        assert!(config.verify_checksums());
        assert_eq!(config.canvas().width(), 2048.0);
        assert_eq!(config.max_depth(), 256);
    }

    #[test]
    fn test_builder() {
        let config = DecoderConfig::new().with_max_depth(4).with_checksum_verification(false);
        assert_eq!(config.max_depth(), 4);
        assert!(!config.verify_checksums());
    }
}
