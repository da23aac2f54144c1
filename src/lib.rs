//! # dsmap
//!
//! A pure Rust decoder for Dungeon Scrawl map exports.
//!
//! A map export is a ZIP container holding a JSON scene document. This
//! library extracts the document, decodes it into typed nodes and geometry,
//! and walks the scene graph into an ordered list of renderer-agnostic
//! drawable primitives.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Bounds-checked ZIP reader for stored members with CRC-32 verification
//! - Typed scene document model with serde
//! - Scene graph walker with scoped metadata, cycle detection and depth limits
//! - Grid layout, bounding boxes and wall shadow classification
//!
//! ## Example
//!
//! ```no_run
//! use dsmap::Scene;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("dungeon.ds")?;
//! let scene = Scene::from_bytes(&bytes)?;
//!
//! println!(
//!     "{} primitives, background #{:06x}",
//!     scene.primitives.len(),
//!     scene.background_color
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline stages are also available separately:
//!
//! ```no_run
//! use dsmap::archive::Archive;
//! use dsmap::{SceneDocument, walker};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("dungeon.ds")?;
//! let archive = Archive::read(&bytes)?;
//! let json = archive.content("map").ok_or("no map member")?;
//! let document = SceneDocument::from_json(json)?;
//! let scene = walker::build(&document)?;
//! # let _ = scene;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod archive;
pub mod error;
pub mod geometry_ops;
pub mod model;
pub mod parser;
pub mod walker;

pub use archive::{Archive, ArchiveEntry, CompressionMethod};
pub use error::{Error, ErrorKind, Result};
pub use model::{
    Color, DecoderConfig, Drawable, DrawablePrimitive, Geometry, GeometryId, GridLayout,
    GridVariant, Group, GroupKind, Node, NodeId, Point, Polygon, PolygonShape, Rect, Ring, Scene,
    SceneDocument, Segment, Stroke, StrokeSide,
};
pub use parser::{parse_map, parse_map_with_config};
pub use walker::GraphWalker;
