//! Data structures for scene documents and decoded scenes

mod config;
mod document;
mod geometry;
mod node;
mod scene;

pub use config::{DEFAULT_CANVAS_EXTENT, DEFAULT_MAX_DEPTH, DEFAULT_MEMBER_NAME, DecoderConfig};

pub use document::{DOCUMENT_NODE_ID, SUPPORTED_VERSION, SceneDocument};
pub(crate) use document::MapFile;

pub use geometry::{Geometry, Point, Polygon, Rect, Ring};

pub use node::{
    AssetGroupNode, CleanGridOptions, Color, DocumentNode, DotsGridOptions, DotsOptions,
    FillStyle, GeometryId, GeometryNode, GridNode, GridStyle, GridVariant, GroupNode, Lighting,
    LinesOptions, MultiPolygonNode, Node, NodeHeader, NodeId, PageBackground, PageGrid, PageNode,
    RoughGridOptions, Roughness, SQUARE_GRID, ShadowNode, SharedGridOptions, StrokeStyle,
    TemplateNode, TemplateLinks, Texture,
};

pub use scene::{
    Drawable, DrawablePrimitive, GridLayout, Group, GroupKind, PolygonShape, Scene, Segment,
    Stroke, StrokeSide,
};
