//! Scene graph node types
//!
//! Field names follow the export's camelCase JSON keys. Every field the
//! decoder does not strictly need has a default so hand-written or older
//! documents still decode.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a node in the scene graph
///
/// Exports use UUID strings; the decoder treats them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Identifier of an entry in the geometry table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Create an id from anything string-like
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(NodeId);
string_id!(GeometryId);

fn default_alpha() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_square() -> String {
    SQUARE_GRID.to_string()
}

/// The only grid shape the decoder lays out
pub const SQUARE_GRID: &str = "square";

/// Bits of a packed colour that carry `0xRRGGBB`
pub const RGB_MASK: u32 = 0xFF_FFFF;

/// A 24-bit RGB colour with opacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Packed `0xRRGGBB`
    #[serde(rename = "colour")]
    pub rgb: u32,
    /// Opacity in `0.0..=1.0`
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Color {
    /// Create an opaque colour
    pub fn opaque(rgb: u32) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    /// The packed value with any bits above `0xRRGGBB` cleared
    pub fn rgb24(self) -> u32 {
        self.rgb & RGB_MASK
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::opaque(0x000000)
    }
}

/// Fields shared by every node variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeHeader {
    /// Node id; matches the key in the node table
    pub id: NodeId,
    /// Enclosing group; absent for pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Node opacity
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Visibility toggle
    #[serde(default = "default_true")]
    pub visible: bool,
}

/// The synthetic root of the node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    /// Root id, normally `"document"`
    pub id: NodeId,
    /// Page to decode
    pub selected_page: NodeId,
    /// Document title
    #[serde(default)]
    pub name: String,
    /// All pages of the document
    #[serde(default)]
    pub children: Vec<NodeId>,
}

/// Grid variant of a page background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridVariant {
    /// Straight lines along every column and row
    #[default]
    Lines,
    /// One dot per cell origin
    Dots,
    /// Hand-drawn lines; recognized but not laid out
    Rough,
}

/// Width option of a lines grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinesOptions {
    /// Stroke width
    pub width: f64,
}

impl Default for LinesOptions {
    fn default() -> Self {
        Self { width: 1.0 }
    }
}

/// Radius option of a dots grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotsOptions {
    /// Dot radius
    pub radius: f64,
}

impl Default for DotsOptions {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

/// Colour option shared by all page grid variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SharedGridOptions {
    /// Grid colour
    #[serde(default)]
    pub colour: Color,
}

/// Page-level grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGrid {
    /// Grid shape; only `"square"` is supported
    #[serde(rename = "type", default = "default_square")]
    pub shape: String,
    /// Cell size in map units
    pub cell_diameter: f64,
    /// Line, dot or rough rendering
    #[serde(default)]
    pub variant: GridVariant,
    /// Whether the background grid is drawn
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Dot radius for the dots variant
    #[serde(default)]
    pub dots_options: DotsOptions,
    /// Line width for the lines variant
    #[serde(default)]
    pub lines_options: LinesOptions,
    /// Colour for every variant
    #[serde(default)]
    pub shared_options: SharedGridOptions,
}

/// Page background
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PageBackground {
    /// Fill colour behind everything else
    #[serde(default)]
    pub colour: Color,
}

/// Page lighting settings, carried but not interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Lighting {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ambient_light: Color,
    #[serde(default)]
    pub blur: f64,
}

/// Page texture settings, carried but not interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Texture {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub scale: f64,
    #[serde(default)]
    pub alpha: f64,
}

/// A page: the root of one drawable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub children: Vec<NodeId>,
    pub grid: PageGrid,
    #[serde(default)]
    pub background: PageBackground,
    #[serde(default)]
    pub lighting: Lighting,
    #[serde(default)]
    pub texture: Texture,
}

/// FOLDER, IMAGES: grouping only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

/// ASSET_GROUP: a group of placed assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetGroupNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub children: Vec<NodeId>,
    /// Affine transform of the group
    #[serde(default)]
    pub transform: Vec<f64>,
}

/// Node references of a classic dungeon template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLinks {
    /// Template flavour, e.g. `"CLASSIC"`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// GEOMETRY node whose shape defines the content bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dungeon_shape: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walls: Option<NodeId>,
}

/// TEMPLATE: a group that defines the page's content bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateLinks>,
}

/// GEOMETRY: a group scoping descendants to one geometry table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default)]
    pub children: Vec<NodeId>,
    pub geometry_id: GeometryId,
    #[serde(default)]
    pub background_effect: serde_json::Map<String, serde_json::Value>,
}

/// Rendering style of a GRID node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// Straight lines
    #[default]
    Clean,
    /// Hand-drawn lines; recognized but not laid out
    Rough,
    /// Dots at cell origins
    Dots,
}

/// Stroke settings of a clean grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CleanGridOptions {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub colour: Color,
}

/// Dot settings of a dots grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DotsGridOptions {
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub colour: Color,
}

/// Noise parameters of the hand-drawn grid style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Roughness {
    pub segment_size_min: f64,
    pub segment_size_max: f64,
    pub segment_skip_scale: f64,
    pub no_dot_rate: f64,
    pub scribble_scale: f64,
    pub scribble_amplitude: f64,
    pub shift_rate: f64,
    pub shift_amount_min: f64,
    pub shift_amount_max: f64,
    pub major_noise_scale: f64,
    pub major_noise_amplitude: f64,
    pub major_noise_shift: f64,
}

/// Stroke settings of a rough grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RoughGridOptions {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub colour: Color,
    #[serde(default)]
    pub roughness: Roughness,
}

/// GRID: a grid drawn over the page's content bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    #[serde(default = "default_square")]
    pub grid_type: String,
    #[serde(default)]
    pub variant: GridStyle,
    #[serde(default)]
    pub clean_options: CleanGridOptions,
    #[serde(default)]
    pub rough_options: RoughGridOptions,
    #[serde(default)]
    pub dots_options: DotsGridOptions,
}

/// Fill style of a MULTIPOLYGON
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FillStyle {
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub colour: Color,
}

/// Stroke style of a MULTIPOLYGON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub colour: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rough_options: Option<serde_json::Value>,
}

/// MULTIPOLYGON: filled and stroked shapes from the enclosing geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPolygonNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    /// Apply as an inverse mask on the enclosing group instead of drawing
    #[serde(default)]
    pub mask: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,
    #[serde(default)]
    pub stroke: StrokeStyle,
    #[serde(default)]
    pub fill: FillStyle,
}

/// SHADOW: directional strokes along axis-aligned walls of the enclosing geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    /// Thickness applied to vertical edges
    #[serde(default)]
    pub tx: f64,
    /// Thickness applied to horizontal edges
    #[serde(default)]
    pub ty: f64,
    #[serde(default)]
    pub colour: Color,
}

/// A scene graph node, discriminated by its `type` tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Node {
    Page(PageNode),
    Folder(GroupNode),
    Template(TemplateNode),
    Geometry(GeometryNode),
    Grid(GridNode),
    Multipolygon(MultiPolygonNode),
    Shadow(ShadowNode),
    AssetGroup(AssetGroupNode),
    Images(GroupNode),
}

impl Node {
    /// Shared header fields
    pub fn header(&self) -> &NodeHeader {
        match self {
            Node::Page(n) => &n.header,
            Node::Folder(n) | Node::Images(n) => &n.header,
            Node::Template(n) => &n.header,
            Node::Geometry(n) => &n.header,
            Node::Grid(n) => &n.header,
            Node::Multipolygon(n) => &n.header,
            Node::Shadow(n) => &n.header,
            Node::AssetGroup(n) => &n.header,
        }
    }

    /// Node id
    pub fn id(&self) -> &NodeId {
        &self.header().id
    }

    /// Child ids; empty for leaf variants
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Page(n) => &n.children,
            Node::Folder(n) | Node::Images(n) => &n.children,
            Node::Template(n) => &n.children,
            Node::Geometry(n) => &n.children,
            Node::AssetGroup(n) => &n.children,
            Node::Grid(_) | Node::Multipolygon(_) | Node::Shadow(_) => &[],
        }
    }

    /// The `type` tag as written in the export
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Page(_) => "PAGE",
            Node::Folder(_) => "FOLDER",
            Node::Template(_) => "TEMPLATE",
            Node::Geometry(_) => "GEOMETRY",
            Node::Grid(_) => "GRID",
            Node::Multipolygon(_) => "MULTIPOLYGON",
            Node::Shadow(_) => "SHADOW",
            Node::AssetGroup(_) => "ASSET_GROUP",
            Node::Images(_) => "IMAGES",
        }
    }
}
