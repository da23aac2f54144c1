//! Render-agnostic output of a decode

use super::geometry::{Point, Rect, Ring};
use super::node::{Color, GridVariant, NodeId};
use serde::{Deserialize, Serialize};

/// A straight segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    /// Create a segment between two points
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Laid-out grid geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "camelCase")]
pub enum GridLayout {
    /// One segment per column and row
    Lines(Vec<Segment>),
    /// One dot centre per cell origin
    Dots(Vec<Point>),
    /// A hidden grid, or a variant this crate recognizes but does not lay out
    Unrendered(GridVariant),
}

impl GridLayout {
    /// Number of segments or dots
    pub fn len(&self) -> usize {
        match self {
            GridLayout::Lines(segments) => segments.len(),
            GridLayout::Dots(dots) => dots.len(),
            GridLayout::Unrendered(_) => 0,
        }
    }

    /// Whether nothing would be drawn
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Side of a wall a shadow stroke sits on, relative to the wall's direction
///
/// Maps onto the stroke alignment convention where `1.0` draws entirely
/// inside the path and `0.0` entirely outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeSide {
    Inside,
    Outside,
}

impl StrokeSide {
    /// Numeric stroke alignment
    pub fn alignment(self) -> f64 {
        match self {
            StrokeSide::Inside => 1.0,
            StrokeSide::Outside => 0.0,
        }
    }
}

/// Stroke of a polygon outline; corners are drawn round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub colour: Color,
    pub width: f64,
}

/// A filled, stroked or masking polygon with holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonShape {
    /// Closed outer boundary
    pub outer: Ring,
    /// Rings cut out of the outer boundary
    pub holes: Vec<Ring>,
    /// Fill, when the fill style is visible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    /// Stroke, when the stroke style is visible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    /// Apply as an inverse mask on the enclosing group instead of drawing
    pub mask: bool,
}

/// One renderer instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrawablePrimitive {
    /// The page background grid spanning the whole canvas
    #[serde(rename_all = "camelCase")]
    Background {
        variant: GridVariant,
        bounds: Rect,
        cell_diameter: f64,
        colour: Color,
        /// Line width or dot radius, per variant
        size: f64,
        layout: GridLayout,
    },
    /// A GRID node drawn as lines over the content bounds
    #[serde(rename_all = "camelCase")]
    GridLines {
        bounds: Rect,
        cell_diameter: f64,
        colour: Color,
        width: f64,
        segments: Vec<Segment>,
    },
    /// A GRID node drawn as dots over the content bounds
    #[serde(rename_all = "camelCase")]
    GridDots {
        bounds: Rect,
        cell_diameter: f64,
        colour: Color,
        radius: f64,
        dots: Vec<Point>,
    },
    /// A polygon from a MULTIPOLYGON node
    Polygon(PolygonShape),
    /// One directional shadow stroke along an axis-aligned wall
    ShadowSegment {
        segment: Segment,
        width: f64,
        side: StrokeSide,
        colour: Color,
    },
}

impl DrawablePrimitive {
    /// Short variant name, used in logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            DrawablePrimitive::Background { .. } => "background",
            DrawablePrimitive::GridLines { .. } => "gridLines",
            DrawablePrimitive::GridDots { .. } => "gridDots",
            DrawablePrimitive::Polygon(_) => "polygon",
            DrawablePrimitive::ShadowSegment { .. } => "shadowSegment",
        }
    }
}

/// A primitive plus where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawable {
    /// Node that produced the primitive
    pub node: NodeId,
    /// Index into [`Scene::groups`] of the enclosing group
    pub group: usize,
    /// Opacity of the producing node
    pub alpha: f64,
    /// Visibility of the producing node
    pub visible: bool,
    pub primitive: DrawablePrimitive,
}

/// Kind of node a [`Group`] was opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKind {
    Page,
    Folder,
    Template,
    Geometry,
}

/// A container in the output tree
///
/// Groups are listed parent-before-child; masks attached to a group apply to
/// everything drawn inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub node: NodeId,
    pub kind: GroupKind,
    pub name: String,
    /// Index of the enclosing group; `None` for the page
    pub parent: Option<usize>,
    pub alpha: f64,
    pub visible: bool,
}

/// Result of decoding one map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Primitives in painter's order
    pub primitives: Vec<Drawable>,
    /// Containers referenced by [`Drawable::group`]
    pub groups: Vec<Group>,
    /// Packed `0xRRGGBB` page background colour
    pub background_color: u32,
}

impl Scene {
    /// Decode a map export with the default configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dsmap::Scene;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let bytes = std::fs::read("castle.ds")?;
    /// let scene = Scene::from_bytes(&bytes)?;
    /// println!("{} primitives", scene.primitives.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_bytes(buffer: &[u8]) -> crate::Result<Self> {
        crate::parser::parse_map(buffer)
    }

    /// Decode a map export with a custom configuration
    pub fn from_bytes_with_config(
        buffer: &[u8],
        config: &super::DecoderConfig,
    ) -> crate::Result<Self> {
        crate::parser::parse_map_with_config(buffer, config)
    }

    /// A group by index
    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Primitives produced by one node
    pub fn primitives_of_node<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a Drawable> {
        self.primitives
            .iter()
            .filter(move |d| d.node.as_str() == node)
    }

    /// Masking polygons attached to a group
    pub fn masks(&self, group: usize) -> impl Iterator<Item = &PolygonShape> {
        self.primitives.iter().filter_map(move |d| match &d.primitive {
            DrawablePrimitive::Polygon(shape) if shape.mask && d.group == group => Some(shape),
            _ => None,
        })
    }
}
