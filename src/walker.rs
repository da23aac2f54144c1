//! Scene graph traversal
//!
//! The walker starts at the document's selected page and visits nodes depth
//! first in declared child order, which is also the painter's order of the
//! emitted primitives. Grouping nodes push a frame onto an explicit stack;
//! each frame owns a cursor into its children and the metadata the group
//! introduces (page id and cell size, content bounds, geometry id).
//! Descendants resolve metadata by searching the stack from the top, so the
//! nearest ancestor that sets a value wins. A frame is popped once its
//! cursor has passed its last child.

use crate::error::{Error, Result};
use crate::geometry_ops::{
    EdgeOrientation, bounding_box, classify_edge, edge_alignment, grid_dots, grid_layout,
    grid_lines, ring_edges,
};
use crate::model::{
    DecoderConfig, Drawable, DrawablePrimitive, Geometry, GeometryId, GeometryNode, GridLayout,
    GridNode, GridStyle, GridVariant, Group, GroupKind, MultiPolygonNode, Node, NodeHeader, NodeId,
    PageNode, PolygonShape, Rect, SQUARE_GRID, Scene, SceneDocument, Segment, ShadowNode, Stroke,
    TemplateNode,
};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Metadata a group makes visible to its descendants
#[derive(Debug, Clone, Copy, Default)]
struct ScopeMetadata<'a> {
    page: Option<&'a NodeId>,
    cell_diameter: Option<f64>,
    bounds: Option<Rect>,
    geometry: Option<&'a GeometryId>,
}

#[derive(Debug)]
struct Frame<'a> {
    node: &'a NodeId,
    group: usize,
    children: &'a [NodeId],
    next: usize,
    scope: ScopeMetadata<'a>,
}

/// Walks a [`SceneDocument`] and collects its drawable primitives
///
/// # Example
///
/// ```
/// use dsmap::{DecoderConfig, GraphWalker, SceneDocument};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let json = br#"{"version":1,"state":{"document":{"documentNodeId":"document","nodes":{
///     "document":{"id":"document","selectedPage":"P"},
///     "P":{"type":"PAGE","id":"P","grid":{"cellDiameter":64,"variant":"lines"}}}}},
///     "data":{"geometry":{}}}"#;
/// let document = SceneDocument::from_json(json)?;
/// let config = DecoderConfig::default();
/// let mut walker = GraphWalker::new(&document, &config);
/// let scene = walker.walk()?;
/// assert_eq!(scene.primitives.len(), 1);
/// assert_eq!(walker.open_frames(), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GraphWalker<'a> {
    document: &'a SceneDocument,
    config: &'a DecoderConfig,
    frames: Vec<Frame<'a>>,
    visited: HashSet<&'a str>,
    scene: Scene,
    background: Option<u32>,
}

/// Walk a document with the default configuration
pub fn build(document: &SceneDocument) -> Result<Scene> {
    let config = DecoderConfig::default();
    GraphWalker::new(document, &config).walk()
}

impl<'a> GraphWalker<'a> {
    /// Create a walker over `document`
    pub fn new(document: &'a SceneDocument, config: &'a DecoderConfig) -> Self {
        Self {
            document,
            config,
            frames: Vec::new(),
            visited: HashSet::new(),
            scene: Scene::default(),
            background: None,
        }
    }

    /// Number of groups currently open
    pub fn open_frames(&self) -> usize {
        self.frames.len()
    }

    /// Walk from the selected page and return the collected scene
    ///
    /// Any dangling reference or unresolvable scope aborts the walk. The
    /// frame stack is empty again when this returns, on success or failure.
    pub fn walk(&mut self) -> Result<Scene> {
        self.frames.clear();
        self.visited.clear();
        self.scene = Scene::default();
        self.background = None;

        if let Err(e) = self.traverse() {
            debug!(open_frames = self.frames.len(), error = %e, "scene graph walk aborted");
            self.frames.clear();
            return Err(e);
        }

        let mut scene = std::mem::take(&mut self.scene);
        scene.background_color = self.background.unwrap_or_default();
        debug!(
            primitives = scene.primitives.len(),
            groups = scene.groups.len(),
            "scene graph walk complete"
        );
        Ok(scene)
    }

    fn traverse(&mut self) -> Result<()> {
        let page = self.document.selected_page();
        debug!(page = %page, "walking scene graph");
        self.visit(page)?;

        while let Some(frame) = self.frames.last_mut() {
            let children = frame.children;
            let Some(child) = children.get(frame.next) else {
                trace!(group = %frame.node, "closing group");
                self.frames.pop();
                continue;
            };
            frame.next += 1;
            self.visit(child)?;
        }
        Ok(())
    }

    fn visit(&mut self, id: &'a NodeId) -> Result<()> {
        let document = self.document;
        let node = document
            .nodes
            .get(id)
            .ok_or_else(|| Error::MissingNode(id.to_string()))?;
        if !self.visited.insert(id.as_str()) {
            return Err(Error::CycleDetected(id.to_string()));
        }

        if let (Some(frame), Some(parent)) = (self.frames.last(), &node.header().parent_id) {
            if parent != frame.node {
                debug!(
                    node = %id,
                    parent = %parent,
                    open_group = %frame.node,
                    "dropping node whose parent is not the open group"
                );
                return Ok(());
            }
        }

        trace!(node = %id, kind = node.type_name(), "visiting node");
        match node {
            Node::Page(page) => self.visit_page(page),
            Node::Folder(folder) => self.open_group(
                &folder.header,
                GroupKind::Folder,
                &folder.children,
                ScopeMetadata::default(),
            ),
            Node::Template(template) => self.visit_template(template),
            Node::Geometry(geometry) => self.visit_geometry(geometry),
            Node::Grid(grid) => self.visit_grid(grid),
            Node::Multipolygon(polygon) => self.visit_multipolygon(polygon),
            Node::Shadow(shadow) => self.visit_shadow(shadow),
            Node::AssetGroup(_) | Node::Images(_) => {
                debug!(node = %id, kind = node.type_name(), "skipping node without drawable output");
                Ok(())
            }
        }
    }

    fn open_group(
        &mut self,
        header: &'a NodeHeader,
        kind: GroupKind,
        children: &'a [NodeId],
        scope: ScopeMetadata<'a>,
    ) -> Result<()> {
        if self.frames.len() >= self.config.max_depth() {
            return Err(Error::DepthLimitExceeded(self.config.max_depth()));
        }

        let group = self.scene.groups.len();
        self.scene.groups.push(Group {
            node: header.id.clone(),
            kind,
            name: header.name.clone(),
            parent: self.frames.last().map(|f| f.group),
            alpha: header.alpha,
            visible: header.visible,
        });
        self.frames.push(Frame {
            node: &header.id,
            group,
            children,
            next: 0,
            scope,
        });
        Ok(())
    }

    fn lookup<T>(&self, pick: impl Fn(&ScopeMetadata<'a>) -> Option<T>) -> Option<T> {
        self.frames.iter().rev().find_map(|frame| pick(&frame.scope))
    }

    fn emit(&mut self, header: &NodeHeader, primitive: DrawablePrimitive) -> Result<()> {
        let group = self
            .frames
            .last()
            .map(|f| f.group)
            .ok_or_else(|| Error::unresolved(header.id.as_str(), "group"))?;
        trace!(node = %header.id, kind = primitive.kind(), group, "emitting primitive");
        self.scene.primitives.push(Drawable {
            node: header.id.clone(),
            group,
            alpha: header.alpha,
            visible: header.visible,
            primitive,
        });
        Ok(())
    }

    fn visit_page(&mut self, page: &'a PageNode) -> Result<()> {
        let grid = &page.grid;
        if grid.shape != SQUARE_GRID {
            return Err(Error::UnsupportedGrid {
                node: page.header.id.to_string(),
                shape: grid.shape.clone(),
            });
        }

        self.background.get_or_insert(page.background.colour.rgb24());
        self.open_group(
            &page.header,
            GroupKind::Page,
            &page.children,
            ScopeMetadata {
                page: Some(&page.header.id),
                cell_diameter: Some(grid.cell_diameter),
                ..ScopeMetadata::default()
            },
        )?;

        let canvas = self.config.canvas();
        let layout = if grid.visible {
            grid_layout(grid.variant, canvas, grid.cell_diameter)?
        } else {
            GridLayout::Unrendered(grid.variant)
        };
        let size = match grid.variant {
            GridVariant::Dots => grid.dots_options.radius,
            GridVariant::Lines | GridVariant::Rough => grid.lines_options.width,
        };

        self.emit(
            &page.header,
            DrawablePrimitive::Background {
                variant: grid.variant,
                bounds: canvas,
                cell_diameter: grid.cell_diameter,
                colour: grid.shared_options.colour,
                size,
                layout,
            },
        )
    }

    fn visit_template(&mut self, template: &'a TemplateNode) -> Result<()> {
        let bounds = self.template_bounds(template)?;
        self.open_group(
            &template.header,
            GroupKind::Template,
            &template.children,
            ScopeMetadata {
                bounds,
                ..ScopeMetadata::default()
            },
        )
    }

    /// Content bounds from the template's dungeon shape, padded by one cell
    fn template_bounds(&self, template: &'a TemplateNode) -> Result<Option<Rect>> {
        let id = &template.header.id;
        let Some(shape_id) = template
            .template
            .as_ref()
            .and_then(|links| links.dungeon_shape.as_ref())
        else {
            return Ok(None);
        };

        let cell = self
            .lookup(|s| s.cell_diameter)
            .ok_or_else(|| Error::unresolved(id.as_str(), "page cell diameter"))?;
        let shape = self
            .document
            .node(shape_id.as_str())
            .ok_or_else(|| Error::MissingNode(shape_id.to_string()))?;
        let Node::Geometry(shape) = shape else {
            return Err(Error::unresolved(id.as_str(), "dungeon shape GEOMETRY node"));
        };
        let geometry = self.geometry(id, &shape.geometry_id)?;

        let bounds = bounding_box(&geometry.polygons, cell).map_err(|e| match e {
            Error::EmptyGeometry(msg) => {
                Error::EmptyGeometry(format!("dungeon shape of template '{}': {}", id, msg))
            }
            other => other,
        })?;
        debug!(template = %id, ?bounds, "computed content bounds");
        Ok(Some(bounds))
    }

    fn visit_geometry(&mut self, geometry: &'a GeometryNode) -> Result<()> {
        self.open_group(
            &geometry.header,
            GroupKind::Geometry,
            &geometry.children,
            ScopeMetadata {
                geometry: Some(&geometry.geometry_id),
                ..ScopeMetadata::default()
            },
        )
    }

    fn visit_grid(&mut self, grid: &'a GridNode) -> Result<()> {
        let id = &grid.header.id;
        if grid.grid_type != SQUARE_GRID {
            return Err(Error::UnsupportedGrid {
                node: id.to_string(),
                shape: grid.grid_type.clone(),
            });
        }

        let page = self
            .lookup(|s| s.page)
            .ok_or_else(|| Error::unresolved(id.as_str(), "page"))?;
        if !matches!(self.document.node(page.as_str()), Some(Node::Page(_))) {
            return Err(Error::MissingNode(page.to_string()));
        }
        let bounds = self
            .lookup(|s| s.bounds)
            .ok_or_else(|| Error::unresolved(id.as_str(), "template content bounds"))?;
        let cell = self
            .lookup(|s| s.cell_diameter)
            .ok_or_else(|| Error::unresolved(id.as_str(), "page cell diameter"))?;

        let primitive = match grid.variant {
            GridStyle::Clean => DrawablePrimitive::GridLines {
                bounds,
                cell_diameter: cell,
                colour: grid.clean_options.colour,
                width: grid.clean_options.width,
                segments: grid_lines(bounds, cell)?,
            },
            GridStyle::Dots => DrawablePrimitive::GridDots {
                bounds,
                cell_diameter: cell,
                colour: grid.dots_options.colour,
                radius: grid.dots_options.radius,
                dots: grid_dots(bounds, cell)?,
            },
            GridStyle::Rough => {
                debug!(node = %id, "rough grids are not laid out");
                return Ok(());
            }
        };
        self.emit(&grid.header, primitive)
    }

    /// Geometry of the nearest enclosing GEOMETRY group
    fn scoped_geometry(&self, node: &NodeId) -> Result<&'a Geometry> {
        let geometry_id = self
            .lookup(|s| s.geometry)
            .ok_or_else(|| Error::unresolved(node.as_str(), "GEOMETRY group"))?;
        self.geometry(node, geometry_id)
    }

    fn geometry(&self, node: &NodeId, geometry_id: &GeometryId) -> Result<&'a Geometry> {
        self.document
            .geometry(geometry_id.as_str())
            .ok_or_else(|| Error::MissingGeometry {
                node: node.to_string(),
                geometry: geometry_id.to_string(),
            })
    }

    fn visit_multipolygon(&mut self, node: &'a MultiPolygonNode) -> Result<()> {
        let geometry = self.scoped_geometry(&node.header.id)?;
        let fill = node.fill.visible.then_some(node.fill.colour);
        let stroke = node.stroke.visible.then_some(Stroke {
            colour: node.stroke.colour,
            width: node.stroke.width,
        });

        for polygon in &geometry.polygons {
            let Some((outer, holes)) = polygon.split_first() else {
                continue;
            };
            if outer.is_empty() {
                continue;
            }
            self.emit(
                &node.header,
                DrawablePrimitive::Polygon(PolygonShape {
                    outer: outer.clone(),
                    holes: holes.to_vec(),
                    fill,
                    stroke,
                    mask: node.mask,
                }),
            )?;
        }
        Ok(())
    }

    fn visit_shadow(&mut self, node: &'a ShadowNode) -> Result<()> {
        let geometry = self.scoped_geometry(&node.header.id)?;

        for ring in geometry.polygons.iter().flatten() {
            for (from, to) in ring_edges(ring) {
                // Diagonal walls cast no shadow
                let Some(orientation) = classify_edge(from, to) else {
                    continue;
                };
                let width = match orientation {
                    EdgeOrientation::Horizontal => node.ty,
                    EdgeOrientation::Vertical => node.tx,
                };
                if !width.is_finite() || width <= 0.0 {
                    continue;
                }
                let Some(side) = edge_alignment(from, to) else {
                    continue;
                };
                self.emit(
                    &node.header,
                    DrawablePrimitive::ShadowSegment {
                        segment: Segment::new(from, to),
                        width,
                        side,
                        colour: node.colour,
                    },
                )?;
            }
        }
        Ok(())
    }
}
