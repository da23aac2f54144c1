//! Stateless 2D routines used while walking the scene graph
//!
//! This module provides:
//! - Content bounds of a polygon set
//! - Grid line and dot layout over a rectangle
//! - Wall edge classification and shadow side selection

use crate::error::{Error, Result};
use crate::model::{GridLayout, GridVariant, Point, Polygon, Rect, Segment, StrokeSide};

/// Upper bound on segments or dots in one grid layout
pub const MAX_GRID_ITEMS: usize = 1 << 22;

/// Tolerance when deciding whether the last grid line lands on the far edge
const EDGE_EPSILON: f64 = 1e-9;

/// Orientation of an axis-aligned edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeOrientation {
    /// Both endpoints share a y coordinate
    Horizontal,
    /// Both endpoints share an x coordinate
    Vertical,
}

/// Compute the padded bounds of a polygon set
///
/// Only each polygon's outer ring contributes; holes lie inside it. The
/// exact extent is padded without rounding, so translating every point
/// translates the bounds by the same offset.
///
/// # Arguments
/// * `polygons` - Polygons whose first ring is the outer boundary
/// * `padding` - Distance added on every side
///
/// # Returns
/// The padded rectangle, or [`Error::EmptyGeometry`] if no outer ring has a point
pub fn bounding_box(polygons: &[Polygon], padding: f64) -> Result<Rect> {
    let mut points = polygons
        .iter()
        .filter_map(|polygon| polygon.first())
        .flatten();

    let first = points.next().ok_or_else(|| {
        Error::EmptyGeometry(format!(
            "{} polygon(s) without any outer ring points",
            polygons.len()
        ))
    })?;

    let extent = points.fold(
        Rect::new(first.x, first.y, first.x, first.y),
        |r, p| Rect::new(r.min_x.min(p.x), r.min_y.min(p.y), r.max_x.max(p.x), r.max_y.max(p.y)),
    );

    Ok(extent.pad(padding))
}

/// Lay out a square grid over `bounds`
///
/// The rough variant is recognized but not laid out.
pub fn grid_layout(variant: GridVariant, bounds: Rect, cell_size: f64) -> Result<GridLayout> {
    match variant {
        GridVariant::Lines => grid_lines(bounds, cell_size).map(GridLayout::Lines),
        GridVariant::Dots => grid_dots(bounds, cell_size).map(GridLayout::Dots),
        GridVariant::Rough => {
            check_cell_size(cell_size)?;
            Ok(GridLayout::Unrendered(GridVariant::Rough))
        }
    }
}

/// One segment per column and row, edge to edge
///
/// Columns come first, then rows. The far edges get a line when they fall on
/// the grid.
pub fn grid_lines(bounds: Rect, cell_size: f64) -> Result<Vec<Segment>> {
    check_cell_size(cell_size)?;
    let columns = line_positions(bounds.min_x, bounds.max_x, cell_size)?;
    let rows = line_positions(bounds.min_y, bounds.max_y, cell_size)?;
    check_grid_size(columns.len() + rows.len())?;

    let mut segments = Vec::with_capacity(columns.len() + rows.len());
    segments.extend(
        columns
            .iter()
            .map(|&x| Segment::new(Point::new(x, bounds.min_y), Point::new(x, bounds.max_y))),
    );
    segments.extend(
        rows.iter()
            .map(|&y| Segment::new(Point::new(bounds.min_x, y), Point::new(bounds.max_x, y))),
    );
    Ok(segments)
}

/// One dot per cell origin strictly inside the far edges, column by column
pub fn grid_dots(bounds: Rect, cell_size: f64) -> Result<Vec<Point>> {
    check_cell_size(cell_size)?;
    let columns = origin_positions(bounds.min_x, bounds.max_x, cell_size)?;
    let rows = origin_positions(bounds.min_y, bounds.max_y, cell_size)?;
    check_grid_size(columns.len().saturating_mul(rows.len()))?;

    Ok(columns
        .iter()
        .flat_map(|&x| rows.iter().map(move |&y| Point::new(x, y)))
        .collect())
}

fn check_cell_size(cell_size: f64) -> Result<()> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "grid cell size must be positive and finite, got {}",
            cell_size
        )));
    }
    Ok(())
}

fn step_count(min: f64, max: f64, cell_size: f64) -> Result<Option<usize>> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(Error::InvalidGeometry(format!(
            "grid bounds must be finite, got {}..{}",
            min, max
        )));
    }
    if max < min {
        return Ok(None);
    }
    let steps = (max - min) / cell_size;
    if steps > MAX_GRID_ITEMS as f64 {
        return Err(grid_too_large());
    }
    Ok(Some(steps as usize))
}

/// Positions `min, min + cell, ...` up to and including `max`
fn line_positions(min: f64, max: f64, cell_size: f64) -> Result<Vec<f64>> {
    let Some(whole) = step_count(min, max, cell_size)? else {
        return Ok(Vec::new());
    };
    let mut out: Vec<f64> = (0..=whole).map(|i| min + i as f64 * cell_size).collect();
    // Close the grid when rounding left the far edge just out of reach
    let next = min + (whole + 1) as f64 * cell_size;
    if (next - max).abs() <= EDGE_EPSILON * cell_size.max(1.0) {
        out.push(max);
    }
    Ok(out)
}

/// Positions `min, min + cell, ...` strictly below `max`
fn origin_positions(min: f64, max: f64, cell_size: f64) -> Result<Vec<f64>> {
    let Some(whole) = step_count(min, max, cell_size)? else {
        return Ok(Vec::new());
    };
    Ok((0..=whole)
        .map(|i| min + i as f64 * cell_size)
        .filter(|&v| v < max)
        .collect())
}

fn check_grid_size(items: usize) -> Result<()> {
    if items > MAX_GRID_ITEMS {
        return Err(grid_too_large());
    }
    Ok(())
}

fn grid_too_large() -> Error {
    Error::InvalidGeometry(format!(
        "grid layout would exceed {} items; check the cell size and bounds",
        MAX_GRID_ITEMS
    ))
}

/// Classify an edge as horizontal or vertical
///
/// Returns `None` for diagonal edges and for zero-length edges.
pub fn classify_edge(a: Point, b: Point) -> Option<EdgeOrientation> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    match (dx == 0.0, dy == 0.0) {
        (false, true) => Some(EdgeOrientation::Horizontal),
        (true, false) => Some(EdgeOrientation::Vertical),
        _ => None,
    }
}

/// Choose the side of an axis-aligned wall its shadow is drawn on
///
/// Horizontal walls running towards +x and vertical walls running towards
/// -y put the stroke [`StrokeSide::Outside`]; the opposite directions put it
/// [`StrokeSide::Inside`]. For a ring of consistent winding this keeps every
/// shadow on the same side of the wall. Swapping the endpoints always flips
/// the result.
///
/// Returns `None` when the edge is not axis-aligned.
pub fn edge_alignment(a: Point, b: Point) -> Option<StrokeSide> {
    let side = match classify_edge(a, b)? {
        EdgeOrientation::Horizontal => {
            if a.x < b.x {
                StrokeSide::Outside
            } else {
                StrokeSide::Inside
            }
        }
        EdgeOrientation::Vertical => {
            if a.y < b.y {
                StrokeSide::Inside
            } else {
                StrokeSide::Outside
            }
        }
    };
    Some(side)
}

/// Consecutive point pairs of a ring, including the closing edge
///
/// A ring whose last point repeats its first is already closed and gets no
/// extra edge.
pub fn ring_edges(ring: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let closing = match (ring.first(), ring.last()) {
        (Some(&first), Some(&last)) if ring.len() > 2 && first != last => Some((last, first)),
        _ => None,
    };
    ring.windows(2).map(|w| (w[0], w[1])).chain(closing)
}
