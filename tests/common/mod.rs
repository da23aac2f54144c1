//! Shared fixtures for integration tests
//!
//! Map exports are built in memory with the `zip` crate so every test owns
//! the exact bytes it decodes.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Build a ZIP container whose members are all stored uncompressed
pub fn stored_zip(members: &[(&str, &[u8])]) -> Vec<u8> {
    build_zip(members, CompressionMethod::Stored)
}

/// Build a ZIP container whose members are all deflated
pub fn deflated_zip(members: &[(&str, &[u8])]) -> Vec<u8> {
    build_zip(members, CompressionMethod::Deflated)
}

fn build_zip(members: &[(&str, &[u8])], method: CompressionMethod) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default().compression_method(method);
        for (name, content) in members {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

/// Wrap a node table and geometry table in the export layout
///
/// The document node is added automatically and selects `selected_page`.
pub fn map_json(selected_page: &str, mut nodes: Value, geometry: Value) -> Value {
    nodes["document"] = json!({ "id": "document", "selectedPage": selected_page });
    json!({
        "version": 1,
        "state": { "document": { "documentNodeId": "document", "nodes": nodes } },
        "data": { "geometry": geometry }
    })
}

/// A page with a visible lines grid
pub fn page(id: &str, cell: f64, background: u32, children: &[&str]) -> Value {
    json!({
        "type": "PAGE",
        "id": id,
        "children": children,
        "alpha": 1,
        "background": { "colour": { "colour": background, "alpha": 1 } },
        "grid": {
            "type": "square",
            "cellDiameter": cell,
            "variant": "lines",
            "visible": true,
            "linesOptions": { "width": 1 },
            "dotsOptions": { "radius": 1 },
            "sharedOptions": { "colour": { "colour": 0x808080, "alpha": 0.5 } }
        }
    })
}

/// A closed axis-aligned rectangle as a single-ring polygon
pub fn rect_polygon(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
    json!([[[x0, y0], [x1, y0], [x1, y1], [x0, y1]]])
}

/// The single-page document used by the end-to-end check
pub fn single_page_map() -> Value {
    map_json(
        "P",
        json!({ "P": page("P", 10.0, 0x112233, &[]) }),
        json!({}),
    )
}

/// A template with a 40x30 room, its walls, shadows and a clean grid
///
/// Tree: `P > T > S(GEOMETRY g1) > [MP, SH]`, then `T > GR`.
/// The room has one square hole.
pub fn dungeon_map() -> Value {
    let nodes = json!({
        "P": page("P", 10.0, 0x1d1d1d, &["T"]),
        "T": {
            "type": "TEMPLATE", "id": "T", "parentId": "P", "name": "Dungeon",
            "children": ["S", "GR"],
            "template": { "type": "dungeon", "dungeonShape": "S", "grid": "GR" }
        },
        "S": {
            "type": "GEOMETRY", "id": "S", "parentId": "T", "geometryId": "g1",
            "children": ["MP", "SH"],
            "backgroundEffect": { "dropShadow": { "enabled": false } }
        },
        "MP": {
            "type": "MULTIPOLYGON", "id": "MP", "parentId": "S", "mask": false,
            "fill": { "visible": true, "colour": { "colour": 0xffffff, "alpha": 1 } },
            "stroke": { "visible": true, "width": 2, "colour": { "colour": 0, "alpha": 1 } }
        },
        "SH": {
            "type": "SHADOW", "id": "SH", "parentId": "S", "tx": 3, "ty": 5,
            "colour": { "colour": 0, "alpha": 0.4 }
        },
        "GR": {
            "type": "GRID", "id": "GR", "parentId": "T", "gridType": "square",
            "variant": "clean",
            "cleanOptions": { "width": 1, "colour": { "colour": 0x999999, "alpha": 1 } }
        }
    });
    let geometry = json!({
        "g1": {
            "polygons": [[
                [[0, 0], [40, 0], [40, 30], [0, 30]],
                [[10, 10], [20, 10], [20, 20], [10, 20]]
            ]],
            "polylines": []
        }
    });
    map_json("P", nodes, geometry)
}

/// Serialize a document and package it as the `map` member
pub fn map_archive(document: &Value) -> Vec<u8> {
    let json = serde_json::to_vec(document).unwrap();
    stored_zip(&[("map", &json)])
}
