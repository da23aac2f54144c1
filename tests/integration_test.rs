//! Integration tests for dsmap
//!
//! These tests build map exports in memory and decode them end to end

mod common;

use common::{dungeon_map, map_archive, map_json, page, single_page_map, stored_zip};
use dsmap::{
    DecoderConfig, DrawablePrimitive, Error, ErrorKind, GridLayout, GridVariant, GroupKind, Point,
    Rect, Scene, StrokeSide,
};
use serde_json::json;

#[test]
fn test_single_page_end_to_end() {
    let json = serde_json::to_vec(&single_page_map()).unwrap();
    let buffer = stored_zip(&[("map", &json), ("preview.png", b"\x89PNG\r\n\x1a\n")]);

    let scene = Scene::from_bytes(&buffer).unwrap();

    assert_eq!(scene.background_color, 0x112233);
    assert_eq!(scene.background_color, 1122867);
    assert_eq!(scene.primitives.len(), 1);
    match &scene.primitives[0].primitive {
        DrawablePrimitive::Background {
            variant,
            cell_diameter,
            layout,
            bounds,
            ..
        } => {
            assert_eq!(*variant, GridVariant::Lines);
            assert_eq!(*cell_diameter, 10.0);
            assert_eq!(*bounds, Rect::new(-1024.0, -1024.0, 1024.0, 1024.0));
            assert!(matches!(layout, GridLayout::Lines(_)));
            // 205 columns and 205 rows over 2048 units at 10 per cell
            assert_eq!(layout.len(), 410);
        }
        other => panic!("expected a background, got {:?}", other),
    }
}

#[test]
fn test_dungeon_primitive_order() {
    let scene = Scene::from_bytes(&map_archive(&dungeon_map())).unwrap();

    let kinds: Vec<&str> = scene.primitives.iter().map(|d| d.primitive.kind()).collect();
    let mut expected = vec!["background", "polygon"];
    expected.extend(std::iter::repeat_n("shadowSegment", 8));
    expected.push("gridLines");
    assert_eq!(kinds, expected);

    assert_eq!(scene.background_color, 0x1d1d1d);
    let group_kinds: Vec<GroupKind> = scene.groups.iter().map(|g| g.kind).collect();
    assert_eq!(
        group_kinds,
        vec![GroupKind::Page, GroupKind::Template, GroupKind::Geometry]
    );
    assert_eq!(scene.groups[1].name, "Dungeon");
    assert_eq!(scene.groups[2].parent, Some(1));
}

#[test]
fn test_dungeon_polygon_and_grid() {
    let scene = Scene::from_bytes(&map_archive(&dungeon_map())).unwrap();

    let polygon = scene.primitives_of_node("MP").next().unwrap();
    assert_eq!(polygon.group, 2);
    let DrawablePrimitive::Polygon(shape) = &polygon.primitive else {
        panic!("expected a polygon");
    };
    assert_eq!(shape.outer.len(), 4);
    assert_eq!(shape.holes.len(), 1);
    assert_eq!(shape.fill.map(|c| c.rgb), Some(0xffffff));
    assert_eq!(shape.stroke.map(|s| s.width), Some(2.0));
    assert!(!shape.mask);

    let grid = scene.primitives_of_node("GR").next().unwrap();
    assert_eq!(grid.group, 1);
    let DrawablePrimitive::GridLines {
        bounds, segments, ..
    } = &grid.primitive
    else {
        panic!("expected grid lines");
    };
    assert_eq!(*bounds, Rect::new(-10.0, -10.0, 50.0, 40.0));
    assert_eq!(segments.len(), 13);
    assert_eq!(segments[0].from, Point::new(-10.0, -10.0));
    assert_eq!(segments[0].to, Point::new(-10.0, 40.0));
}

#[test]
fn test_dungeon_shadows() {
    let scene = Scene::from_bytes(&map_archive(&dungeon_map())).unwrap();

    let shadows: Vec<(f64, StrokeSide)> = scene
        .primitives_of_node("SH")
        .map(|d| match &d.primitive {
            DrawablePrimitive::ShadowSegment { width, side, .. } => (*width, *side),
            other => panic!("unexpected {:?}", other),
        })
        .collect();

    let ring = [
        (5.0, StrokeSide::Outside),
        (3.0, StrokeSide::Inside),
        (5.0, StrokeSide::Inside),
        (3.0, StrokeSide::Outside),
    ];
    let expected: Vec<_> = ring.iter().chain(ring.iter()).copied().collect();
    assert_eq!(shadows, expected);
}

#[test]
fn test_multipolygon_with_missing_geometry() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &["G"]),
        "G": { "type": "GEOMETRY", "id": "G", "parentId": "P", "geometryId": "nowhere",
               "children": ["MP"] },
        "MP": { "type": "MULTIPOLYGON", "id": "MP", "parentId": "G" }
    });
    let buffer = map_archive(&map_json("P", nodes, json!({})));

    let err = Scene::from_bytes(&buffer).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Traversal);
    assert!(matches!(err, Error::MissingGeometry { ref geometry, .. } if geometry == "nowhere"));
}

#[test]
fn test_version_two_is_rejected() {
    let mut document = single_page_map();
    document["version"] = json!(2);

    let err = Scene::from_bytes(&map_archive(&document)).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion(2)));
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains('2'));
}

#[test]
fn test_member_fallback_to_first_json_member() {
    let json = serde_json::to_vec(&single_page_map()).unwrap();
    let buffer = stored_zip(&[("notes.txt", b"hello"), ("scene.json", &json)]);

    let scene = Scene::from_bytes(&buffer).unwrap();
    assert_eq!(scene.background_color, 0x112233);
}

#[test]
fn test_configured_member_name() {
    let json = serde_json::to_vec(&single_page_map()).unwrap();
    let other = serde_json::to_vec(&json!({ "version": 2 })).unwrap();
    let buffer = stored_zip(&[("map", &other), ("alt", &json)]);

    assert!(Scene::from_bytes(&buffer).is_err());

    let config = DecoderConfig::new().with_member_name("alt");
    let scene = Scene::from_bytes_with_config(&buffer, &config).unwrap();
    assert_eq!(scene.primitives.len(), 1);
}

#[test]
fn test_no_json_member() {
    let buffer = stored_zip(&[("preview.png", b"\x89PNG")]);

    let err = Scene::from_bytes(&buffer).unwrap_err();
    assert!(matches!(err, Error::MissingMember(_)));
    assert!(err.to_string().contains("preview.png"));
}

#[test]
fn test_custom_canvas() {
    let config = DecoderConfig::new().with_canvas(Rect::new(0.0, 0.0, 100.0, 50.0));
    let scene = Scene::from_bytes_with_config(&map_archive(&single_page_map()), &config).unwrap();

    let DrawablePrimitive::Background { layout, .. } = &scene.primitives[0].primitive else {
        panic!("expected a background");
    };
    // 11 columns and 6 rows
    assert_eq!(layout.len(), 17);
}

#[test]
fn test_hidden_page_grid() {
    let mut document = single_page_map();
    document["state"]["document"]["nodes"]["P"]["grid"]["visible"] = json!(false);

    let scene = Scene::from_bytes(&map_archive(&document)).unwrap();
    let DrawablePrimitive::Background { layout, .. } = &scene.primitives[0].primitive else {
        panic!("expected a background");
    };
    assert_eq!(*layout, GridLayout::Unrendered(GridVariant::Lines));
}

#[test]
fn test_dots_page_grid() {
    let mut document = single_page_map();
    document["state"]["document"]["nodes"]["P"]["grid"]["variant"] = json!("dots");
    document["state"]["document"]["nodes"]["P"]["grid"]["dotsOptions"]["radius"] = json!(2.5);

    let config = DecoderConfig::new().with_canvas(Rect::new(0.0, 0.0, 30.0, 20.0));
    let scene = Scene::from_bytes_with_config(&map_archive(&document), &config).unwrap();
    let DrawablePrimitive::Background { layout, size, .. } = &scene.primitives[0].primitive else {
        panic!("expected a background");
    };
    assert_eq!(*size, 2.5);
    assert!(matches!(layout, GridLayout::Dots(dots) if dots.len() == 6));
}

#[test]
fn test_mask_polygon_is_attached_to_enclosing_group() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &["F"]),
        "F": { "type": "FOLDER", "id": "F", "parentId": "P", "children": ["G"] },
        "G": { "type": "GEOMETRY", "id": "G", "parentId": "F", "geometryId": "g",
               "children": ["M"] },
        "M": { "type": "MULTIPOLYGON", "id": "M", "parentId": "G", "mask": true }
    });
    let geometry = json!({ "g": { "polygons": [common::rect_polygon(0.0, 0.0, 5.0, 5.0)] } });
    let scene = Scene::from_bytes(&map_archive(&map_json("P", nodes, geometry))).unwrap();

    let geometry_group = scene
        .groups
        .iter()
        .position(|g| g.kind == GroupKind::Geometry)
        .unwrap();
    let masks: Vec<_> = scene.masks(geometry_group).collect();
    assert_eq!(masks.len(), 1);
    assert!(masks[0].fill.is_none());
    assert!(masks[0].stroke.is_none());
    assert_eq!(scene.masks(0).count(), 0);
}

#[test]
fn test_scene_serializes_to_json() {
    let scene = Scene::from_bytes(&map_archive(&dungeon_map())).unwrap();
    let value = serde_json::to_value(&scene).unwrap();

    assert_eq!(value["backgroundColor"], json!(0x1d1d1d));
    assert_eq!(value["primitives"][0]["primitive"]["type"], json!("background"));
    assert_eq!(value["primitives"][1]["primitive"]["type"], json!("polygon"));
}

#[test]
fn test_decoding_is_deterministic() {
    let buffer = map_archive(&dungeon_map());
    let first = Scene::from_bytes(&buffer).unwrap();
    let second = Scene::from_bytes(&buffer).unwrap();
    assert_eq!(first, second);
}
