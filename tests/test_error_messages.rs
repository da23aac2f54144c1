//! Test to verify error message quality
//!
//! Each failure is driven through the public entry point and checked for its
//! code, its taxonomy kind and the identifiers a user needs to find the cause.

mod common;

use common::{deflated_zip, map_archive, map_json, page, rect_polygon, single_page_map, stored_zip};
use dsmap::{DecoderConfig, Error, ErrorKind, Scene};
use serde_json::{Value, json};

fn decode_error(document: &Value) -> Error {
    Scene::from_bytes(&map_archive(document)).unwrap_err()
}

#[test]
fn test_error_message_for_deflated_member() {
    let json = serde_json::to_vec(&single_page_map()).unwrap();
    let err = Scene::from_bytes(&deflated_zip(&[("map", &json)])).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedCompression);
    let message = err.to_string();
    assert!(message.starts_with("[E4001]"), "{}", message);
    assert!(message.contains("DEFLATE"));
    assert!(message.contains("'map'"));
}

#[test]
fn test_error_message_for_corrupted_member() {
    let json = serde_json::to_vec(&single_page_map()).unwrap();
    let mut buffer = stored_zip(&[("map", &json)]);
    let start = buffer
        .windows(json.len())
        .position(|w| w == json.as_slice())
        .unwrap();
    let key = json
        .windows(9)
        .position(|w| w == b"\"version\"")
        .unwrap();
    // "version" -> "wersion"
    buffer[start + key + 1] = b'w';

    let err = Scene::from_bytes(&buffer).unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { ref name, .. } if name == "map"));
    assert!(err.to_string().starts_with("[E1003]"));
    assert_eq!(err.kind(), ErrorKind::Format);

    // With verification off the corruption reaches the document decoder
    let config = DecoderConfig::new().with_checksum_verification(false);
    let err = Scene::from_bytes_with_config(&buffer, &config).unwrap_err();
    assert!(err.to_string().contains("missing 'version'"));
}

#[test]
fn test_error_message_for_garbage() {
    let err = Scene::from_bytes(b"this is not a zip file").unwrap_err();
    assert!(err.to_string().starts_with("[E1001]"));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_error_message_for_bad_central_directory_magic() {
    let mut buffer = map_archive(&single_page_map());
    let central = buffer
        .windows(4)
        .rposition(|w| w == [0x50, 0x4b, 0x01, 0x02])
        .unwrap();
    buffer[central + 3] = 0x09;

    let err = Scene::from_bytes(&buffer).unwrap_err();
    assert!(matches!(err, Error::InvalidArchive(_)));
    assert!(err.to_string().contains("invalid magic"), "{}", err);
}

#[test]
fn test_error_message_for_missing_child() {
    let nodes = json!({ "P": page("P", 10.0, 0, &["ghost"]) });
    let err = decode_error(&map_json("P", nodes, json!({})));

    assert_eq!(err.kind(), ErrorKind::Traversal);
    assert_eq!(err.to_string(), "[E3001] Node 'ghost' is referenced but not defined");
}

#[test]
fn test_error_message_for_missing_selected_page() {
    let nodes = json!({ "P": page("P", 10.0, 0, &[]) });
    let err = decode_error(&map_json("Q", nodes, json!({})));
    assert!(matches!(err, Error::MissingNode(ref id) if id == "Q"));
}

#[test]
fn test_error_message_for_cycle() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &["A"]),
        "A": { "type": "FOLDER", "id": "A", "children": ["B"] },
        "B": { "type": "FOLDER", "id": "B", "children": ["A"] }
    });
    let err = decode_error(&map_json("P", nodes, json!({})));

    assert!(matches!(err, Error::CycleDetected(ref id) if id == "A"));
    assert!(err.to_string().starts_with("[E3004]"));
}

#[test]
fn test_error_message_for_non_square_page() {
    let mut document = single_page_map();
    document["state"]["document"]["nodes"]["P"]["grid"]["type"] = json!("hex");
    let err = decode_error(&document);

    assert_eq!(err.kind(), ErrorKind::Traversal);
    assert_eq!(
        err.to_string(),
        "[E4002] Node 'P' uses unsupported grid shape 'hex'"
    );
}

#[test]
fn test_error_message_for_grid_outside_template() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &["GR"]),
        "GR": { "type": "GRID", "id": "GR", "parentId": "P", "variant": "clean" }
    });
    let err = decode_error(&map_json("P", nodes, json!({})));

    assert!(err.to_string().starts_with("[E3003] Node 'GR'"), "{}", err);
    assert_eq!(err.kind(), ErrorKind::Traversal);
}

#[test]
fn test_error_message_for_polygon_outside_geometry() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &["M"]),
        "M": { "type": "MULTIPOLYGON", "id": "M", "parentId": "P" }
    });
    let err = decode_error(&map_json("P", nodes, json!({})));

    assert!(matches!(err, Error::UnresolvedScope { ref node, .. } if node == "M"));
}

#[test]
fn test_error_message_for_empty_dungeon_shape() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &["T"]),
        "T": { "type": "TEMPLATE", "id": "T", "parentId": "P", "children": ["S"],
               "template": { "type": "dungeon", "dungeonShape": "S" } },
        "S": { "type": "GEOMETRY", "id": "S", "parentId": "T", "geometryId": "g" }
    });
    let err = decode_error(&map_json("P", nodes, json!({ "g": { "polygons": [] } })));

    assert_eq!(err.kind(), ErrorKind::Geometry);
    let message = err.to_string();
    assert!(message.starts_with("[E5001]"));
    assert!(message.contains("template 'T'"));
}

#[test]
fn test_error_message_for_dungeon_shape_that_is_not_geometry() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &["T"]),
        "T": { "type": "TEMPLATE", "id": "T", "parentId": "P", "children": ["F"],
               "template": { "dungeonShape": "F" } },
        "F": { "type": "FOLDER", "id": "F", "parentId": "T" }
    });
    let geometry = json!({ "g": { "polygons": [rect_polygon(0.0, 0.0, 1.0, 1.0)] } });
    let err = decode_error(&map_json("P", nodes, geometry));

    assert!(matches!(err, Error::UnresolvedScope { ref node, .. } if node == "T"));
}

#[test]
fn test_error_message_for_depth_limit() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &["A"]),
        "A": { "type": "FOLDER", "id": "A", "children": ["B"] },
        "B": { "type": "FOLDER", "id": "B", "children": [] }
    });
    let buffer = map_archive(&map_json("P", nodes, json!({})));
    let config = DecoderConfig::new().with_max_depth(2);
    let err = Scene::from_bytes_with_config(&buffer, &config).unwrap_err();

    assert_eq!(
        err.to_string(),
        "[E3005] Group nesting exceeds the limit of 2 levels"
    );
}

#[test]
fn test_error_message_for_malformed_node() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &[]),
        "G": { "type": "GEOMETRY", "id": "G" }
    });
    let err = decode_error(&map_json("P", nodes, json!({})));

    assert_eq!(err.kind(), ErrorKind::Format);
    let message = err.to_string();
    assert!(message.starts_with("[E2003]"), "{}", message);
    assert!(message.contains("node 'G'"));
    assert!(message.contains("geometryId"), "{}", message);
}

#[test]
fn test_error_message_for_unknown_node_type() {
    let nodes = json!({
        "P": page("P", 10.0, 0, &[]),
        "X": { "type": "HOLOGRAM", "id": "X" }
    });
    let err = decode_error(&map_json("P", nodes, json!({})));
    assert!(err.to_string().contains("HOLOGRAM"), "{}", err);
}
