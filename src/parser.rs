//! Scene document decoding and the end-to-end map pipeline

use crate::archive::Archive;
use crate::error::{Error, Result};
use crate::model::{
    DecoderConfig, DocumentNode, MapFile, Node, SUPPORTED_VERSION, Scene, SceneDocument,
};
use crate::walker::GraphWalker;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Decode a map export with the default configuration
pub fn parse_map(buffer: &[u8]) -> Result<Scene> {
    parse_map_with_config(buffer, &DecoderConfig::default())
}

/// Decode a map export: container → scene document → primitives
pub fn parse_map_with_config(buffer: &[u8], config: &DecoderConfig) -> Result<Scene> {
    let archive = Archive::read_with_config(buffer, config)?;
    let content = select_document_member(&archive, config)?;
    let document = decode_document(content)?;
    GraphWalker::new(&document, config).walk()
}

/// Pick the member holding the scene document
///
/// The configured member name wins; otherwise the first member whose content
/// starts with a JSON object is used.
pub fn select_document_member<'a>(archive: &Archive<'a>, config: &DecoderConfig) -> Result<&'a [u8]> {
    if let Some(content) = archive.content(config.member_name()) {
        return Ok(content);
    }

    let fallback = archive.entries().iter().find(|entry| {
        entry
            .content()
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|&b| b == b'{')
    });

    match fallback {
        Some(entry) => {
            debug!(
                wanted = config.member_name(),
                using = %entry.name,
                "configured member not found; using first JSON member"
            );
            Ok(entry.content())
        }
        None => Err(Error::MissingMember(format!(
            "'{}' not found and no member contains a JSON object (members: {})",
            config.member_name(),
            archive.names().collect::<Vec<_>>().join(", ")
        ))),
    }
}

#[derive(Deserialize)]
struct VersionHeader {
    version: Option<u64>,
}

/// Decode scene document JSON
///
/// The version is checked before the structure so a document from a newer
/// format is reported as such rather than as a shape mismatch.
pub fn decode_document(bytes: &[u8]) -> Result<SceneDocument> {
    let header: VersionHeader = serde_json::from_slice(bytes)?;
    let version = header.version.ok_or_else(|| {
        Error::InvalidDocument("missing 'version' field".to_string())
    })?;
    if version != SUPPORTED_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let file: MapFile = serde_json::from_slice(bytes)?;
    let state = file.state.document;
    let root_id = state.document_node_id;

    let mut document: Option<DocumentNode> = None;
    let mut nodes = BTreeMap::new();
    for (id, value) in state.nodes {
        if id == root_id {
            document = Some(serde_json::from_value(value).map_err(|e| {
                Error::InvalidDocument(format!("document node '{}': {}", id, e))
            })?);
            continue;
        }
        let node: Node = serde_json::from_value(value)
            .map_err(|e| Error::InvalidDocument(format!("node '{}': {}", id, e)))?;
        if node.id() != &id {
            return Err(Error::InvalidDocument(format!(
                "node stored under key '{}' declares id '{}'",
                id,
                node.id()
            )));
        }
        nodes.insert(id, node);
    }

    let document = document.ok_or_else(|| {
        Error::InvalidDocument(format!(
            "document node '{}' is missing from the node table",
            root_id
        ))
    })?;

    debug!(
        nodes = nodes.len(),
        geometry = file.data.geometry.len(),
        selected_page = %document.selected_page,
        "decoded scene document"
    );

    Ok(SceneDocument {
        version,
        document,
        nodes,
        geometry: file.data.geometry,
    })
}
