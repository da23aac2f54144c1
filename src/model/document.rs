//! The decoded scene document

use super::geometry::Geometry;
use super::node::{DocumentNode, GeometryId, Node, NodeId};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only document format version this crate reads
pub const SUPPORTED_VERSION: u64 = 1;

/// Default id of the root document node
pub const DOCUMENT_NODE_ID: &str = "document";

/// Typed, immutable view of a map's JSON payload
///
/// No cross-reference validation happens at construction; dangling ids are
/// reported when the graph is walked.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    /// Format version, always [`SUPPORTED_VERSION`] once decoded
    pub version: u64,
    /// The synthetic root naming the selected page
    pub document: DocumentNode,
    /// Every non-root node keyed by id
    pub nodes: BTreeMap<NodeId, Node>,
    /// Polygon sets keyed by id
    pub geometry: BTreeMap<GeometryId, Geometry>,
}

impl SceneDocument {
    /// Decode a scene document from JSON bytes
    ///
    /// Fails with [`crate::Error::UnsupportedVersion`] when `version != 1`
    /// and with a format error when the JSON does not have the expected shape.
    pub fn from_json(bytes: &[u8]) -> crate::Result<Self> {
        crate::parser::decode_document(bytes)
    }

    /// The page a decode starts from
    pub fn selected_page(&self) -> &NodeId {
        &self.document.selected_page
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a geometry table entry by id
    pub fn geometry(&self, id: &str) -> Option<&Geometry> {
        self.geometry.get(id)
    }
}

/// Root node as it appears in the node table
///
/// The export writes it either untagged or with `"type": "DOCUMENT"`.
#[derive(Serialize)]
struct TaggedDocument<'a> {
    #[serde(rename = "type")]
    tag: &'static str,
    #[serde(flatten)]
    node: &'a DocumentNode,
}

#[derive(Serialize)]
#[serde(untagged)]
enum NodeEntryRef<'a> {
    Document(TaggedDocument<'a>),
    Node(&'a Node),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentStateRef<'a> {
    document_node_id: &'a NodeId,
    nodes: BTreeMap<&'a str, NodeEntryRef<'a>>,
}

#[derive(Serialize)]
struct StateRef<'a> {
    document: DocumentStateRef<'a>,
}

#[derive(Serialize)]
struct DataRef<'a> {
    geometry: &'a BTreeMap<GeometryId, Geometry>,
}

#[derive(Serialize)]
struct MapFileRef<'a> {
    version: u64,
    state: StateRef<'a>,
    data: DataRef<'a>,
}

impl Serialize for SceneDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut nodes: BTreeMap<&str, NodeEntryRef<'_>> = self
            .nodes
            .iter()
            .map(|(id, node)| (id.as_str(), NodeEntryRef::Node(node)))
            .collect();
        nodes.insert(
            self.document.id.as_str(),
            NodeEntryRef::Document(TaggedDocument {
                tag: "DOCUMENT",
                node: &self.document,
            }),
        );

        MapFileRef {
            version: self.version,
            state: StateRef {
                document: DocumentStateRef {
                    document_node_id: &self.document.id,
                    nodes,
                },
            },
            data: DataRef {
                geometry: &self.geometry,
            },
        }
        .serialize(serializer)
    }
}

/// Wire layout used while decoding; nodes stay untyped until their ids are known
#[derive(Deserialize)]
pub(crate) struct MapFile {
    pub(crate) state: MapState,
    #[serde(default)]
    pub(crate) data: MapData,
}

#[derive(Deserialize)]
pub(crate) struct MapState {
    pub(crate) document: DocumentState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentState {
    #[serde(default = "default_document_id")]
    pub(crate) document_node_id: NodeId,
    pub(crate) nodes: BTreeMap<NodeId, serde_json::Value>,
}

#[derive(Deserialize, Default)]
pub(crate) struct MapData {
    #[serde(default)]
    pub(crate) geometry: BTreeMap<GeometryId, Geometry>,
}

fn default_document_id() -> NodeId {
    NodeId::new(DOCUMENT_NODE_ID)
}
