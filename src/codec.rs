use serde::{Deserialize, Serialize};

use crate::{
    edge::Edge,
    edge_store::EdgeStore,
    errors::DocGraphError,
    vertex::{Elements, Place, Record},
    vertex_store::VertexStore,
};

/// Persisted form of one vertex: its place and whatever its record packed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub place: Place,
    pub data: Elements,
}

/// Persisted form of one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub start: Place,
    pub end: Place,
    pub label: String,
    pub has_direction: bool,
}

/// Serializable image of a whole store.
///
/// Vertex records are in place order and edge records in insertion order, so
/// repeated saves of an unchanged database are byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreImage {
    #[serde(default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Maps a live store to its serializable image.
pub fn serialize<R: Record>(vertices: &VertexStore<R>, edges: &EdgeStore) -> StoreImage {
    StoreImage {
        vertices: vertices
            .iter()
            .map(|vertex| VertexRecord {
                place: vertex.place(),
                data: vertex.pack(),
            })
            .collect(),
        edges: edges
            .iter()
            .map(|(_, edge)| EdgeRecord {
                start: edge.start(),
                end: edge.end(),
                label: edge.label().to_string(),
                has_direction: edge.has_direction(),
            })
            .collect(),
    }
}

/// Rebuilds a live store from an image.
///
/// Every vertex is reconstructed through `R::from_pack` and registered at its
/// recorded place; the next free place becomes the highest place plus one.
/// An edge referencing an absent place fails with `DanglingReference` rather
/// than being skipped. Reloaded edges are anchored at their start.
pub fn deserialize<R: Record>(
    image: StoreImage,
) -> Result<(VertexStore<R>, EdgeStore), DocGraphError> {
    let mut vertices = VertexStore::new();
    for record in image.vertices {
        let vertex = R::from_pack(record.data)?;
        vertices.restore(record.place, vertex)?;
    }
    let mut edges = EdgeStore::new();
    for record in image.edges {
        let edge = Edge::new(record.start, record.end, record.label, record.has_direction);
        edges.insert(edge, &vertices)?;
    }
    Ok((vertices, edges))
}

/// Encodes an image as deterministic UTF-8 JSON.
pub fn to_json(image: &StoreImage) -> Result<String, DocGraphError> {
    serde_json::to_string(image).map_err(|e| DocGraphError::malformed(e.to_string()))
}

/// Decodes an image from JSON. An empty or blank file is an empty store.
pub fn from_json(text: &str) -> Result<StoreImage, DocGraphError> {
    if text.trim().is_empty() {
        return Ok(StoreImage::default());
    }
    serde_json::from_str(text).map_err(|e| DocGraphError::malformed(e.to_string()))
}
