use std::collections::BTreeMap;

use ahash::AHashMap;
use tracing::debug;

use crate::{
    edge::{AnchoredEdge, Edge, EdgeId, EdgeQuery},
    errors::DocGraphError,
    vertex::{Place, Record},
    vertex_store::VertexStore,
};

/// Edge registry plus a per-place adjacency index.
///
/// The registry is keyed by monotonically assigned edge ids, so iteration
/// order is insertion order. The adjacency index is a rebuildable cache of
/// edge ids per endpoint place.
#[derive(Debug)]
pub struct EdgeStore {
    edges: BTreeMap<EdgeId, Edge>,
    adjacency: AHashMap<Place, Vec<EdgeId>>,
    next_id: EdgeId,
}

impl Default for EdgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeStore {
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
            adjacency: AHashMap::new(),
            next_id: 1,
        }
    }

    /// Registers an edge and returns its id.
    ///
    /// Both endpoints must be inserted in the given store; a self-loop is
    /// indexed once.
    pub fn insert<R: Record>(
        &mut self,
        edge: Edge,
        vertices: &VertexStore<R>,
    ) -> Result<EdgeId, DocGraphError> {
        for place in [edge.start(), edge.end()] {
            if !vertices.contains(place) {
                return Err(DocGraphError::dangling(format!(
                    "edge endpoint {place} is not inserted"
                )));
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.adjacency.entry(edge.start()).or_default().push(id);
        if edge.end() != edge.start() {
            self.adjacency.entry(edge.end()).or_default().push(id);
        }
        debug!(id, start = edge.start(), end = edge.end(), "edge inserted");
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Unregisters an edge and returns it.
    pub fn remove(&mut self, id: EdgeId) -> Result<Edge, DocGraphError> {
        let edge = self
            .edges
            .remove(&id)
            .ok_or_else(|| DocGraphError::not_inserted(format!("no edge with id {id}")))?;
        self.unindex(edge.start(), id);
        if edge.end() != edge.start() {
            self.unindex(edge.end(), id);
        }
        debug!(id, "edge removed");
        Ok(edge)
    }

    pub fn get(&self, id: EdgeId) -> Result<&Edge, DocGraphError> {
        self.edges
            .get(&id)
            .ok_or_else(|| DocGraphError::not_inserted(format!("no edge with id {id}")))
    }

    pub fn contains(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates over edges in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    /// Cascade removal: drops every edge touching `place` and returns the
    /// ids of the removed edges.
    pub fn remove_vertex_edges(&mut self, place: Place) -> Vec<EdgeId> {
        let ids = self.adjacency.remove(&place).unwrap_or_default();
        for &id in &ids {
            if let Some(edge) = self.edges.remove(&id) {
                let neighbor = if edge.start() == place {
                    edge.end()
                } else {
                    edge.start()
                };
                if neighbor != place {
                    self.unindex(neighbor, id);
                }
            }
        }
        if !ids.is_empty() {
            debug!(place, count = ids.len(), "cascade removed edges");
        }
        ids
    }

    /// Lazy O(degree) search over the edges touching `place`.
    ///
    /// Each candidate is yielded as an immutable view anchored at `place`;
    /// the stored edges are never mutated by a search.
    pub fn search<'a>(
        &'a self,
        place: Place,
        query: &'a EdgeQuery,
    ) -> impl Iterator<Item = AnchoredEdge> + 'a {
        self.adjacency
            .get(&place)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |id| {
                let edge = self.edges.get(id)?;
                let candidate = AnchoredEdge::new(*id, edge, place);
                query.matches(&candidate).then_some(candidate)
            })
    }

    fn unindex(&mut self, place: Place, id: EdgeId) {
        if let Some(ids) = self.adjacency.get_mut(&place) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.adjacency.remove(&place);
            }
        }
    }
}
