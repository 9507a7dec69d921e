use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    codec,
    edge::{AnchoredEdge, Edge, EdgeId, EdgeQuery},
    edge_store::EdgeStore,
    errors::DocGraphError,
    vertex::{Place, Record, Vertex},
    vertex_store::{Insertion, VertexStore},
};

/// Embedded document-and-graph database backed by a single JSON file.
///
/// The whole dataset lives in memory for the lifetime of the instance, which
/// assumes exclusive ownership of its backing file. `save` is always a full
/// rewrite. The record type parameter selects how vertices are packed and
/// reconstructed; it defaults to the base [`Vertex`].
#[derive(Debug)]
pub struct DocGraph<R: Record = Vertex> {
    path: PathBuf,
    vertices: VertexStore<R>,
    edges: EdgeStore,
}

impl<R: Record> DocGraph<R> {
    /// Opens a database at `path`.
    ///
    /// An existing file is parsed immediately; a nonexistent one yields an
    /// empty database and is only created by the first `save`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocGraphError> {
        let path = path.as_ref().to_path_buf();
        let (vertices, edges) = if path.exists() {
            Self::read_stores(&path)?
        } else {
            (VertexStore::new(), EdgeStore::new())
        };
        info!(
            path = %path.display(),
            vertices = vertices.len(),
            edges = edges.len(),
            "database opened"
        );
        Ok(Self {
            path,
            vertices,
            edges,
        })
    }

    /// Rewrites the backing file from the in-memory state, creating missing
    /// parent directories.
    pub fn save(&self) -> Result<(), DocGraphError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| DocGraphError::io(e.to_string()))?;
            }
        }
        let image = codec::serialize(&self.vertices, &self.edges);
        let text = codec::to_json(&image)?;
        fs::write(&self.path, text).map_err(|e| DocGraphError::io(e.to_string()))?;
        info!(
            path = %self.path.display(),
            vertices = self.vertices.len(),
            edges = self.edges.len(),
            "database saved"
        );
        Ok(())
    }

    /// Re-parses the backing file, replacing the in-memory state.
    pub fn reload(&mut self) -> Result<(), DocGraphError> {
        let (vertices, edges) = if self.path.exists() {
            Self::read_stores(&self.path)?
        } else {
            (VertexStore::new(), EdgeStore::new())
        };
        self.vertices = vertices;
        self.edges = edges;
        debug!(path = %self.path.display(), "database reloaded");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts a detached vertex. See [`VertexStore::insert`].
    pub fn insert(&mut self, vertex: R) -> Result<Insertion<R>, DocGraphError> {
        self.vertices.insert(vertex)
    }

    /// Detaches and returns the vertex at `place`, cascading removal of every
    /// edge that touches it.
    pub fn remove(&mut self, place: Place) -> Result<R, DocGraphError> {
        if !self.vertices.contains(place) {
            return Err(DocGraphError::not_inserted(format!(
                "no vertex at place {place}"
            )));
        }
        self.edges.remove_vertex_edges(place);
        self.vertices.remove(place)
    }

    pub fn get(&self, place: Place) -> Result<&R, DocGraphError> {
        self.vertices.get(place)
    }

    pub fn get_mut(&mut self, place: Place) -> Result<&mut R, DocGraphError> {
        self.vertices.get_mut(place)
    }

    pub fn contains(&self, place: Place) -> bool {
        self.vertices.contains(place)
    }

    /// Number of inserted vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over inserted vertices in place order.
    pub fn vertices(&self) -> impl Iterator<Item = &R> {
        self.vertices.iter()
    }

    /// Registers an edge; both endpoints must already be inserted here.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId, DocGraphError> {
        self.edges.insert(edge, &self.vertices)
    }

    /// Builds and registers an edge in one step.
    pub fn make_edge<L: Into<String>>(
        &mut self,
        start: Place,
        end: Place,
        label: L,
        has_direction: bool,
    ) -> Result<EdgeId, DocGraphError> {
        self.insert_edge(Edge::new(start, end, label, has_direction))
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, DocGraphError> {
        self.edges.remove(id)
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, DocGraphError> {
        self.edges.get(id)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter()
    }

    /// Lazy place-ordered scan of the vertices matching `predicate`.
    ///
    /// A predicate failing with `MissingElement` marks that vertex as a
    /// non-match; any other predicate error is yielded to the caller.
    pub fn search<'a, F>(
        &'a self,
        predicate: F,
    ) -> impl Iterator<Item = Result<&'a R, DocGraphError>>
    where
        F: Fn(&R) -> Result<bool, DocGraphError> + 'a,
    {
        self.vertices.iter().filter_map(move |vertex| {
            match predicate(vertex) {
                Ok(true) => Some(Ok(vertex)),
                Ok(false) => None,
                Err(DocGraphError::MissingElement(_)) => None,
                Err(err) => Some(Err(err)),
            }
        })
    }

    /// Lazy O(degree) search of the edges touching `place`, yielded as views
    /// anchored at `place`. Fails with `NotInserted` for an unknown place.
    pub fn search_edge<'a>(
        &'a self,
        place: Place,
        query: &'a EdgeQuery,
    ) -> Result<impl Iterator<Item = AnchoredEdge> + 'a, DocGraphError> {
        if !self.vertices.contains(place) {
            return Err(DocGraphError::not_inserted(format!(
                "no vertex at place {place}"
            )));
        }
        Ok(self.edges.search(place, query))
    }

    fn read_stores(path: &Path) -> Result<(VertexStore<R>, EdgeStore), DocGraphError> {
        let text = fs::read_to_string(path).map_err(|e| DocGraphError::io(e.to_string()))?;
        let image = codec::from_json(&text)?;
        codec::deserialize(image)
    }
}
