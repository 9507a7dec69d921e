use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    errors::DocGraphError,
    vertex::{Place, Record},
};

/// Outcome of a vertex insertion.
///
/// Rejection by the record's readiness gate is a branchable result, not an
/// error; the vertex is handed back untouched and still detached.
#[derive(Debug, PartialEq)]
pub enum Insertion<R> {
    Inserted(Place),
    Rejected(R),
}

impl<R> Insertion<R> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insertion::Inserted(_))
    }

    /// The assigned place, or None if the insertion was rejected.
    pub fn place(&self) -> Option<Place> {
        match self {
            Insertion::Inserted(place) => Some(*place),
            Insertion::Rejected(_) => None,
        }
    }
}

/// Place-indexed arena of inserted vertices.
///
/// Places are allocated monotonically starting at 1 and never reused, so a
/// persisted reference to a place stays unambiguous even as vertices churn.
#[derive(Debug)]
pub struct VertexStore<R> {
    vertices: BTreeMap<Place, R>,
    next_place: Place,
}

impl<R> Default for VertexStore<R> {
    fn default() -> Self {
        Self {
            vertices: BTreeMap::new(),
            next_place: 1,
        }
    }
}

impl<R: Record> VertexStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a detached vertex, assigning it the next free place.
    ///
    /// Fails with `DuplicateInsertion` if the vertex already carries a place.
    /// If the readiness gate declines, the vertex is returned through
    /// `Insertion::Rejected` and no place is consumed.
    pub fn insert(&mut self, mut vertex: R) -> Result<Insertion<R>, DocGraphError> {
        if vertex.is_inserted() {
            return Err(DocGraphError::duplicate_insertion(format!(
                "vertex already inserted at place {}",
                vertex.place()
            )));
        }
        if !vertex.ready_for_insertion() {
            debug!("vertex rejected by readiness gate");
            return Ok(Insertion::Rejected(vertex));
        }
        let place = self.next_place;
        self.next_place += 1;
        vertex.set_place(place);
        vertex.on_insert();
        self.vertices.insert(place, vertex);
        debug!(place, "vertex inserted");
        Ok(Insertion::Inserted(place))
    }

    /// Detaches and returns the vertex at `place`. Its place is reset to 0
    /// and its element data is left untouched. The place is never reused.
    pub fn remove(&mut self, place: Place) -> Result<R, DocGraphError> {
        let mut vertex = self
            .vertices
            .remove(&place)
            .ok_or_else(|| DocGraphError::not_inserted(format!("no vertex at place {place}")))?;
        vertex.set_place(0);
        debug!(place, "vertex removed");
        Ok(vertex)
    }

    pub fn get(&self, place: Place) -> Result<&R, DocGraphError> {
        self.vertices
            .get(&place)
            .ok_or_else(|| DocGraphError::not_inserted(format!("no vertex at place {place}")))
    }

    pub fn get_mut(&mut self, place: Place) -> Result<&mut R, DocGraphError> {
        self.vertices
            .get_mut(&place)
            .ok_or_else(|| DocGraphError::not_inserted(format!("no vertex at place {place}")))
    }

    pub fn contains(&self, place: Place) -> bool {
        self.vertices.contains_key(&place)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over inserted vertices in place order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.vertices.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut R> {
        self.vertices.values_mut()
    }

    pub fn places(&self) -> impl Iterator<Item = Place> + '_ {
        self.vertices.keys().copied()
    }

    /// Registers a reconstructed vertex at a fixed place (load path only).
    pub(crate) fn restore(&mut self, place: Place, mut vertex: R) -> Result<(), DocGraphError> {
        if place == 0 {
            return Err(DocGraphError::malformed("vertex record with place 0"));
        }
        if self.vertices.contains_key(&place) {
            return Err(DocGraphError::malformed(format!(
                "duplicate place {place} in store"
            )));
        }
        vertex.set_place(place);
        self.vertices.insert(place, vertex);
        if place >= self.next_place {
            self.next_place = place + 1;
        }
        Ok(())
    }
}
