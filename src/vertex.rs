use serde_json::Value;

use crate::errors::DocGraphError;

/// Stable 1-based identity assigned on insertion; 0 means detached.
pub type Place = u64;

/// Insertion-ordered string-to-value mapping used for vertex elements and for
/// the persisted structure.
pub type Elements = serde_json::Map<String, Value>;

/// Capability set of a storable record.
///
/// `Vertex` is the base implementation; custom record types implement this
/// trait to control what is persisted (`pack`/`from_pack`), to gate insertion
/// (`ready_for_insertion`) and to run side effects once a place has been
/// assigned (`on_insert`). The database is generic over the record type, which
/// makes the reconstruction path an explicit compile-time choice instead of
/// runtime type dispatch.
pub trait Record: Sized {
    /// Snapshot of the data to persist for this record.
    fn pack(&self) -> Elements;

    /// Rebuilds a detached record from persisted data.
    fn from_pack(pack: Elements) -> Result<Self, DocGraphError>;

    fn place(&self) -> Place;

    /// Stores the assigned place. Managed by the vertex store; 0 detaches.
    fn set_place(&mut self, place: Place);

    fn is_inserted(&self) -> bool {
        self.place() != 0
    }

    /// Insertion gate. Returning false cancels the insert without an error.
    fn ready_for_insertion(&self) -> bool {
        true
    }

    /// Called once after a place has been assigned.
    fn on_insert(&mut self) {}
}

/// A record-like vertex: a place plus an ordered mapping of named elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    place: Place,
    elements: Elements,
}

impl Vertex {
    /// Creates a detached vertex with no elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached vertex holding the given elements.
    pub fn with_elements(elements: Elements) -> Self {
        Self { place: 0, elements }
    }

    pub fn get(&self, key: &str) -> Result<&Value, DocGraphError> {
        self.elements
            .get(key)
            .ok_or_else(|| DocGraphError::missing_element(key))
    }

    pub fn set<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.elements.insert(key.into(), value.into());
    }

    /// Removes an element, preserving the order of the remaining ones.
    pub fn remove_element(&mut self, key: &str) -> Result<Value, DocGraphError> {
        self.elements
            .shift_remove(key)
            .ok_or_else(|| DocGraphError::missing_element(key))
    }

    pub fn contains_element(&self, key: &str) -> bool {
        self.elements.contains_key(key)
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Elements {
        &mut self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Record for Vertex {
    fn pack(&self) -> Elements {
        self.elements.clone()
    }

    fn from_pack(pack: Elements) -> Result<Self, DocGraphError> {
        Ok(Vertex::with_elements(pack))
    }

    fn place(&self) -> Place {
        self.place
    }

    fn set_place(&mut self, place: Place) {
        self.place = place;
    }
}
