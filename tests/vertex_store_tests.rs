use docgraph::{DocGraphError, Elements, Insertion, Record, Vertex, VertexStore};
use serde_json::json;

fn insert(store: &mut VertexStore<Vertex>, vertex: Vertex) -> u64 {
    store
        .insert(vertex)
        .expect("insert")
        .place()
        .expect("not rejected")
}

#[test]
fn test_places_are_monotonic_from_one() {
    let mut store = VertexStore::new();
    for expected in 1..=5 {
        assert_eq!(insert(&mut store, Vertex::new()), expected);
    }
}

#[test]
fn test_insert_assigns_place_to_vertex() {
    let mut store = VertexStore::new();
    let place = insert(&mut store, Vertex::new());
    assert_eq!(store.get(place).expect("vertex").place(), place);
}

#[test]
fn test_places_are_never_reused() {
    let mut store = VertexStore::new();
    let first = insert(&mut store, Vertex::new());
    assert_eq!(first, 1);
    let removed = store.remove(first).expect("remove");
    assert_eq!(insert(&mut store, removed), 2);
}

#[test]
fn test_double_insertion_fails() {
    let mut store = VertexStore::new();
    let place = insert(&mut store, Vertex::new());
    let mut stray = Vertex::new();
    stray.set_place(place);
    let err = store.insert(stray).expect_err("already inserted");
    assert!(matches!(err, DocGraphError::DuplicateInsertion(_)));
}

#[test]
fn test_remove_detaches_and_preserves_elements() {
    let mut store = VertexStore::new();
    let mut vertex = Vertex::new();
    vertex.set("name", "kept");
    let place = insert(&mut store, vertex);

    let removed = store.remove(place).expect("remove");
    assert_eq!(removed.place(), 0);
    assert_eq!(removed.get("name").expect("name"), &json!("kept"));
    assert!(!store.contains(place));
    assert_eq!(store.len(), 0);
}

#[test]
fn test_remove_unknown_place_fails() {
    let mut store: VertexStore<Vertex> = VertexStore::new();
    let err = store.remove(1).expect_err("nothing inserted");
    assert!(matches!(err, DocGraphError::NotInserted(_)));
}

#[test]
fn test_get_unknown_place_fails() {
    let store: VertexStore<Vertex> = VertexStore::new();
    let err = store.get(42).expect_err("unknown");
    assert!(matches!(err, DocGraphError::NotInserted(_)));
}

#[test]
fn test_iteration_is_in_place_order() {
    let mut store = VertexStore::new();
    for name in ["a", "b", "c"] {
        let mut vertex = Vertex::new();
        vertex.set("name", name);
        insert(&mut store, vertex);
    }
    let names: Vec<String> = store
        .iter()
        .map(|v| v.get("name").expect("name").as_str().expect("str").to_string())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(store.places().collect::<Vec<_>>(), vec![1, 2, 3]);
}

/// Record whose readiness gate requires a "name" element, mirroring a record
/// type with mandatory fields.
#[derive(Debug, PartialEq)]
struct GatedVertex(Vertex);

impl Record for GatedVertex {
    fn pack(&self) -> Elements {
        self.0.pack()
    }

    fn from_pack(pack: Elements) -> Result<Self, DocGraphError> {
        Vertex::from_pack(pack).map(GatedVertex)
    }

    fn place(&self) -> u64 {
        self.0.place()
    }

    fn set_place(&mut self, place: u64) {
        self.0.set_place(place);
    }

    fn ready_for_insertion(&self) -> bool {
        self.0.contains_element("name")
    }
}

#[test]
fn test_rejected_vertex_stays_detached_and_consumes_no_place() {
    let mut store: VertexStore<GatedVertex> = VertexStore::new();
    let rejected = store.insert(GatedVertex(Vertex::new())).expect("insert");
    let vertex = match rejected {
        Insertion::Rejected(vertex) => vertex,
        Insertion::Inserted(place) => panic!("gate ignored, got place {place}"),
    };
    assert_eq!(vertex.place(), 0);
    assert_eq!(store.len(), 0);

    // The gate passing afterwards gets place 1: the rejection used none up.
    let mut vertex = vertex;
    vertex.0.set("name", "ready now");
    let outcome = store.insert(vertex).expect("insert");
    assert_eq!(outcome.place(), Some(1));
}

/// Record stamping an element when it gains a place.
#[derive(Debug)]
struct StampedVertex(Vertex);

impl Record for StampedVertex {
    fn pack(&self) -> Elements {
        self.0.pack()
    }

    fn from_pack(pack: Elements) -> Result<Self, DocGraphError> {
        Vertex::from_pack(pack).map(StampedVertex)
    }

    fn place(&self) -> u64 {
        self.0.place()
    }

    fn set_place(&mut self, place: u64) {
        self.0.set_place(place);
    }

    fn on_insert(&mut self) {
        let place = self.0.place();
        self.0.set("inserted_at_place", place);
    }
}

#[test]
fn test_on_insert_runs_after_place_assignment() {
    let mut store: VertexStore<StampedVertex> = VertexStore::new();
    let place = store
        .insert(StampedVertex(Vertex::new()))
        .expect("insert")
        .place()
        .expect("inserted");
    let stored = store.get(place).expect("vertex");
    assert_eq!(
        stored.0.get("inserted_at_place").expect("stamp"),
        &json!(place)
    );
}
