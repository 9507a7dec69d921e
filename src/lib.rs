//! Embedded document-and-graph store persisted wholesale to one JSON file.
//! Vertices are JSON-shaped records with a stable integer place; edges are
//! labeled, optionally directed links between places.

pub mod codec;
pub mod db;
pub mod edge;
pub mod edge_store;
pub mod errors;
pub mod vertex;
pub mod vertex_store;

pub use crate::codec::{EdgeRecord, StoreImage, VertexRecord};
pub use crate::db::DocGraph;
pub use crate::edge::{AnchoredEdge, Direction, Edge, EdgeId, EdgeQuery};
pub use crate::edge_store::EdgeStore;
pub use crate::errors::DocGraphError;
pub use crate::vertex::{Elements, Place, Record, Vertex};
pub use crate::vertex_store::{Insertion, VertexStore};
