use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{errors::DocGraphError, vertex::Place};

/// Monotonic identity assigned to an edge when it is registered; it is what
/// distinguishes parallel edges with identical endpoints and label.
pub type EdgeId = u64;

/// Viewpoint of an edge relative to its anchor endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Out,
    In,
    None,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Out => write!(f, "out"),
            Direction::In => write!(f, "in"),
            Direction::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    End,
}

/// A labeled, optionally directed link between two places.
///
/// Edges reference vertices by place, never by ownership, so cyclic graphs
/// cost nothing. An edge can be built before its endpoints are inserted;
/// only registration in a store validates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    start: Place,
    end: Place,
    label: String,
    has_direction: bool,
    anchor: Anchor,
}

impl Edge {
    /// Creates an edge from `start` to `end`, anchored at `start`.
    ///
    /// Undirected edges normalize their endpoints so the lower place is the
    /// start, which keeps persisted triples canonical.
    pub fn new<L: Into<String>>(start: Place, end: Place, label: L, has_direction: bool) -> Self {
        let (start, end) = if !has_direction && end < start {
            (end, start)
        } else {
            (start, end)
        };
        Self {
            start,
            end,
            label: label.into(),
            has_direction,
            anchor: Anchor::Start,
        }
    }

    /// Creates an edge described from the viewpoint of `anchor`.
    ///
    /// `Direction::Out` makes `anchor` the start, `Direction::In` makes it the
    /// end, `Direction::None` builds an undirected edge. The result is
    /// anchored at `anchor`.
    pub fn from_anchor<L: Into<String>>(
        anchor: Place,
        other: Place,
        label: L,
        direction: Direction,
    ) -> Self {
        let mut edge = match direction {
            Direction::Out => Edge::new(anchor, other, label, true),
            Direction::In => Edge::new(other, anchor, label, true),
            Direction::None => Edge::new(anchor, other, label, false),
        };
        edge.anchor = if edge.start == anchor {
            Anchor::Start
        } else {
            Anchor::End
        };
        edge
    }

    /// Whether `place` is one of the endpoints.
    pub fn touches(&self, place: Place) -> bool {
        self.start == place || self.end == place
    }

    /// Moves the anchor to the given endpoint.
    pub fn change_anchor(&mut self, place: Place) -> Result<(), DocGraphError> {
        if place == self.start {
            self.anchor = Anchor::Start;
        } else if place == self.end {
            self.anchor = Anchor::End;
        } else {
            return Err(DocGraphError::invalid_anchor(format!(
                "place {place} is not an endpoint of this edge"
            )));
        }
        Ok(())
    }

    pub fn start(&self) -> Place {
        self.start
    }

    pub fn end(&self) -> Place {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn has_direction(&self) -> bool {
        self.has_direction
    }

    pub fn anchor(&self) -> Place {
        match self.anchor {
            Anchor::Start => self.start,
            Anchor::End => self.end,
        }
    }

    /// The endpoint opposite the current anchor.
    pub fn other(&self) -> Place {
        match self.anchor {
            Anchor::Start => self.end,
            Anchor::End => self.start,
        }
    }

    /// Direction seen from the current anchor.
    pub fn direction(&self) -> Direction {
        if !self.has_direction {
            Direction::None
        } else if self.anchor == Anchor::Start {
            Direction::Out
        } else {
            Direction::In
        }
    }
}

/// Immutable per-query view of an edge, anchored at the queried place.
///
/// Edge searches return these instead of mutating the anchor of the stored
/// edge, so two interleaved searches over the same edge cannot race on a
/// shared field.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredEdge {
    id: EdgeId,
    start: Place,
    end: Place,
    label: String,
    has_direction: bool,
    anchor: Place,
}

impl AnchoredEdge {
    pub(crate) fn new(id: EdgeId, edge: &Edge, anchor: Place) -> Self {
        Self {
            id,
            start: edge.start,
            end: edge.end,
            label: edge.label.clone(),
            has_direction: edge.has_direction,
            anchor,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn start(&self) -> Place {
        self.start
    }

    pub fn end(&self) -> Place {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn has_direction(&self) -> bool {
        self.has_direction
    }

    pub fn anchor(&self) -> Place {
        self.anchor
    }

    pub fn other(&self) -> Place {
        if self.anchor == self.start {
            self.end
        } else {
            self.start
        }
    }

    pub fn direction(&self) -> Direction {
        if !self.has_direction {
            Direction::None
        } else if self.anchor == self.start {
            Direction::Out
        } else {
            Direction::In
        }
    }
}

/// Filter for edge searches. An unset field keeps every candidate.
#[derive(Debug, Clone, Default)]
pub struct EdgeQuery {
    pub(crate) other: Option<Place>,
    pub(crate) label: Option<String>,
    pub(crate) direction: Option<Direction>,
}

impl EdgeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only edges whose far endpoint is `place`.
    pub fn other(mut self, place: Place) -> Self {
        self.other = Some(place);
        self
    }

    /// Keep only edges carrying exactly this label ("" matches unlabeled).
    pub fn label<L: Into<String>>(mut self, label: L) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Keep only edges with this direction as seen from the queried place.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub(crate) fn matches(&self, candidate: &AnchoredEdge) -> bool {
        if self.other.is_some_and(|other| candidate.other() != other) {
            return false;
        }
        if let Some(label) = self.label.as_deref() {
            if candidate.label() != label {
                return false;
            }
        }
        if self.direction.is_some_and(|dir| candidate.direction() != dir) {
            return false;
        }
        true
    }
}
