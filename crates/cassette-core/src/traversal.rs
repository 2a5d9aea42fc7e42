//! # Traversal Engine
//!
//! Breadth-first enumeration of a [`Graph`].
//!
//! Two modes share one algorithm:
//! - `Forward`: roots are the SOURCE vertices, edges are followed from
//!   source to destinations, SINK vertices are terminal.
//! - `SinkRooted`: roots are the SINK vertices, edges are followed from a
//!   destination back to its source, SOURCE vertices are terminal.
//!
//! The discovery state lives in a side array owned by the traversal, so a
//! run never writes to the graph. A vertex is marked VISITED when it is
//! discovered and is therefore enqueued at most once per run. Ties are
//! broken by vertex and edge insertion order only.

use crate::{Graph, VertexId, VertexRole};
use std::collections::VecDeque;

// =============================================================================
// DIRECTION & DISCOVERY
// =============================================================================

/// Which end of the graph a traversal starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    SinkRooted,
}

impl Direction {
    /// Role of the vertices the traversal starts from.
    #[must_use]
    pub fn root_role(self) -> VertexRole {
        match self {
            Self::Forward => VertexRole::Source,
            Self::SinkRooted => VertexRole::Sink,
        }
    }

    /// Role of the vertices the traversal never expands.
    #[must_use]
    pub fn terminal_role(self) -> VertexRole {
        match self {
            Self::Forward => VertexRole::Sink,
            Self::SinkRooted => VertexRole::Source,
        }
    }
}

/// Per-run discovery flag of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discovery {
    Unvisited,
    Visited,
}

// =============================================================================
// BFS
// =============================================================================

/// A single breadth-first run over a graph.
///
/// The run is lazy: each call to [`Bfs::next_vertex`] hands out the next
/// vertex in visitation order and expands it. Once exhausted it keeps
/// returning `None`; build a new `Bfs` to traverse again.
#[derive(Debug)]
pub struct Bfs<'g> {
    graph: &'g Graph,
    direction: Direction,
    discovery: Vec<Discovery>,
    queue: VecDeque<VertexId>,
}

impl<'g> Bfs<'g> {
    /// Start a traversal. Every discovery flag begins UNVISITED, then the
    /// roots are discovered in vertex insertion order.
    #[must_use]
    pub fn new(graph: &'g Graph, direction: Direction) -> Self {
        let mut discovery = vec![Discovery::Unvisited; graph.vertex_count()];
        let mut queue = VecDeque::new();
        for id in graph.vertices_with_role(direction.root_role()) {
            discovery[id.0] = Discovery::Visited;
            queue.push_back(id);
        }
        Self {
            graph,
            direction,
            discovery,
            queue,
        }
    }

    /// Source-rooted traversal following edges forward.
    #[must_use]
    pub fn forward(graph: &'g Graph) -> Self {
        Self::new(graph, Direction::Forward)
    }

    /// Sink-rooted traversal following edges backward.
    #[must_use]
    pub fn sink_rooted(graph: &'g Graph) -> Self {
        Self::new(graph, Direction::SinkRooted)
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Discovery flag of `id` in this run.
    #[must_use]
    pub fn discovery(&self, id: VertexId) -> Discovery {
        self.discovery[id.0]
    }

    /// Remove and return the next vertex, or `None` once exhausted.
    pub fn next_vertex(&mut self) -> Option<VertexId> {
        let current = self.queue.pop_front()?;
        let vertex = self.graph.vertex(current);
        if vertex.role() == self.direction.terminal_role() {
            return Some(current);
        }

        match self.direction {
            Direction::Forward => {
                for edge in vertex.out_edges() {
                    for &dst in self.graph.edge(*edge).dst() {
                        self.discover(dst);
                    }
                }
            }
            Direction::SinkRooted => {
                for edge in vertex.in_edges() {
                    let src = self.graph.edge(*edge).src();
                    self.discover(src);
                }
            }
        }
        Some(current)
    }

    fn discover(&mut self, id: VertexId) {
        if self.discovery[id.0] == Discovery::Unvisited {
            self.discovery[id.0] = Discovery::Visited;
            self.queue.push_back(id);
        }
    }
}

impl Iterator for Bfs<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_vertex()
    }
}

// =============================================================================
// TESTS
// =============================================================================
