use rayon::prelude::*;

use super::graph::{EdgeId, Graph, VertexId};

/// Best known way to reach `v` from `u`: total weight plus the last edge of
/// the path. `prev_edge` is `None` only on the trivial diagonal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInternalData {
    pub weight: f64,
    pub prev_edge: Option<EdgeId>,
}

pub type RoutesInternalData = Vec<Vec<Option<RouteInternalData>>>;

/// A reconstructed shortest path: its weight and the edge ids in traversal
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub weight: f64,
    pub edges: Vec<EdgeId>,
}

/// Dense all-pairs shortest paths over a [`Graph`].
///
/// The table is the expensive build-phase product; once computed (or loaded
/// back from the artifact) every query is answered by walking predecessor
/// edges, with no further search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllPairs {
    data: RoutesInternalData,
}

impl AllPairs {
    pub fn build(graph: &Graph) -> Self {
        let vertex_count = graph.vertex_count();
        let mut data: RoutesInternalData = vec![vec![None; vertex_count]; vertex_count];

        for vertex in 0..vertex_count {
            data[vertex][vertex] = Some(RouteInternalData {
                weight: 0.0,
                prev_edge: None,
            });
        }
        for (id, edge) in graph.edges().iter().enumerate() {
            let cell = &mut data[edge.from][edge.to];
            let cheaper = cell.is_none_or(|existing| edge.weight < existing.weight);
            if cheaper {
                *cell = Some(RouteInternalData {
                    weight: edge.weight,
                    prev_edge: Some(id),
                });
            }
        }

        for pivot in 0..vertex_count {
            // Row `pivot` cannot improve during its own round, so a snapshot
            // of it lets the remaining rows relax independently.
            let pivot_row = data[pivot].clone();
            data.par_iter_mut().for_each(|row| {
                let Some(through) = row[pivot] else {
                    return;
                };
                for (target, pivot_cell) in pivot_row.iter().enumerate() {
                    let Some(continuation) = pivot_cell else {
                        continue;
                    };
                    let candidate = through.weight + continuation.weight;
                    let cheaper = row[target].is_none_or(|current| candidate < current.weight);
                    if cheaper {
                        row[target] = Some(RouteInternalData {
                            weight: candidate,
                            prev_edge: continuation.prev_edge,
                        });
                    }
                }
            });
        }

        Self { data }
    }

    /// Reassembles the table from its persisted rows.
    pub fn from_data(data: RoutesInternalData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &RoutesInternalData {
        &self.data
    }

    /// Walks predecessor edges back from `to`, yielding the path in
    /// traversal order. `None` when the pair is unreachable.
    pub fn route(&self, graph: &Graph, from: VertexId, to: VertexId) -> Option<RouteInfo> {
        let target = self.data[from][to]?;
        let mut edges = Vec::new();
        let mut cursor = to;
        while cursor != from {
            let edge_id = self.data[from][cursor]?.prev_edge?;
            edges.push(edge_id);
            cursor = graph.edge(edge_id).from;
        }
        edges.reverse();
        Some(RouteInfo {
            weight: target.weight,
            edges,
        })
    }
}
