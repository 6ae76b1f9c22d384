pub mod graph;
mod router;

pub use router::{AllPairs, RouteInfo, RouteInternalData, RoutesInternalData};
use std::{collections::HashMap, sync::Arc, time::Instant};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Bus, Catalog},
    routing::graph::{Edge, Graph, VertexId},
};

/// Converts km/h into meters per minute, the unit edge weights divide by.
const VELOCITY_SCALE: f64 = 1000.0 / 60.0;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Bus wait time must be at least one minute, got {0}")]
    InvalidWaitTime(i32),
    #[error("Bus velocity must be positive, got {0}")]
    InvalidVelocity(f64),
}

/// Routing parameters as ingested: minutes of boarding delay and km/h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingSettings {
    pub bus_wait_time: i32,
    pub bus_velocity: f64,
}

impl RoutingSettings {
    pub fn new(bus_wait_time: i32, bus_velocity: f64) -> Result<Self, Error> {
        if bus_wait_time < 1 {
            return Err(Error::InvalidWaitTime(bus_wait_time));
        }
        if bus_velocity <= 0.0 {
            return Err(Error::InvalidVelocity(bus_velocity));
        }
        Ok(Self {
            bus_wait_time,
            bus_velocity,
        })
    }
}

/// One leg of an answered route.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteItem {
    /// Boarding delay at a stop.
    Wait { stop_name: Arc<str>, time: f64 },
    /// A ride over `span_count` stop hops on a single boarding.
    Ride {
        bus: Arc<str>,
        span_count: u32,
        time: f64,
    },
}

impl RouteItem {
    pub fn time(&self) -> f64 {
        match self {
            RouteItem::Wait { time, .. } => *time,
            RouteItem::Ride { time, .. } => *time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub items: Vec<RouteItem>,
    pub total_time: f64,
}

/// Fastest-route engine over the catalog's network.
///
/// Every stop contributes a wait vertex (`2i`) and a ride vertex (`2i + 1`);
/// the wait edge between them encodes the boarding delay, and ride edges
/// connect every boarding stop to every stop reachable on the same boarding.
/// All-pairs shortest paths over that graph are precomputed once and either
/// persisted or restored verbatim, never recomputed at query time.
#[derive(Debug, Clone)]
pub struct TransportRouter {
    settings: RoutingSettings,
    graph: Graph,
    /// Stop names in canonical order; position ×2 is the stop's wait vertex.
    stop_names: Vec<Arc<str>>,
    stop_lookup: HashMap<Arc<str>, usize>,
    routes: AllPairs,
}

impl TransportRouter {
    pub fn build(settings: RoutingSettings, catalog: &Catalog) -> Self {
        debug!("Building route graph...");
        let now = Instant::now();
        let mut graph = Graph::new(catalog.stop_count() * 2);
        let stop_names = Self::fill_wait_edges(&mut graph, catalog, settings.bus_wait_time as f64);
        Self::fill_ride_edges(&mut graph, catalog, settings.bus_velocity * VELOCITY_SCALE);
        debug!(
            "Building route graph with {} edges took {:?}",
            graph.edge_count(),
            now.elapsed()
        );

        debug!("Precomputing all-pairs shortest paths...");
        let now = Instant::now();
        let routes = AllPairs::build(&graph);
        debug!(
            "Precomputing {} vertices took {:?}",
            graph.vertex_count(),
            now.elapsed()
        );

        Self::assemble(settings, graph, stop_names, routes)
    }

    /// Reassembles a router from its persisted parts; the all-pairs table
    /// is taken as-is.
    pub fn from_parts(
        settings: RoutingSettings,
        graph: Graph,
        stop_names: Vec<Arc<str>>,
        routes: AllPairs,
    ) -> Self {
        Self::assemble(settings, graph, stop_names, routes)
    }

    fn assemble(
        settings: RoutingSettings,
        graph: Graph,
        stop_names: Vec<Arc<str>>,
        routes: AllPairs,
    ) -> Self {
        let stop_lookup = stop_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            settings,
            graph,
            stop_names,
            stop_lookup,
            routes,
        }
    }

    fn wait_vertex(stop_idx: u32) -> VertexId {
        2 * stop_idx as usize
    }

    fn ride_vertex(stop_idx: u32) -> VertexId {
        2 * stop_idx as usize + 1
    }

    fn fill_wait_edges(graph: &mut Graph, catalog: &Catalog, wait_time: f64) -> Vec<Arc<str>> {
        let mut stop_names = Vec::with_capacity(catalog.stop_count());
        for stop in catalog.stops() {
            graph.add_edge(Edge {
                from: Self::wait_vertex(stop.index),
                to: Self::ride_vertex(stop.index),
                weight: wait_time,
                name: stop.name.clone(),
                span_count: 0,
            });
            stop_names.push(stop.name.clone());
        }
        stop_names
    }

    fn fill_ride_edges(graph: &mut Graph, catalog: &Catalog, velocity: f64) {
        for bus in catalog.buses() {
            let last = bus.stops.len().saturating_sub(1);
            if bus.is_roundtrip {
                Self::add_ride_edges(graph, catalog, bus, 0, last, true, velocity);
            } else {
                // The two halves of an expanded sequence are ridden on
                // separate boardings; no edge may bridge the turnaround.
                let mid = bus.stops.len() / 2;
                Self::add_ride_edges(graph, catalog, bus, 0, mid, false, velocity);
                Self::add_ride_edges(graph, catalog, bus, mid, last, false, velocity);
            }
        }
    }

    /// Emits one edge per (boarding, alighting) pair within
    /// `stops[lo..=hi]`, accumulating directed road distances. For a cycle
    /// the full-loop pair is skipped.
    fn add_ride_edges(
        graph: &mut Graph,
        catalog: &Catalog,
        bus: &Bus,
        lo: usize,
        hi: usize,
        skip_full_cycle: bool,
        velocity: f64,
    ) {
        let stops = &bus.stops;
        for from in lo..hi {
            let mut weight = 0.0;
            let mut span_count = 0;
            for to in from + 1..=hi {
                weight += catalog.distance(stops[to - 1], stops[to]) as f64 / velocity;
                span_count += 1;
                if skip_full_cycle && from == 0 && to == hi {
                    continue;
                }
                graph.add_edge(Edge {
                    from: Self::ride_vertex(stops[from]),
                    to: Self::wait_vertex(stops[to]),
                    weight,
                    name: bus.name.clone(),
                    span_count,
                });
            }
        }
    }

    /// Fastest itinerary between two stops by name, rebuilt from the
    /// precomputed tables. `None` when either stop is unknown or no path
    /// exists.
    pub fn route(&self, from: &str, to: &str) -> Option<Itinerary> {
        let from_vertex = 2 * self.stop_lookup.get(from)?;
        let to_vertex = 2 * self.stop_lookup.get(to)?;
        let info = self.routes.route(&self.graph, from_vertex, to_vertex)?;

        let items: Vec<RouteItem> = info
            .edges
            .iter()
            .map(|edge_id| {
                let edge = self.graph.edge(*edge_id);
                if edge.span_count == 0 {
                    RouteItem::Wait {
                        stop_name: edge.name.clone(),
                        time: edge.weight,
                    }
                } else {
                    RouteItem::Ride {
                        bus: edge.name.clone(),
                        span_count: edge.span_count,
                        time: edge.weight,
                    }
                }
            })
            .collect();
        let total_time = items.iter().map(RouteItem::time).sum();
        Some(Itinerary { items, total_time })
    }

    pub fn settings(&self) -> &RoutingSettings {
        &self.settings
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn stop_names(&self) -> &[Arc<str>] {
        &self.stop_names
    }

    pub fn routes(&self) -> &AllPairs {
        &self.routes
    }
}
