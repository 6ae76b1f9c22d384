mod response;

pub use response::*;
use std::collections::HashSet;

use crate::{
    catalog::Catalog,
    model::{StatOp, StatRequest},
    render::MapRenderer,
    routing::TransportRouter,
};

/// Answers a batch of typed queries against the loaded state.
///
/// Every borrowed structure is read-only; unknown names and unroutable
/// pairs degrade to a `not found` entry while the rest of the batch keeps
/// going. Replies come back in request order.
pub struct QueryHandler<'a> {
    catalog: &'a Catalog,
    renderer: &'a MapRenderer,
    router: &'a TransportRouter,
}

impl<'a> QueryHandler<'a> {
    pub fn new(
        catalog: &'a Catalog,
        renderer: &'a MapRenderer,
        router: &'a TransportRouter,
    ) -> Self {
        Self {
            catalog,
            renderer,
            router,
        }
    }

    pub fn process(&self, requests: &[StatRequest]) -> Vec<Response> {
        requests.iter().map(|request| self.dispatch(request)).collect()
    }

    fn dispatch(&self, request: &StatRequest) -> Response {
        match &request.op {
            StatOp::Stop { name } => self.stop_stat(request.id, name),
            StatOp::Bus { name } => self.bus_stat(request.id, name),
            StatOp::Map => self.map_stat(request.id),
            StatOp::Route { from, to } => self.route_stat(request.id, from, to),
        }
    }

    fn stop_stat(&self, request_id: i32, name: &str) -> Response {
        match self.catalog.buses_at_stop(name) {
            Some(buses) => Response::Stop(StopStat {
                request_id,
                buses: buses.iter().map(|bus| bus.to_string()).collect(),
            }),
            None => Response::not_found(request_id),
        }
    }

    fn bus_stat(&self, request_id: i32, name: &str) -> Response {
        let Some(bus) = self.catalog.find_bus(name) else {
            return Response::not_found(request_id);
        };
        let route_length = self.catalog.route_length(bus);
        let geographic_length = self.catalog.geographic_length(bus);
        let unique_stops: HashSet<u32> = bus.stops.iter().copied().collect();
        Response::Bus(BusStat {
            request_id,
            curvature: route_length as f64 / geographic_length,
            route_length,
            stop_count: bus.stops.len(),
            unique_stop_count: unique_stops.len(),
        })
    }

    fn map_stat(&self, request_id: i32) -> Response {
        Response::Map(MapStat {
            request_id,
            map: self.renderer.render(self.catalog),
        })
    }

    fn route_stat(&self, request_id: i32, from: &str, to: &str) -> Response {
        match self.router.route(from, to) {
            Some(itinerary) => Response::Route(RouteStat::new(request_id, itinerary)),
            None => Response::not_found(request_id),
        }
    }
}
