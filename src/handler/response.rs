use serde::Serialize;

use crate::routing::{Itinerary, RouteItem};

/// One reply object; serializes to exactly the fields of its variant.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    Stop(StopStat),
    Bus(BusStat),
    Map(MapStat),
    Route(RouteStat),
    Error(ErrorStat),
}

impl Response {
    pub fn not_found(request_id: i32) -> Self {
        Response::Error(ErrorStat {
            request_id,
            error_message: "not found".to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StopStat {
    pub request_id: i32,
    pub buses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BusStat {
    pub request_id: i32,
    pub curvature: f64,
    pub route_length: u32,
    pub stop_count: usize,
    pub unique_stop_count: usize,
}

#[derive(Debug, Serialize)]
pub struct MapStat {
    pub request_id: i32,
    pub map: String,
}

#[derive(Debug, Serialize)]
pub struct RouteStat {
    pub request_id: i32,
    pub items: Vec<ItemStat>,
    pub total_time: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ItemStat {
    Wait {
        stop_name: String,
        time: f64,
    },
    Bus {
        bus: String,
        span_count: u32,
        time: f64,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorStat {
    pub request_id: i32,
    pub error_message: String,
}

impl RouteStat {
    pub fn new(request_id: i32, itinerary: Itinerary) -> Self {
        let items = itinerary
            .items
            .into_iter()
            .map(|item| match item {
                RouteItem::Wait { stop_name, time } => ItemStat::Wait {
                    stop_name: stop_name.to_string(),
                    time,
                },
                RouteItem::Ride {
                    bus,
                    span_count,
                    time,
                } => ItemStat::Bus {
                    bus: bus.to_string(),
                    span_count,
                    time,
                },
            })
            .collect();
        Self {
            request_id,
            items,
            total_time: itinerary.total_time,
        }
    }
}
