pub mod schema;

use std::{fs, path::Path, sync::Arc, time::Instant};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{self, BusSpec, Catalog, StopSpec},
    geo::Coordinates,
    render::{MapRenderer, RenderSettings, svg},
    routing::{
        AllPairs, RouteInternalData, RoutingSettings, TransportRouter,
        graph::{Edge, Graph},
    },
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Artifact decode error: {0}")]
    Decode(#[from] bitcode::Error),
    #[error("Artifact is internally inconsistent: {0}")]
    Corrupt(#[from] catalog::Error),
}

/// Everything the query phase needs, restored from one artifact.
#[derive(Debug)]
pub struct Artifact {
    pub catalog: Catalog,
    pub renderer: MapRenderer,
    pub router: TransportRouter,
}

/// Writes the complete query model to `path` as a single binary message.
pub fn save(
    path: &Path,
    catalog: &Catalog,
    renderer: &MapRenderer,
    router: &TransportRouter,
) -> Result<(), Error> {
    debug!("Serializing query model...");
    let now = Instant::now();
    let artifact = schema::TransportCatalogue {
        stops: encode_stops(catalog),
        buses: encode_buses(catalog),
        map_renderer: encode_renderer(renderer),
        transport_router: encode_router(router),
    };
    let bytes = artifact.encode();
    fs::write(path, &bytes)?;
    debug!(
        "Serializing {} bytes to {:?} took {:?}",
        bytes.len(),
        path,
        now.elapsed()
    );
    Ok(())
}

/// Reads the artifact back. Catalog and renderer re-enter their normal
/// builders from the decoded records; the router is restored directly from
/// its stored tables, so no shortest-path work happens here.
pub fn load(path: &Path) -> Result<Artifact, Error> {
    debug!("Deserializing query model...");
    let now = Instant::now();
    let bytes = fs::read(path)?;
    let artifact = schema::TransportCatalogue::decode(&bytes)?;

    let stop_specs: Vec<StopSpec> = artifact.stops.into_iter().map(decode_stop).collect();
    let bus_specs: Vec<BusSpec> = artifact.buses.into_iter().map(decode_bus).collect();
    let catalog = Catalog::build(stop_specs, bus_specs)?;
    let renderer = decode_renderer(artifact.map_renderer);
    let router = decode_router(artifact.transport_router);
    debug!(
        "Deserializing {} bytes from {:?} took {:?}",
        bytes.len(),
        path,
        now.elapsed()
    );
    Ok(Artifact {
        catalog,
        renderer,
        router,
    })
}

fn encode_coordinates(coordinates: Coordinates) -> schema::Coordinates {
    schema::Coordinates {
        lat: coordinates.lat,
        lng: coordinates.lng,
    }
}

fn decode_coordinates(coordinates: schema::Coordinates) -> Coordinates {
    Coordinates::new(coordinates.lat, coordinates.lng)
}

/// Every stop carries its outgoing distances, scanned over destinations in
/// canonical order so the artifact is deterministic.
fn encode_stops(catalog: &Catalog) -> Vec<schema::Stop> {
    catalog
        .stops()
        .iter()
        .map(|stop| {
            let distances = catalog
                .stops()
                .iter()
                .filter_map(|stop_to| {
                    let meters = catalog.distance(stop.index, stop_to.index);
                    (meters != 0).then(|| schema::RoadDistance {
                        stop_to: stop_to.name.to_string(),
                        meters,
                    })
                })
                .collect();
            schema::Stop {
                name: stop.name.to_string(),
                coordinates: encode_coordinates(stop.coordinates),
                distances,
            }
        })
        .collect()
}

fn decode_stop(stop: schema::Stop) -> StopSpec {
    StopSpec {
        name: stop.name,
        coordinates: decode_coordinates(stop.coordinates),
        road_distances: stop
            .distances
            .into_iter()
            .map(|distance| (distance.stop_to, distance.meters))
            .collect(),
    }
}

fn encode_buses(catalog: &Catalog) -> Vec<schema::Bus> {
    catalog
        .buses()
        .iter()
        .map(|bus| schema::Bus {
            name: bus.name.to_string(),
            is_roundtrip: bus.is_roundtrip,
            stops: bus
                .stops
                .iter()
                .map(|stop_idx| catalog.stops()[*stop_idx as usize].name.to_string())
                .collect(),
        })
        .collect()
}

fn decode_bus(bus: schema::Bus) -> BusSpec {
    // The stored sequence is already expanded; it feeds the catalog builder
    // untouched.
    BusSpec {
        name: bus.name,
        stops: bus.stops,
        is_roundtrip: bus.is_roundtrip,
    }
}

fn encode_color(color: &svg::Color) -> schema::Color {
    match color {
        svg::Color::None => schema::Color::Monostate,
        svg::Color::Named(name) => schema::Color::Named(name.clone()),
        svg::Color::Rgb(rgb) => schema::Color::Rgb {
            red: rgb.red,
            green: rgb.green,
            blue: rgb.blue,
        },
        svg::Color::Rgba(rgba) => schema::Color::Rgba {
            red: rgba.red,
            green: rgba.green,
            blue: rgba.blue,
            opacity: rgba.opacity,
        },
    }
}

fn decode_color(color: schema::Color) -> svg::Color {
    match color {
        schema::Color::Monostate => svg::Color::None,
        schema::Color::Named(name) => svg::Color::Named(name),
        schema::Color::Rgb { red, green, blue } => svg::Color::Rgb(svg::Rgb { red, green, blue }),
        schema::Color::Rgba {
            red,
            green,
            blue,
            opacity,
        } => svg::Color::Rgba(svg::Rgba {
            red,
            green,
            blue,
            opacity,
        }),
    }
}

fn encode_renderer(renderer: &MapRenderer) -> schema::MapRenderer {
    let settings = renderer.settings();
    schema::MapRenderer {
        render_settings: schema::RenderSettings {
            width: settings.width,
            height: settings.height,
            padding: settings.padding,
            line_width: settings.line_width,
            stop_radius: settings.stop_radius,
            bus_label_font_size: settings.bus_label_font_size,
            bus_label_offset: settings.bus_label_offset,
            stop_label_font_size: settings.stop_label_font_size,
            stop_label_offset: settings.stop_label_offset,
            underlayer_color: encode_color(&settings.underlayer_color),
            underlayer_width: settings.underlayer_width,
            color_palette: settings.color_palette.iter().map(encode_color).collect(),
        },
        active_coordinates: renderer
            .active_coordinates()
            .iter()
            .copied()
            .map(encode_coordinates)
            .collect(),
    }
}

fn decode_renderer(renderer: schema::MapRenderer) -> MapRenderer {
    let settings = renderer.render_settings;
    MapRenderer::from_parts(
        RenderSettings {
            width: settings.width,
            height: settings.height,
            padding: settings.padding,
            line_width: settings.line_width,
            stop_radius: settings.stop_radius,
            bus_label_font_size: settings.bus_label_font_size,
            bus_label_offset: settings.bus_label_offset,
            stop_label_font_size: settings.stop_label_font_size,
            stop_label_offset: settings.stop_label_offset,
            underlayer_color: decode_color(settings.underlayer_color),
            underlayer_width: settings.underlayer_width,
            color_palette: settings
                .color_palette
                .into_iter()
                .map(decode_color)
                .collect(),
        },
        renderer
            .active_coordinates
            .into_iter()
            .map(decode_coordinates)
            .collect(),
    )
}

fn encode_router(router: &TransportRouter) -> schema::TransportRouter {
    let graph = schema::Graph {
        edges: router
            .graph()
            .edges()
            .iter()
            .map(|edge| schema::Edge {
                vert_from: edge.from as u32,
                vert_to: edge.to as u32,
                weight: edge.weight,
                name: edge.name.to_string(),
                span_count: edge.span_count,
            })
            .collect(),
        incidence_lists: router
            .graph()
            .incidence_lists()
            .iter()
            .map(|edges| edges.iter().map(|edge_id| *edge_id as u32).collect())
            .collect(),
    };
    let routes_internal_data = router
        .routes()
        .data()
        .iter()
        .map(|row| schema::RoutesInternalData {
            cells: row
                .iter()
                .map(|cell| {
                    cell.map(|data| schema::RouteInternalData {
                        weight: data.weight,
                        prev_edge_id: data.prev_edge.map(|edge_id| edge_id as u32),
                    })
                })
                .collect(),
        })
        .collect();
    schema::TransportRouter {
        routing_settings: schema::RoutingSettings {
            bus_wait_time: router.settings().bus_wait_time,
            bus_velocity: router.settings().bus_velocity,
        },
        graph,
        stop_names: router.stop_names().iter().map(|name| name.to_string()).collect(),
        routes_internal_data,
    }
}

fn decode_router(router: schema::TransportRouter) -> TransportRouter {
    let settings = RoutingSettings {
        bus_wait_time: router.routing_settings.bus_wait_time,
        bus_velocity: router.routing_settings.bus_velocity,
    };
    let edges = router
        .graph
        .edges
        .into_iter()
        .map(|edge| Edge {
            from: edge.vert_from as usize,
            to: edge.vert_to as usize,
            weight: edge.weight,
            name: edge.name.into(),
            span_count: edge.span_count,
        })
        .collect();
    let incidence_lists = router
        .graph
        .incidence_lists
        .into_iter()
        .map(|edges| edges.into_iter().map(|edge_id| edge_id as usize).collect())
        .collect();
    let graph = Graph::from_parts(edges, incidence_lists);

    let data = router
        .routes_internal_data
        .into_iter()
        .map(|row| {
            row.cells
                .into_iter()
                .map(|cell| {
                    cell.map(|data| RouteInternalData {
                        weight: data.weight,
                        prev_edge: data.prev_edge_id.map(|edge_id| edge_id as usize),
                    })
                })
                .collect()
        })
        .collect();

    let stop_names: Vec<Arc<str>> = router
        .stop_names
        .into_iter()
        .map(|name| name.into())
        .collect();
    TransportRouter::from_parts(settings, graph, stop_names, AllPairs::from_data(data))
}
