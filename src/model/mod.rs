use serde::Deserialize;
use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    catalog::{BusSpec, StopSpec},
    geo::Coordinates,
    render,
    render::svg,
};

/// The build-phase document: network definition plus every settings block.
#[derive(Debug, Deserialize)]
pub struct BaseDocument {
    pub base_requests: Vec<BaseRequest>,
    pub render_settings: RenderSettings,
    pub routing_settings: RoutingSettings,
    pub serialization_settings: SerializationSettings,
}

/// The query-phase document: requests plus the artifact location.
#[derive(Debug, Deserialize)]
pub struct StatDocument {
    pub stat_requests: Vec<StatRequest>,
    pub serialization_settings: SerializationSettings,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop(StopRequest),
    Bus(BusRequest),
}

#[derive(Debug, Deserialize)]
pub struct StopRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Sparse directional distances; a sorted map so ingestion order is
    /// deterministic.
    #[serde(default)]
    pub road_distances: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
pub struct BusRequest {
    pub name: String,
    pub is_roundtrip: bool,
    pub stops: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatRequest {
    pub id: i32,
    #[serde(flatten)]
    pub op: StatOp,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StatOp {
    Stop { name: String },
    Bus { name: String },
    Map,
    Route { from: String, to: String },
}

#[derive(Debug, Deserialize)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: [f64; 2],
    pub stop_label_font_size: u32,
    pub stop_label_offset: [f64; 2],
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
}

/// A color as it appears in the document: a name, an RGB triple or an RGBA
/// quadruple.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

#[derive(Debug, Deserialize)]
pub struct RoutingSettings {
    /// Boarding delay in minutes.
    pub bus_wait_time: i32,
    /// Bus velocity in km/h.
    pub bus_velocity: f64,
}

#[derive(Debug, Deserialize)]
pub struct SerializationSettings {
    pub file: PathBuf,
}

impl From<StopRequest> for StopSpec {
    fn from(request: StopRequest) -> Self {
        Self {
            name: request.name,
            coordinates: Coordinates::new(request.latitude, request.longitude),
            road_distances: request.road_distances.into_iter().collect(),
        }
    }
}

impl From<BusRequest> for BusSpec {
    /// Expands the one-way sequence of a non-roundtrip line into
    /// forward-plus-reversed-interior form. Roundtrip sequences are kept as
    /// the full cycle.
    fn from(request: BusRequest) -> Self {
        let mut stops = request.stops;
        if !request.is_roundtrip {
            for i in (0..stops.len().saturating_sub(1)).rev() {
                stops.push(stops[i].clone());
            }
        }
        Self {
            name: request.name,
            stops,
            is_roundtrip: request.is_roundtrip,
        }
    }
}

impl From<Color> for svg::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Named(name) => svg::Color::Named(name),
            Color::Rgb(red, green, blue) => svg::Color::Rgb(svg::Rgb { red, green, blue }),
            Color::Rgba(red, green, blue, opacity) => svg::Color::Rgba(svg::Rgba {
                red,
                green,
                blue,
                opacity,
            }),
        }
    }
}

impl From<RenderSettings> for render::RenderSettings {
    fn from(settings: RenderSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            padding: settings.padding,
            line_width: settings.line_width,
            stop_radius: settings.stop_radius,
            bus_label_font_size: settings.bus_label_font_size,
            bus_label_offset: settings.bus_label_offset,
            stop_label_font_size: settings.stop_label_font_size,
            stop_label_offset: settings.stop_label_offset,
            underlayer_color: settings.underlayer_color.into(),
            underlayer_width: settings.underlayer_width,
            color_palette: settings
                .color_palette
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
