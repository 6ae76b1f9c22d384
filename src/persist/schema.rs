use bitcode::{Decode, Encode};

/// Root message of the binary artifact. Field contents mirror the in-memory
/// state closely enough that encode/decode is a structural round-trip, but
/// every cross-reference is by name or plain id so the layout owes nothing
/// to process addresses.
#[derive(Debug, Encode, Decode)]
pub struct TransportCatalogue {
    pub stops: Vec<Stop>,
    pub buses: Vec<Bus>,
    pub map_renderer: MapRenderer,
    pub transport_router: TransportRouter,
}

impl TransportCatalogue {
    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bitcode::Error> {
        bitcode::decode(bytes)
    }
}

#[derive(Debug, Encode, Decode)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A stop plus its sparse outgoing road distances.
#[derive(Debug, Encode, Decode)]
pub struct Stop {
    pub name: String,
    pub coordinates: Coordinates,
    pub distances: Vec<RoadDistance>,
}

#[derive(Debug, Encode, Decode)]
pub struct RoadDistance {
    pub stop_to: String,
    pub meters: u32,
}

/// A bus with its post-expansion stop sequence.
#[derive(Debug, Encode, Decode)]
pub struct Bus {
    pub name: String,
    pub is_roundtrip: bool,
    pub stops: Vec<String>,
}

#[derive(Debug, Encode, Decode)]
pub enum Color {
    Monostate,
    Named(String),
    Rgb {
        red: u8,
        green: u8,
        blue: u8,
    },
    Rgba {
        red: u8,
        green: u8,
        blue: u8,
        opacity: f64,
    },
}

#[derive(Debug, Encode, Decode)]
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

#[derive(Debug, Encode, Decode)]
pub struct MapRenderer {
    pub render_settings: RenderSettings,
    pub active_coordinates: Vec<Coordinates>,
}

/// Routing parameters exactly as ingested: minutes and km/h, pre-scaling.
#[derive(Debug, Encode, Decode)]
pub struct RoutingSettings {
    pub bus_wait_time: i32,
    pub bus_velocity: f64,
}

#[derive(Debug, Encode, Decode)]
pub struct Edge {
    pub vert_from: u32,
    pub vert_to: u32,
    pub weight: f64,
    pub name: String,
    pub span_count: u32,
}

#[derive(Debug, Encode, Decode)]
pub struct Graph {
    pub edges: Vec<Edge>,
    pub incidence_lists: Vec<Vec<u32>>,
}

#[derive(Debug, Encode, Decode)]
pub struct RouteInternalData {
    pub weight: f64,
    pub prev_edge_id: Option<u32>,
}

/// One row of the all-pairs table. Unreachable cells keep their `None`
/// discriminant so the matrix round-trips shape-exactly.
#[derive(Debug, Encode, Decode)]
pub struct RoutesInternalData {
    pub cells: Vec<Option<RouteInternalData>>,
}

#[derive(Debug, Encode, Decode)]
pub struct TransportRouter {
    pub routing_settings: RoutingSettings,
    pub graph: Graph,
    pub stop_names: Vec<String>,
    pub routes_internal_data: Vec<RoutesInternalData>,
}
