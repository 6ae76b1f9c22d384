mod projector;
pub mod svg;

pub use projector::Projector;
use std::collections::BTreeMap;

use crate::{
    catalog::{Bus, Catalog, Stop},
    geo::Coordinates,
    render::svg::{Circle, Color, Document, LineCap, LineJoin, Point, Polyline, Text},
};

#[derive(Debug, Clone, PartialEq)]
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

/// Renders the network map as an SVG document.
///
/// The renderer owns its persisted inputs: the style settings and the flat
/// coordinate list the projector is calibrated with. Geometry is read from
/// the catalog at render time, so the drawn map and the catalog can never
/// disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRenderer {
    settings: RenderSettings,
    /// Every coordinate of every drawn bus, in bus ingestion order,
    /// duplicates preserved.
    active_coordinates: Vec<Coordinates>,
}

/// A bus is drawn only when its stored sequence has at least two stops;
/// degenerate single-stop lines stay off the map.
fn is_active(bus: &Bus) -> bool {
    bus.stops.len() >= 2
}

impl MapRenderer {
    pub fn new(settings: RenderSettings, catalog: &Catalog) -> Self {
        let mut active_coordinates = Vec::new();
        for bus in catalog.buses().iter().filter(|bus| is_active(bus)) {
            for stop_idx in bus.stops.iter() {
                active_coordinates.push(catalog.stops()[*stop_idx as usize].coordinates);
            }
        }
        Self {
            settings,
            active_coordinates,
        }
    }

    /// Reassembles a renderer from its persisted parts.
    pub fn from_parts(settings: RenderSettings, active_coordinates: Vec<Coordinates>) -> Self {
        Self {
            settings,
            active_coordinates,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn active_coordinates(&self) -> &[Coordinates] {
        &self.active_coordinates
    }

    /// Draws the four map layers in their fixed stacking order: bus lines,
    /// bus name labels, stop circles, stop name labels. Buses and stops are
    /// iterated lexicographically by name, so the output is reproducible
    /// byte for byte.
    pub fn render(&self, catalog: &Catalog) -> String {
        let projector = Projector::new(
            &self.active_coordinates,
            self.settings.width,
            self.settings.height,
            self.settings.padding,
        );

        let active_buses: BTreeMap<&str, &Bus> = catalog
            .buses()
            .iter()
            .filter(|bus| is_active(bus))
            .map(|bus| (bus.name.as_ref(), bus))
            .collect();
        let active_stops: BTreeMap<&str, &Stop> = active_buses
            .values()
            .flat_map(|bus| bus.stops.iter())
            .map(|stop_idx| {
                let stop = &catalog.stops()[*stop_idx as usize];
                (stop.name.as_ref(), stop)
            })
            .collect();

        let mut document = Document::new();
        self.draw_bus_lines(&mut document, &projector, &active_buses, catalog);
        self.draw_bus_labels(&mut document, &projector, &active_buses, catalog);
        self.draw_stop_circles(&mut document, &projector, &active_stops);
        self.draw_stop_labels(&mut document, &projector, &active_stops);
        document.render()
    }

    fn palette_color(&self, ordinal: usize) -> Color {
        self.settings.color_palette[ordinal % self.settings.color_palette.len()].clone()
    }

    fn draw_bus_lines(
        &self,
        document: &mut Document,
        projector: &Projector,
        active_buses: &BTreeMap<&str, &Bus>,
        catalog: &Catalog,
    ) {
        for (ordinal, bus) in active_buses.values().enumerate() {
            let mut line = Polyline::new();
            for stop_idx in bus.stops.iter() {
                let stop = &catalog.stops()[*stop_idx as usize];
                line = line.add_point(projector.project(stop.coordinates));
            }
            document.add(
                line.with_stroke(self.palette_color(ordinal))
                    .with_fill(Color::Named("none".to_string()))
                    .with_stroke_width(self.settings.line_width)
                    .with_stroke_linecap(LineCap::Round)
                    .with_stroke_linejoin(LineJoin::Round),
            );
        }
    }

    fn bus_label(&self, bus: &Bus, position: Point) -> Text {
        Text::new()
            .with_data(&bus.name)
            .with_position(position)
            .with_offset(Point::new(
                self.settings.bus_label_offset[0],
                self.settings.bus_label_offset[1],
            ))
            .with_font_size(self.settings.bus_label_font_size)
            .with_font_family("Verdana")
            .with_font_weight("bold")
    }

    fn draw_bus_labels(
        &self,
        document: &mut Document,
        projector: &Projector,
        active_buses: &BTreeMap<&str, &Bus>,
        catalog: &Catalog,
    ) {
        for (ordinal, bus) in active_buses.values().enumerate() {
            let stops = catalog.stops();
            let first = &stops[bus.stops[0] as usize];
            let mut anchors = vec![first];

            // Non-roundtrip lines are labelled at both termini, unless the
            // turnaround is the very stop the line starts from.
            let midpoint = &stops[bus.stops[bus.stops.len() / 2] as usize];
            if !bus.is_roundtrip && midpoint.index != first.index {
                anchors.push(midpoint);
            }

            for anchor in anchors {
                let position = projector.project(anchor.coordinates);
                document.add(
                    self.bus_label(bus, position)
                        .with_fill(self.settings.underlayer_color.clone())
                        .with_stroke(self.settings.underlayer_color.clone())
                        .with_stroke_width(self.settings.underlayer_width)
                        .with_stroke_linecap(LineCap::Round)
                        .with_stroke_linejoin(LineJoin::Round),
                );
                document.add(self.bus_label(bus, position).with_fill(self.palette_color(ordinal)));
            }
        }
    }

    fn draw_stop_circles(
        &self,
        document: &mut Document,
        projector: &Projector,
        active_stops: &BTreeMap<&str, &Stop>,
    ) {
        for stop in active_stops.values() {
            document.add(
                Circle::new(projector.project(stop.coordinates), self.settings.stop_radius)
                    .with_fill(Color::Named("white".to_string())),
            );
        }
    }

    fn stop_label(&self, stop: &Stop, position: Point) -> Text {
        Text::new()
            .with_data(&stop.name)
            .with_position(position)
            .with_offset(Point::new(
                self.settings.stop_label_offset[0],
                self.settings.stop_label_offset[1],
            ))
            .with_font_size(self.settings.stop_label_font_size)
            .with_font_family("Verdana")
    }

    fn draw_stop_labels(
        &self,
        document: &mut Document,
        projector: &Projector,
        active_stops: &BTreeMap<&str, &Stop>,
    ) {
        for stop in active_stops.values() {
            let position = projector.project(stop.coordinates);
            document.add(
                self.stop_label(stop, position)
                    .with_fill(self.settings.underlayer_color.clone())
                    .with_stroke(self.settings.underlayer_color.clone())
                    .with_stroke_width(self.settings.underlayer_width)
                    .with_stroke_linecap(LineCap::Round)
                    .with_stroke_linejoin(LineJoin::Round),
            );
            document.add(
                self.stop_label(stop, position)
                    .with_fill(Color::Named("black".to_string())),
            );
        }
    }
}
