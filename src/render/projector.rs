use super::svg::Point;
use crate::geo::Coordinates;

const EPSILON: f64 = 1e-6;

fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Projects geographic coordinates onto a flat viewport.
///
/// The zoom factor is uniform in both axes and calibrated so the input
/// points fit the padded viewport; with no usable spread the zoom is 0 and
/// every point lands on `(padding, padding)`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Projector {
    padding: f64,
    min_lng: f64,
    max_lat: f64,
    zoom: f64,
}

impl Projector {
    pub fn new(points: &[Coordinates], width: f64, height: f64, padding: f64) -> Self {
        let mut projector = Self {
            padding,
            ..Self::default()
        };
        if points.is_empty() {
            return projector;
        }

        let mut min_lng = f64::INFINITY;
        let mut max_lng = f64::NEG_INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        for point in points {
            min_lng = min_lng.min(point.lng);
            max_lng = max_lng.max(point.lng);
            min_lat = min_lat.min(point.lat);
            max_lat = max_lat.max(point.lat);
        }
        projector.min_lng = min_lng;
        projector.max_lat = max_lat;

        let width_zoom = if is_zero(max_lng - min_lng) {
            None
        } else {
            Some((width - 2.0 * padding) / (max_lng - min_lng))
        };
        let height_zoom = if is_zero(max_lat - min_lat) {
            None
        } else {
            Some((height - 2.0 * padding) / (max_lat - min_lat))
        };

        projector.zoom = match (width_zoom, height_zoom) {
            (Some(zx), Some(zy)) => zx.min(zy),
            (Some(zx), None) => zx,
            (None, Some(zy)) => zy,
            (None, None) => 0.0,
        };
        projector
    }

    pub fn project(&self, coordinates: Coordinates) -> Point {
        Point {
            x: (coordinates.lng - self.min_lng) * self.zoom + self.padding,
            y: (self.max_lat - coordinates.lat) * self.zoom + self.padding,
        }
    }
}

#[test]
fn projector_corners_test() {
    let points = [
        Coordinates::new(43.587795, 39.716901),
        Coordinates::new(43.581969, 39.719848),
    ];
    let projector = Projector::new(&points, 600.0, 400.0, 50.0);
    let top_left = projector.project(Coordinates::new(43.587795, 39.716901));
    assert!((top_left.x - 50.0).abs() < 1e-9);
    assert!((top_left.y - 50.0).abs() < 1e-9);
}

#[test]
fn projector_empty_test() {
    let projector = Projector::new(&[], 600.0, 400.0, 50.0);
    let point = projector.project(Coordinates::new(55.0, 37.0));
    assert!((point.x - 50.0).abs() < 1e-9);
    assert!((point.y - 50.0).abs() < 1e-9);
}

#[test]
fn projector_degenerate_spread_test() {
    // All points share a longitude, so only the latitude spread scales.
    let points = [
        Coordinates::new(55.0, 37.0),
        Coordinates::new(55.2, 37.0),
    ];
    let projector = Projector::new(&points, 600.0, 400.0, 50.0);
    let bottom = projector.project(Coordinates::new(55.0, 37.0));
    let zoom = (400.0 - 100.0) / 0.2;
    assert!((bottom.y - (0.2 * zoom + 50.0)).abs() < 1e-6);
    assert!((bottom.x - 50.0).abs() < 1e-9);
}
