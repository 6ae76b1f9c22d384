use serde::{Deserialize, Serialize};

pub(crate) const EARTH_RADIUS: f64 = 6_371_000.0;

/// A geographic position in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in meters, spherical law of cosines.
    pub fn distance(&self, other: &Self) -> f64 {
        if self == other {
            return 0.0;
        }
        let lat_a = self.lat.to_radians();
        let lat_b = other.lat.to_radians();
        let delta_lng = (self.lng - other.lng).abs().to_radians();
        (lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * delta_lng.cos()).acos()
            * EARTH_RADIUS
    }
}

#[test]
fn distance_test() {
    let coord_a = Coordinates::new(55.611087, 37.20829);
    let coord_b = Coordinates::new(55.595884, 37.209755);
    let d = coord_a.distance(&coord_b);
    assert!((d - 1693.0).abs() < 1.0);
}

#[test]
fn distance_zero_test() {
    let coord = Coordinates::new(55.611087, 37.20829);
    assert_eq!(coord.distance(&coord), 0.0);
}

#[test]
fn distance_symmetric_test() {
    let coord_a = Coordinates::new(43.587795, 39.716901);
    let coord_b = Coordinates::new(43.581969, 39.719848);
    assert!((coord_a.distance(&coord_b) - coord_b.distance(&coord_a)).abs() < 1e-9);
}
