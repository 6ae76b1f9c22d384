mod entities;

pub use entities::*;
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::Instant,
};
use thiserror::Error;
use tracing::debug;

use crate::geo::Coordinates;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate stop name: {0}")]
    DuplicateStop(String),
    #[error("Duplicate bus name: {0}")]
    DuplicateBus(String),
    #[error("Unknown stop referenced: {0}")]
    UnknownStop(String),
}

/// One stop of the build document, not yet linked into the catalog.
///
/// `road_distances` is the sparse directional list as it appeared in the
/// source, in deterministic (sorted) order.
#[derive(Debug, Clone)]
pub struct StopSpec {
    pub name: String,
    pub coordinates: Coordinates,
    pub road_distances: Vec<(String, u32)>,
}

/// One bus of the build document, with the stop sequence already expanded.
#[derive(Debug, Clone)]
pub struct BusSpec {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

/// A read-only store of the transit network, optimized for name lookups.
///
/// Entities live in flat slices ordered by ingestion; every cross-reference
/// is an index into those slices. The same builder is entered by the JSON
/// ingestion path and by the artifact load path, so both produce identical
/// catalogs for identical specs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stops: Box<[Stop]>,
    buses: Box<[Bus]>,

    /// Maps a stop name to its index within the `stops` slice.
    stop_lookup: HashMap<Arc<str>, u32>,
    /// Maps a bus name to its index within the `buses` slice.
    bus_lookup: HashMap<Arc<str>, u32>,
    /// Directed road distances in meters keyed on (from, to) stop indices.
    distances: HashMap<(u32, u32), u32>,
    /// Index mapping: `stop_index -> sorted bus names calling there`.
    stop_to_buses: Box<[BTreeSet<Arc<str>>]>,
}

impl Catalog {
    pub fn build(stop_specs: Vec<StopSpec>, bus_specs: Vec<BusSpec>) -> Result<Self, Error> {
        let mut catalog = Self::default();
        catalog.load_stops(&stop_specs)?;
        catalog.load_distances(&stop_specs)?;
        catalog.load_buses(bus_specs)?;
        catalog.generate_stop_to_buses();
        Ok(catalog)
    }

    fn load_stops(&mut self, specs: &[StopSpec]) -> Result<(), Error> {
        debug!("Loading stops...");
        let now = Instant::now();
        let mut stop_lookup: HashMap<Arc<str>, u32> = HashMap::with_capacity(specs.len());
        let mut stops: Vec<Stop> = Vec::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let name: Arc<str> = spec.name.as_str().into();
            if stop_lookup.insert(name.clone(), i as u32).is_some() {
                return Err(Error::DuplicateStop(spec.name.clone()));
            }
            stops.push(Stop {
                index: i as u32,
                name,
                coordinates: spec.coordinates,
            });
        }
        self.stops = stops.into();
        self.stop_lookup = stop_lookup;
        debug!(
            "Loading {} stops took {:?}",
            self.stops.len(),
            now.elapsed()
        );
        Ok(())
    }

    /// Fills the directed distance table from the sparse input lists.
    ///
    /// The reverse pair is mirrored only when it was not provided
    /// explicitly; an explicit reverse entry always wins, whichever side is
    /// ingested first.
    fn load_distances(&mut self, specs: &[StopSpec]) -> Result<(), Error> {
        debug!("Loading road distances...");
        let now = Instant::now();
        for spec in specs {
            let from = self.stop_index(&spec.name)?;
            for (to_name, meters) in &spec.road_distances {
                let to = self.stop_index(to_name)?;
                if self.distances.contains_key(&(to, from)) {
                    self.distances.insert((from, to), *meters);
                    continue;
                }
                self.distances.insert((from, to), *meters);
                self.distances.insert((to, from), *meters);
            }
        }
        debug!(
            "Loading {} road distances took {:?}",
            self.distances.len(),
            now.elapsed()
        );
        Ok(())
    }

    fn load_buses(&mut self, specs: Vec<BusSpec>) -> Result<(), Error> {
        debug!("Loading buses...");
        let now = Instant::now();
        let mut bus_lookup: HashMap<Arc<str>, u32> = HashMap::with_capacity(specs.len());
        let mut buses: Vec<Bus> = Vec::with_capacity(specs.len());
        for (i, spec) in specs.into_iter().enumerate() {
            let name: Arc<str> = spec.name.as_str().into();
            if bus_lookup.insert(name.clone(), i as u32).is_some() {
                return Err(Error::DuplicateBus(spec.name));
            }
            let stops = spec
                .stops
                .iter()
                .map(|stop_name| self.stop_index(stop_name))
                .collect::<Result<Box<[u32]>, Error>>()?;
            buses.push(Bus {
                index: i as u32,
                name,
                stops,
                is_roundtrip: spec.is_roundtrip,
            });
        }
        self.buses = buses.into();
        self.bus_lookup = bus_lookup;
        debug!(
            "Loading {} buses took {:?}",
            self.buses.len(),
            now.elapsed()
        );
        Ok(())
    }

    fn generate_stop_to_buses(&mut self) {
        debug!("Generating stop to bus mapping...");
        let now = Instant::now();
        let mut stop_to_buses: Vec<BTreeSet<Arc<str>>> = vec![BTreeSet::new(); self.stops.len()];
        for bus in self.buses.iter() {
            for stop_idx in bus.stops.iter() {
                stop_to_buses[*stop_idx as usize].insert(bus.name.clone());
            }
        }
        self.stop_to_buses = stop_to_buses.into();
        debug!("Generating stop to bus mapping took {:?}", now.elapsed());
    }

    fn stop_index(&self, name: &str) -> Result<u32, Error> {
        self.stop_lookup
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownStop(name.to_string()))
    }

    /// Retrieves a [`Stop`] by name. Returns `None` if the name is unknown.
    pub fn find_stop(&self, name: &str) -> Option<&Stop> {
        let stop_index = self.stop_lookup.get(name)?;
        Some(&self.stops[*stop_index as usize])
    }

    /// Retrieves a [`Bus`] by name. Returns `None` if the name is unknown.
    pub fn find_bus(&self, name: &str) -> Option<&Bus> {
        let bus_index = self.bus_lookup.get(name)?;
        Some(&self.buses[*bus_index as usize])
    }

    /// Returns the sorted names of buses calling at a stop.
    ///
    /// A known stop with no buses yields an empty set; an unknown stop
    /// yields `None`.
    pub fn buses_at_stop(&self, name: &str) -> Option<&BTreeSet<Arc<str>>> {
        let stop_index = self.stop_lookup.get(name)?;
        Some(&self.stop_to_buses[*stop_index as usize])
    }

    /// Directed road distance in meters between two stops by index.
    ///
    /// Returns 0 when no distance is recorded; the table never stores a
    /// meaningful zero.
    pub fn distance(&self, from: u32, to: u32) -> u32 {
        self.distances.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Driven road length of a bus's stored sequence in meters.
    pub fn route_length(&self, bus: &Bus) -> u32 {
        bus.stops
            .windows(2)
            .map(|pair| self.distance(pair[0], pair[1]))
            .sum()
    }

    /// Great-circle length of a bus's stored sequence in meters.
    pub fn geographic_length(&self, bus: &Bus) -> f64 {
        bus.stops
            .windows(2)
            .map(|pair| {
                let from = &self.stops[pair[0] as usize];
                let to = &self.stops[pair[1] as usize];
                from.coordinates.distance(&to.coordinates)
            })
            .sum()
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}
