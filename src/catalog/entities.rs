use std::sync::Arc;

use crate::geo::Coordinates;

/// A named point of the network where passengers board or alight.
#[derive(Debug, Default, Clone)]
pub struct Stop {
    /// Position in the catalog's canonical order, fixed at ingestion.
    pub index: u32,
    pub name: Arc<str>,
    pub coordinates: Coordinates,
}

/// A bus line traversing an ordered stop sequence.
///
/// For lines that are not roundtrips the stored sequence is the forward leg
/// followed by its reversed interior, so a one-way definition of `n` stops
/// is stored with length `2n - 1` and index `n - 1` is the turnaround. For
/// roundtrips the sequence is the full cycle and first and last stop
/// coincide.
#[derive(Debug, Default, Clone)]
pub struct Bus {
    pub index: u32,
    pub name: Arc<str>,
    /// Stop indices in travel order, post-expansion.
    pub stops: Box<[u32]>,
    pub is_roundtrip: bool,
}
