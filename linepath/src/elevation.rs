//! Ground elevation lookups.

use crate::error::ElevationError;
use dashmap::DashMap;
use geo::geometry::Coord;

/// Something that knows the orthometric altitude of a point.
///
/// Implementations decide the transport: a web service, a local
/// dataset, or a stub in tests.
pub trait ElevationSource {
    /// Returns the ground elevation at `coord`, in meters.
    fn elevation_at(&self, coord: Coord<f64>) -> Result<f64, ElevationError>;
}

impl<F> ElevationSource for F
where
    F: Fn(Coord<f64>) -> Result<f64, ElevationError>,
{
    fn elevation_at(&self, coord: Coord<f64>) -> Result<f64, ElevationError> {
        self(coord)
    }
}

/// Memoizes another source by exact coordinate.
///
/// Failures are not cached.
pub struct Cached<S> {
    source: S,
    elevations: DashMap<(u64, u64), f64>,
}

impl<S: ElevationSource> Cached<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            elevations: DashMap::new(),
        }
    }

    /// Number of cached elevations.
    pub fn len(&self) -> usize {
        self.elevations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations.is_empty()
    }
}

impl<S: ElevationSource> ElevationSource for Cached<S> {
    fn elevation_at(&self, coord: Coord<f64>) -> Result<f64, ElevationError> {
        self.elevations
            .entry((coord.x.to_bits(), coord.y.to_bits()))
            .or_try_insert_with(|| self.source.elevation_at(coord))
            .map(|elevation| *elevation)
    }
}
