//! Tower and span records.
//!
//! Optional fields are `None` when the source table left them blank.
//! A `NaN` read from a numeric column is treated the same way.

use geo::geometry::Coord;
use serde::{Deserialize, Serialize};
use zones::{Planar, Reconciled};

/// Attributes describing a tower, all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TowerAttributes {
    /// Position of the tower within its line.
    pub sequence_id: Option<String>,

    /// Tower height in meters.
    pub height_m: Option<f64>,

    pub structure_type: Option<String>,

    pub characteristic1: Option<String>,

    pub characteristic2: Option<String>,
}

/// A tower or substation port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// SAP code, unique within the registry.
    pub code: String,

    /// SAP code of the line this structure belongs to.
    pub line_code: String,

    pub lat: Option<f64>,

    pub lon: Option<f64>,

    /// Orthometric altitude in meters.
    pub altitude_m: Option<f64>,

    pub attributes: TowerAttributes,
}

impl Structure {
    /// Returns this structure's location, if both fields are usable.
    pub fn coord(&self) -> Option<Coord<f64>> {
        coord(self.lat, self.lon)
    }
}

/// One end of a connection as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub code: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub altitude_m: Option<f64>,
}

/// Center of a span, carried through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Midpoint {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub altitude_m: Option<f64>,
}

/// A span between two structures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// SAP code of the owning line.
    pub line_code: String,
    pub start: Endpoint,
    pub end: Endpoint,
    pub midpoint: Midpoint,
}

/// A named transmission line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub label: String,
    pub code: String,
}

/// A fully resolved span end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEndpoint {
    pub code: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Planar coordinates in the endpoint's own zone.
    pub planar: Option<Planar>,

    pub altitude_m: Option<f64>,
    pub attributes: TowerAttributes,
}

impl ResolvedEndpoint {
    pub fn coord(&self) -> Option<Coord<f64>> {
        coord(self.lat, self.lon)
    }

    /// The altitude still needs to be looked up.
    pub fn needs_altitude(&self) -> bool {
        is_missing_altitude(self.altitude_m)
    }
}

/// A connection after resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSpan {
    pub line_label: String,
    pub line_code: String,
    pub start: ResolvedEndpoint,
    pub end: ResolvedEndpoint,
    pub midpoint: Midpoint,

    /// `None` unless both ends were geolocated.
    pub distance: Option<Reconciled>,
}

impl EnrichedSpan {
    /// Authoritative span length in meters.
    pub fn distance_m(&self) -> Option<f64> {
        self.distance.map(|d| d.distance_m)
    }

    pub fn crossed_zone(&self) -> bool {
        self.distance.is_some_and(|d| d.crossed_zone)
    }

    pub fn endpoints_mut(&mut self) -> [&mut ResolvedEndpoint; 2] {
        [&mut self.start, &mut self.end]
    }
}

/// Absent, `NaN` and exactly zero altitudes are all placeholders in
/// the registry exports.
#[allow(clippy::float_cmp)]
pub fn is_missing_altitude(altitude_m: Option<f64>) -> bool {
    altitude_m.map_or(true, |alt| alt.is_nan() || alt == 0.0)
}

/// Drops `NaN` placeholders.
pub(crate) fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

fn coord(lat: Option<f64>, lon: Option<f64>) -> Option<Coord<f64>> {
    match (present(lat), present(lon)) {
        (Some(y), Some(x)) if x.is_finite() && y.is_finite() => Some(Coord { x, y }),
        _ => None,
    }
}
