use crate::{ZoneError, C};
use geo::geometry::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a UTM zone in degrees of longitude.
const ZONE_WIDTH_DEG: C = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Hemisphere of a latitude; the equator belongs to the north.
    pub fn of(lat: C) -> Self {
        if lat < 0.0 {
            Self::South
        } else {
            Self::North
        }
    }

    /// Northing offset applied to this hemisphere, in meters.
    pub fn false_northing(self) -> C {
        match self {
            Self::North => 0.0,
            Self::South => 10_000_000.0,
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::North => f.write_str("north"),
            Self::South => f.write_str("south"),
        }
    }
}

/// A UTM zone.
///
/// Two points are in the same zone only when both the zone number
/// and the hemisphere match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawZoneSpec")]
pub struct ZoneSpec {
    zone: u8,
    hemisphere: Hemisphere,
}

/// Unvalidated serialized form of [`ZoneSpec`].
#[derive(Deserialize)]
struct RawZoneSpec {
    zone: u8,
    hemisphere: Hemisphere,
}

impl TryFrom<RawZoneSpec> for ZoneSpec {
    type Error = ZoneError;

    fn try_from(raw: RawZoneSpec) -> Result<Self, ZoneError> {
        Self::new(raw.zone, raw.hemisphere)
    }
}

impl ZoneSpec {
    pub fn new(zone: u8, hemisphere: Hemisphere) -> Result<Self, ZoneError> {
        if (1..=60).contains(&zone) {
            Ok(Self { zone, hemisphere })
        } else {
            Err(ZoneError::InvalidZone(i32::from(zone)))
        }
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Longitude of this zone's central meridian, in degrees.
    pub fn central_meridian(&self) -> C {
        C::from(self.zone) * ZONE_WIDTH_DEG - 183.0
    }
}

impl fmt::Display for ZoneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.zone, self.hemisphere)
    }
}

/// Returns the UTM zone containing `coord`.
///
/// The zone number is `floor((lon + 180) / 6) + 1`. Longitudes that
/// land outside 1..=60 (`lon >= 180`, `lon < -180`) are an error, not
/// wrapped.
pub fn zone_for(coord: Coord<C>) -> Result<ZoneSpec, ZoneError> {
    let Coord { x: lon, y: lat } = coord;
    if !lat.is_finite() || !lon.is_finite() || lat.abs() >= 90.0 {
        return Err(ZoneError::InvalidCoordinate { lat, lon });
    }
    #[allow(clippy::cast_possible_truncation)]
    let zone = ((lon + 180.0) / ZONE_WIDTH_DEG).floor() as i32 + 1;
    let zone = u8::try_from(zone).map_err(|_| ZoneError::InvalidZone(zone))?;
    ZoneSpec::new(zone, Hemisphere::of(lat)).map_err(|_| ZoneError::InvalidZone(i32::from(zone)))
}
