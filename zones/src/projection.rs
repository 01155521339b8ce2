use crate::{
    math::Krueger,
    zone::{zone_for, Hemisphere, ZoneSpec},
    ZoneError, C,
};
use geo::geometry::Coord;
use serde::{Deserialize, Serialize};

/// UTM central meridian scale factor.
const K0: C = 0.9996;

/// Easting of every zone's central meridian, in meters.
const FALSE_EASTING: C = 500_000.0;

/// A point in the planar coordinates of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planar {
    /// Easting in meters.
    pub x: C,

    /// Northing in meters.
    pub y: C,

    /// Zone the easting/northing are expressed in.
    pub zone: ZoneSpec,
}

/// Projects `coord` (degrees) into the UTM zone that contains it.
pub fn to_planar(coord: Coord<C>) -> Result<Planar, ZoneError> {
    let zone = zone_for(coord)?;
    to_planar_in(coord, zone)
}

/// Projects `coord` (degrees) into an explicit `zone`, which need not
/// be the zone that contains it.
pub fn to_planar_in(coord: Coord<C>, zone: ZoneSpec) -> Result<Planar, ZoneError> {
    let Coord { x: lon, y: lat } = coord;
    if !lat.is_finite() || !lon.is_finite() || lat.abs() >= 90.0 {
        return Err(ZoneError::InvalidCoordinate { lat, lon });
    }

    // The series diverges a quarter turn from the central meridian.
    let dlon = lon - zone.central_meridian();
    if dlon.abs() >= 90.0 {
        return Err(ZoneError::InvalidCoordinate { lat, lon });
    }

    let krueger = Krueger::wgs84();
    let (xi, eta) = krueger.forward(lat.to_radians(), dlon.to_radians());
    let x = FALSE_EASTING + K0 * krueger.a * eta;
    let y = zone.hemisphere().false_northing() + K0 * krueger.a * xi;
    if !x.is_finite() || !y.is_finite() {
        return Err(ZoneError::InvalidPlanar { x, y });
    }

    Ok(Planar { x, y, zone })
}

/// Converts an easting/northing in `zone`/`hemisphere` back to
/// geographic coordinates (degrees).
pub fn to_geographic(x: C, y: C, zone: u8, hemisphere: Hemisphere) -> Result<Coord<C>, ZoneError> {
    let zone = ZoneSpec::new(zone, hemisphere)?;
    if !x.is_finite() || !y.is_finite() {
        return Err(ZoneError::InvalidPlanar { x, y });
    }

    let krueger = Krueger::wgs84();
    let xi = (y - hemisphere.false_northing()) / (K0 * krueger.a);
    let eta = (x - FALSE_EASTING) / (K0 * krueger.a);
    let (lat, dlon) = krueger.inverse(xi, eta);

    Ok(Coord {
        x: zone.central_meridian() + dlon.to_degrees(),
        y: lat.to_degrees(),
    })
}

impl Planar {
    /// Converts this planar point back to geographic coordinates.
    pub fn to_geographic(&self) -> Result<Coord<C>, ZoneError> {
        to_geographic(self.x, self.y, self.zone.zone(), self.zone.hemisphere())
    }
}

#[cfg(test)]
mod tests {
    use super::{to_geographic, to_planar, to_planar_in, Hemisphere, ZoneError, ZoneSpec};
    use approx::assert_abs_diff_eq;
    use geo::coord;

    #[test]
    fn test_sao_paulo() {
        // Agrees with the Snyder (USGS PP 1395) series to well under 1 mm.
        let planar = to_planar(coord!(x: -46.6333, y: -23.5505)).unwrap();
        assert_eq!(planar.zone, ZoneSpec::new(23, Hemisphere::South).unwrap());
        assert_abs_diff_eq!(planar.x, 333_287.915, epsilon = 0.01);
        assert_abs_diff_eq!(planar.y, 7_394_588.319, epsilon = 0.01);
    }

    #[test]
    fn test_equator_on_central_meridian() {
        let planar = to_planar(coord!(x: -45.0, y: 0.0)).unwrap();
        assert_abs_diff_eq!(planar.x, 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(planar.y, 0.0, epsilon = 1e-6);
        assert_eq!(planar.zone.hemisphere(), Hemisphere::North);
    }

    #[test]
    fn test_round_trip() {
        let coords = [
            coord!(x: -46.6333, y: -23.5505),
            coord!(x: -74.0060, y: 40.7128),
            coord!(x: -43.8526956561, y: -19.9317348003),
            coord!(x: 151.2093, y: -33.8688),
            coord!(x: 2.2945, y: 48.8584),
            coord!(x: -177.5, y: 71.0),
            coord!(x: 179.9, y: -0.01),
        ];
        for coord in coords {
            let planar = to_planar(coord).unwrap();
            let back = planar.to_geographic().unwrap();
            assert_abs_diff_eq!(back.x, coord.x, epsilon = 1e-6);
            assert_abs_diff_eq!(back.y, coord.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_round_trip_foreign_zone() {
        // A point just across the border, projected into its neighbor.
        let coord = coord!(x: -41.9, y: -20.0);
        let zone = ZoneSpec::new(23, Hemisphere::South).unwrap();
        let planar = to_planar_in(coord, zone).unwrap();
        let back = to_geographic(planar.x, planar.y, 23, Hemisphere::South).unwrap();
        assert_abs_diff_eq!(back.x, coord.x, epsilon = 1e-6);
        assert_abs_diff_eq!(back.y, coord.y, epsilon = 1e-6);
    }

    #[test]
    fn test_out_of_reach_of_zone() {
        let zone = ZoneSpec::new(23, Hemisphere::North).unwrap();
        for lon in [45.0, 60.0, -135.0, -170.0] {
            let coord = coord!(x: lon, y: 0.0);
            assert_eq!(
                to_planar_in(coord, zone),
                Err(ZoneError::InvalidCoordinate { lat: 0.0, lon })
            );
        }
        let planar = to_planar_in(coord!(x: 44.0, y: 10.0), zone).unwrap();
        assert!(planar.x.is_finite() && planar.y.is_finite());
    }

    #[test]
    fn test_invalid_zone_rejected() {
        assert_eq!(
            to_geographic(500_000.0, 0.0, 0, Hemisphere::North),
            Err(ZoneError::InvalidZone(0))
        );
        assert_eq!(
            to_geographic(500_000.0, 0.0, 61, Hemisphere::South),
            Err(ZoneError::InvalidZone(61))
        );
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(to_planar(coord!(x: f64::NAN, y: 0.0)).is_err());
        assert!(matches!(
            to_geographic(f64::INFINITY, 0.0, 23, Hemisphere::South),
            Err(ZoneError::InvalidPlanar { .. })
        ));
    }
}
