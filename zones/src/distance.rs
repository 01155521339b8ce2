use crate::{projection::to_planar, Planar, ZoneError, C};
use geo::{
    algorithm::GeodesicDistance,
    geometry::{Coord, Point},
};
use serde::{Deserialize, Serialize};

/// Outcome of measuring a span both ways.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciled {
    /// The distance to use, in meters.
    ///
    /// Planar when both ends share a zone, geodesic otherwise.
    pub distance_m: C,

    /// Ellipsoidal surface distance, in meters.
    pub geodesic_m: C,

    /// Euclidean distance between the projected ends, in meters.
    ///
    /// `None` when the ends lie in different zones.
    pub planar_m: Option<C>,

    /// The ends lie in different zones.
    pub crossed_zone: bool,
}

/// Returns the WGS84 geodesic distance between `a` and `b`, in
/// meters.
pub fn geodesic_distance(a: Coord<C>, b: Coord<C>) -> C {
    Point::from(a).geodesic_distance(&Point::from(b))
}

/// Returns the straight-line distance between two planar points, in
/// meters.
///
/// Only meaningful when both points are expressed in the same zone.
pub fn planar_distance(a: &Planar, b: &Planar) -> C {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Measures the span from `a` to `b`.
pub fn reconcile(a: Coord<C>, b: Coord<C>) -> Result<Reconciled, ZoneError> {
    let planar_a = to_planar(a)?;
    let planar_b = to_planar(b)?;
    let geodesic_m = geodesic_distance(a, b);

    if planar_a.zone == planar_b.zone {
        let planar_m = planar_distance(&planar_a, &planar_b);
        Ok(Reconciled {
            distance_m: planar_m,
            geodesic_m,
            planar_m: Some(planar_m),
            crossed_zone: false,
        })
    } else {
        Ok(Reconciled {
            distance_m: geodesic_m,
            geodesic_m,
            planar_m: None,
            crossed_zone: true,
        })
    }
}
