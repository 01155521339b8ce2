//! UTM zones for tower surveys.
//!
//! Transmission lines are surveyed in geographic coordinates but
//! drawn and measured in the planar coordinates of a UTM zone. This
//! crate picks the zone for a point, projects in both directions, and
//! decides which of the geodesic or planar distance between two
//! towers can be trusted.
//!
//! # References
//!
//! 1. [Universal Transverse Mercator](https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system)
//! 1. C. F. F. Karney, _Transverse Mercator with an accuracy of a few
//!    nanometers_, J. Geodesy 85(8), 475–485 (2011).

mod distance;
mod error;
mod math;
mod projection;
mod zone;

pub use crate::{
    distance::{geodesic_distance, planar_distance, reconcile, Reconciled},
    error::ZoneError,
    projection::{to_geographic, to_planar, to_planar_in, Planar},
    zone::{zone_for, Hemisphere, ZoneSpec},
};
pub use geo;

/// Base floating point type used for all coordinates.
pub type C = f64;
