mod krueger;

pub(crate) use krueger::Krueger;

/// WGS84 semi-major axis, in meters.
pub(crate) const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening.
pub(crate) const WGS84_F: f64 = 1.0 / 298.257_223_563;
