//! Krüger series for the ellipsoidal transverse Mercator projection,
//! truncated at third order in the third flattening `n`.
//!
//! Coordinates on the projected side are in units of the rectifying
//! radius `A` (ξ northward, η eastward), before the UTM scale factor
//! and false origin are applied.

use super::{WGS84_A, WGS84_F};

#[allow(clippy::many_single_char_names)]
pub(crate) struct Krueger {
    /// Rectifying radius, in meters.
    pub(crate) a: f64,
    /// First eccentricity.
    e: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    delta: [f64; 3],
}

impl Krueger {
    pub(crate) fn wgs84() -> Self {
        Self::new(WGS84_A, WGS84_F)
    }

    pub(crate) fn new(semi_major: f64, flattening: f64) -> Self {
        let n = flattening / (2.0 - flattening);
        let (n2, n3) = (n * n, n * n * n);
        let a = semi_major / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);
        let e = 2.0 * n.sqrt() / (1.0 + n);
        Self {
            a,
            e,
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
                61.0 * n3 / 240.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
                n2 / 48.0 + n3 / 15.0,
                17.0 * n3 / 480.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
                56.0 * n3 / 15.0,
            ],
        }
    }

    /// Returns `(ξ, η)` for a latitude and a longitude offset from the
    /// central meridian, both in radians.
    pub(crate) fn forward(&self, lat: f64, dlon: f64) -> (f64, f64) {
        let sin_lat = lat.sin();
        let t = (sin_lat.atanh() - self.e * (self.e * sin_lat).atanh()).sinh();
        let xi_p = t.atan2(dlon.cos());
        let eta_p = (dlon.sin() / (1.0 + t * t).sqrt()).atanh();

        let (mut xi, mut eta) = (xi_p, eta_p);
        for (k, alpha) in harmonics(&self.alpha) {
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }
        (xi, eta)
    }

    /// Inverse of [`Krueger::forward`]: returns `(lat, dlon)` in
    /// radians.
    pub(crate) fn inverse(&self, xi: f64, eta: f64) -> (f64, f64) {
        let (mut xi_p, mut eta_p) = (xi, eta);
        for (k, beta) in harmonics(&self.beta) {
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let lat = harmonics(&self.delta).fold(chi, |lat, (k, delta)| lat + delta * (k * chi).sin());
        let dlon = eta_p.sinh().atan2(xi_p.cos());
        (lat, dlon)
    }
}

/// Pairs each series coefficient with its angle multiplier `2j`.
fn harmonics(coefficients: &[f64; 3]) -> impl Iterator<Item = (f64, f64)> + '_ {
    coefficients
        .iter()
        .zip([2.0, 4.0, 6.0])
        .map(|(coefficient, k)| (k, *coefficient))
}
