//! Longitudinal profile of a reconstructed line.

use crate::{error::LineError, record::EnrichedSpan};
use serde::{Deserialize, Serialize};

/// A vertex of the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Structure code.
    pub code: String,

    /// Orthometric altitude in meters, `None` when still missing.
    pub altitude_m: Option<f64>,

    /// Distance from the first structure of the chain in kilometers.
    pub distance_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub points: Vec<ProfilePoint>,

    /// Total length in meters.
    pub distance_m: f64,
}

impl Profile {
    /// Builds the profile of an ordered span sequence.
    ///
    /// Every span must carry a distance.
    pub fn assemble(spans: &[EnrichedSpan]) -> Result<Self, LineError> {
        let Some(first) = spans.first() else {
            return Ok(Self::default());
        };

        let mut points = Vec::with_capacity(spans.len() + 1);
        points.push(ProfilePoint {
            code: first.start.code.clone(),
            altitude_m: first.start.altitude_m,
            distance_km: 0.0,
        });

        let mut distance_m = 0.0;
        for span in spans {
            distance_m += span.distance_m().ok_or_else(|| LineError::MissingDistance {
                start: span.start.code.clone(),
                end: span.end.code.clone(),
            })?;
            points.push(ProfilePoint {
                code: span.end.code.clone(),
                altitude_m: span.end.altitude_m,
                distance_km: distance_m / 1000.0,
            });
        }

        Ok(Self { points, distance_m })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest known altitudes.
    pub fn altitude_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|point| point.altitude_m)
            .fold(None, |range, alt| match range {
                None => Some((alt, alt)),
                Some((lo, hi)) => Some((f64::min(lo, alt), f64::max(hi, alt))),
            })
    }
}
