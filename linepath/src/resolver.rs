//! Field completion for connections.

use crate::{
    index::StructureIndex,
    record::{
        is_missing_altitude, present, Connection, EnrichedSpan, Endpoint, Line, ResolvedEndpoint,
    },
};
use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use zones::{reconcile, to_planar, ZoneError};

/// Which lookup failed for a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lookup {
    Coordinates,
    Attributes,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates => f.write_str("coordinates"),
            Self::Attributes => f.write_str("attributes"),
        }
    }
}

/// A field that could not be resolved.
///
/// Defects never abort a reconstruction; the affected fields are
/// left blank.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum Defect {
    #[error("missing structure reference {code} ({lookup})")]
    MissingStructureReference { code: String, lookup: Lookup },

    #[error("structure {code} cannot be projected, {error}")]
    Unprojectable {
        code: String,
        #[serde(skip)]
        #[source]
        error: ZoneError,
    },
}

impl Defect {
    /// The defect leaves a structure without a usable location.
    pub fn loses_location(&self) -> bool {
        !matches!(
            self,
            Self::MissingStructureReference {
                lookup: Lookup::Attributes,
                ..
            }
        )
    }
}

/// Resolved spans of one line, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub spans: Vec<EnrichedSpan>,

    /// Every endpoint was geolocated.
    pub integrity: bool,

    /// At least one span crosses a zone boundary.
    pub crossed_zone: bool,

    pub defects: Vec<Defect>,
}

/// Completes connections from the structure table.
pub struct Resolver<'a> {
    structures: &'a StructureIndex<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(structures: &'a StructureIndex<'a>) -> Self {
        Self { structures }
    }

    /// Resolves every connection of `line`.
    pub fn resolve(&self, line: &Line, connections: &[Connection]) -> Resolution {
        let now = std::time::Instant::now();
        let mut defects = Vec::new();
        let mut integrity = true;
        let mut crossed_zone = false;

        let spans: Vec<EnrichedSpan> = connections
            .iter()
            .map(|connection| {
                let (start, start_located) = self.resolve_endpoint(&connection.start, &mut defects);
                let (end, end_located) = self.resolve_endpoint(&connection.end, &mut defects);
                integrity &= start_located && end_located;

                let distance = match (start.coord(), end.coord()) {
                    (Some(a), Some(b)) if start_located && end_located => match reconcile(a, b) {
                        Ok(reconciled) => Some(reconciled),
                        Err(e) => {
                            warn!("span {} -> {}: {e}", start.code, end.code);
                            None
                        }
                    },
                    _ => None,
                };
                crossed_zone |= distance.is_some_and(|d| d.crossed_zone);

                EnrichedSpan {
                    line_label: line.label.clone(),
                    line_code: connection.line_code.clone(),
                    start,
                    end,
                    midpoint: connection.midpoint,
                    distance,
                }
            })
            .collect();

        debug!(
            "resolve; line: {}, spans: {}, defects: {}, exec: {:?}",
            line.label,
            spans.len(),
            defects.len(),
            now.elapsed()
        );

        Resolution {
            spans,
            integrity,
            crossed_zone,
            defects,
        }
    }

    /// Returns the resolved endpoint and whether it was geolocated.
    fn resolve_endpoint(
        &self,
        raw: &Endpoint,
        defects: &mut Vec<Defect>,
    ) -> (ResolvedEndpoint, bool) {
        let mut lat = present(raw.lat);
        let mut lon = present(raw.lon);
        let mut altitude_m = present(raw.altitude_m);
        let structure = self.structures.get(&raw.code);

        if lat.is_none() || lon.is_none() {
            if let Some(structure) = structure {
                lat = present(structure.lat);
                lon = present(structure.lon);
            }
        }
        if is_missing_altitude(altitude_m) {
            if let Some(fallback) = structure
                .map(|s| s.altitude_m)
                .filter(|alt| !is_missing_altitude(*alt))
            {
                altitude_m = fallback;
            }
        }

        let attributes = match self.structures.attributes(&raw.code) {
            Some(attributes) => attributes.clone(),
            None => {
                record(
                    defects,
                    Defect::MissingStructureReference {
                        code: raw.code.clone(),
                        lookup: Lookup::Attributes,
                    },
                );
                Default::default()
            }
        };

        let mut endpoint = ResolvedEndpoint {
            code: raw.code.clone(),
            lat,
            lon,
            planar: None,
            altitude_m,
            attributes,
        };

        let Some(coord) = endpoint.coord() else {
            record(
                defects,
                Defect::MissingStructureReference {
                    code: raw.code.clone(),
                    lookup: Lookup::Coordinates,
                },
            );
            return (endpoint, false);
        };

        match to_planar(coord) {
            Ok(planar) => {
                endpoint.planar = Some(planar);
                (endpoint, true)
            }
            Err(error) => {
                record(
                    defects,
                    Defect::Unprojectable {
                        code: raw.code.clone(),
                        error,
                    },
                );
                (endpoint, false)
            }
        }
    }
}

fn record(defects: &mut Vec<Defect>, defect: Defect) {
    warn!("{defect}");
    defects.push(defect);
}
