//! Transmission line reconstruction.
//!
//! Registry exports list a line's spans in no particular order, with
//! tower coordinates and altitudes often left blank on the span rows.
//! This crate fills those fields from the structure table, orders the
//! spans from the line's substation port, backfills missing altitudes
//! from an elevation source and builds the line's longitudinal
//! profile.

mod backfill;
mod chain;
mod elevation;
mod error;
mod index;
mod line;
mod profile;
mod record;
mod resolver;

pub use crate::{
    backfill::{
        Backfill, BackfillEvent, BackfillReport, CancelToken, Interrupt, PendingPoint,
        DEFAULT_COOLDOWN,
    },
    chain::{BranchPolicy, ChainBuilder, Link, ORIGIN_MARKER},
    elevation::{Cached, ElevationSource},
    error::{ElevationError, LineError},
    index::StructureIndex,
    line::{reconstruct, ReconstructedLine, Tables},
    profile::{Profile, ProfilePoint},
    record::{
        is_missing_altitude, Connection, Endpoint, EnrichedSpan, Line, Midpoint,
        ResolvedEndpoint, Structure, TowerAttributes,
    },
    resolver::{Defect, Lookup, Resolution, Resolver},
};
