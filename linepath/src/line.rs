//! Per-line reconstruction: filter, resolve, order.

use crate::{
    backfill::{Backfill, BackfillEvent, BackfillReport},
    chain::ChainBuilder,
    elevation::ElevationSource,
    error::LineError,
    index::StructureIndex,
    profile::Profile,
    record::{Connection, EnrichedSpan, Line, Structure},
    resolver::{Defect, Resolution, Resolver},
};
use log::info;
use serde::Serialize;

/// The registry tables, each possibly mixing many lines.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub lines: Vec<Line>,
    pub structures: Vec<Structure>,
    pub connections: Vec<Connection>,
}

impl Tables {
    /// Returns the line labelled `label`.
    pub fn line(&self, label: &str) -> Result<&Line, LineError> {
        self.lines
            .iter()
            .find(|line| line.label == label)
            .ok_or_else(|| LineError::UnknownLine(label.to_owned()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.label.as_str())
    }

    /// Reconstructs the line labelled `label`.
    pub fn reconstruct(
        &self,
        label: &str,
        chain: &ChainBuilder,
    ) -> Result<ReconstructedLine, LineError> {
        let line = self.line(label)?;
        reconstruct(line, &self.structures, &self.connections, chain)
    }
}

/// A line's spans, resolved and ordered from its origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconstructedLine {
    pub line: Line,
    pub spans: Vec<EnrichedSpan>,

    /// Every structure of the line was geolocated.
    pub integrity: bool,

    /// At least one span crosses a zone boundary.
    pub crossed_zone: bool,

    pub defects: Vec<Defect>,
}

impl ReconstructedLine {
    /// Line length in meters, `None` if any span lacks a distance.
    pub fn total_distance_m(&self) -> Option<f64> {
        self.spans.iter().map(EnrichedSpan::distance_m).sum()
    }

    /// Fills missing altitudes through `source`.
    pub fn backfill<S, F>(&mut self, backfill: &Backfill, source: &S, on_event: F) -> BackfillReport
    where
        S: ElevationSource + ?Sized,
        F: FnMut(BackfillEvent<'_>),
    {
        backfill.run(&mut self.spans, source, on_event)
    }

    pub fn profile(&self) -> Result<Profile, LineError> {
        Profile::assemble(&self.spans)
    }
}

/// Reconstructs `line` from tables that may hold other lines too.
///
/// Structures and connections are restricted to `line`'s code before
/// resolution.
pub fn reconstruct(
    line: &Line,
    structures: &[Structure],
    connections: &[Connection],
    chain: &ChainBuilder,
) -> Result<ReconstructedLine, LineError> {
    let now = std::time::Instant::now();
    let index = StructureIndex::new(
        structures
            .iter()
            .filter(|structure| structure.line_code == line.code),
    );
    let connections: Vec<Connection> = connections
        .iter()
        .filter(|connection| connection.line_code == line.code)
        .cloned()
        .collect();

    let Resolution {
        spans,
        integrity,
        crossed_zone,
        defects,
    } = Resolver::new(&index).resolve(line, &connections);
    let spans = chain.build(spans)?;

    info!(
        "reconstruct; line: {}, spans: {}, integrity: {}, crossed_zone: {}, exec: {:?}",
        line.label,
        spans.len(),
        integrity,
        crossed_zone,
        now.elapsed()
    );

    Ok(ReconstructedLine {
        line: line.clone(),
        spans,
        integrity,
        crossed_zone,
        defects,
    })
}
