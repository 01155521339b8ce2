//! Altitude backfill for resolved spans.
//!
//! Runs as its own pass after resolution: collect the points whose
//! altitude is missing, then drain them one lookup at a time with a
//! cooldown before every call. The run can be cancelled between
//! points and bounded by a time budget.

use crate::{
    elevation::ElevationSource,
    error::ElevationError,
    record::{EnrichedSpan, ResolvedEndpoint},
};
use geo::geometry::Coord;
use log::{debug, warn};
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

/// Delay before every lookup, respecting public elevation services'
/// one request per second limit.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

/// Longest uninterrupted sleep while waiting out a cooldown.
const POLL: Duration = Duration::from_millis(50);

/// Shared flag to stop a running backfill.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A structure whose altitude must be looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPoint {
    pub code: String,
    pub coord: Coord<f64>,
}

/// Progress notifications emitted by [`Backfill::run`].
#[derive(Debug)]
pub enum BackfillEvent<'a> {
    Started {
        total: usize,
    },
    Looked {
        index: usize,
        point: &'a PendingPoint,
        result: &'a Result<f64, ElevationError>,
    },
}

/// Why a run stopped before draining every point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    DeadlineReached,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackfillReport {
    /// Structures that received an altitude.
    pub filled: usize,

    /// Lookups that failed; those structures keep a blank altitude.
    pub failed: Vec<(String, ElevationError)>,

    /// Points never attempted because the run was interrupted.
    pub skipped: usize,

    pub interrupted: Option<Interrupt>,
}

impl BackfillReport {
    /// Every pending point received an altitude.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.interrupted.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Backfill {
    cooldown: Duration,
    budget: Option<Duration>,
    cancel: CancelToken,
}

impl Default for Backfill {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            budget: None,
            cancel: CancelToken::new(),
        }
    }
}

impl Backfill {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait before each lookup (defaults to one second).
    #[must_use]
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Maximum wall time for a run; no lookup starts after it
    /// (defaults to unbounded).
    #[must_use]
    pub fn budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Use an externally owned cancellation token.
    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns a handle that cancels this backfill.
    pub fn canceller(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the geolocated structures of `spans` that lack an
    /// altitude, once per code, in chain order.
    pub fn pending(spans: &[EnrichedSpan]) -> Vec<PendingPoint> {
        let mut seen = HashSet::new();
        spans
            .iter()
            .flat_map(|span| [&span.start, &span.end])
            .filter(|endpoint| endpoint.needs_altitude())
            .filter_map(|endpoint| endpoint.coord().map(|coord| (endpoint, coord)))
            .filter(|(endpoint, _)| seen.insert(endpoint.code.as_str()))
            .map(|(endpoint, coord)| PendingPoint {
                code: endpoint.code.clone(),
                coord,
            })
            .collect()
    }

    /// Looks up every pending altitude in `spans` through `source` and
    /// writes the results back.
    ///
    /// A failed lookup leaves that structure blank and the run moves
    /// on.
    pub fn run<S, F>(&self, spans: &mut [EnrichedSpan], source: &S, mut on_event: F) -> BackfillReport
    where
        S: ElevationSource + ?Sized,
        F: FnMut(BackfillEvent<'_>),
    {
        let points = Self::pending(spans);
        let deadline = self.budget.map(|budget| Instant::now() + budget);
        let mut report = BackfillReport::default();

        on_event(BackfillEvent::Started {
            total: points.len(),
        });

        for (index, point) in points.iter().enumerate() {
            if let Some(interrupt) = self.wait(deadline) {
                debug!("backfill interrupted, {interrupt:?}");
                report.interrupted = Some(interrupt);
                report.skipped = points.len() - index;
                break;
            }

            let now = Instant::now();
            let result = source.elevation_at(point.coord);
            debug!(
                "elevation; code: {}, coord: {:?}, result: {:?}, exec: {:?}",
                point.code,
                point.coord,
                result,
                now.elapsed()
            );
            on_event(BackfillEvent::Looked {
                index,
                point,
                result: &result,
            });

            match result {
                Ok(altitude_m) => {
                    apply(spans, &point.code, altitude_m);
                    report.filled += 1;
                }
                Err(e) => {
                    warn!("no elevation for {}, {e}", point.code);
                    report.failed.push((point.code.clone(), e));
                }
            }
        }

        report
    }

    /// Sleeps out the cooldown unless cancelled or the next lookup
    /// would start past `deadline`.
    fn wait(&self, deadline: Option<Instant>) -> Option<Interrupt> {
        let resume = Instant::now() + self.cooldown;
        if deadline.is_some_and(|deadline| resume > deadline) {
            return Some(Interrupt::DeadlineReached);
        }
        loop {
            if self.cancel.is_cancelled() {
                return Some(Interrupt::Cancelled);
            }
            let now = Instant::now();
            if now >= resume {
                return None;
            }
            thread::sleep((resume - now).min(POLL));
        }
    }
}

fn apply(spans: &mut [EnrichedSpan], code: &str, altitude_m: f64) {
    spans
        .iter_mut()
        .flat_map(EnrichedSpan::endpoints_mut)
        .filter(|endpoint: &&mut ResolvedEndpoint| endpoint.code == code && endpoint.needs_altitude())
        .for_each(|endpoint| endpoint.altitude_m = Some(altitude_m));
}
