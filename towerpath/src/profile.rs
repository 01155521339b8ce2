use crate::{
    opentopo::OpenTopoData, options::Profile, output, progress, spans::warn_defects, tables,
};
use anyhow::{bail, Result};
use linepath::{Backfill, BackfillEvent, BackfillReport, Cached, Interrupt};
use std::time::Duration;

impl Profile {
    pub fn run(&self) -> Result<()> {
        let tables = tables::load(&self.tables)?;
        let mut line = tables.reconstruct(&self.line, &self.chain.builder())?;
        warn_defects(&line);
        if !line.integrity {
            bail!(
                "{} has spans without a location, refusing to build its profile",
                line.line.label
            );
        }

        if !self.offline {
            self.backfill(&mut line)?;
        }

        let profile = line.profile()?;
        output::write_profile_csv(std::io::stdout().lock(), &profile)
    }

    fn backfill(&self, line: &mut linepath::ReconstructedLine) -> Result<()> {
        let source = Cached::new(OpenTopoData::new(
            &self.elevation_url,
            &self.dataset,
            Duration::from_secs(self.timeout),
        )?);
        let mut backfill = Backfill::new().cooldown(Duration::from_millis(self.cooldown_ms));
        if let Some(budget) = self.budget {
            backfill = backfill.budget(Duration::from_secs(budget));
        }

        // Ctrl-C stops the lookups; altitudes found so far are kept.
        let canceller = backfill.canceller();
        ctrlc::set_handler(move || canceller.cancel())?;

        let pb = progress::bar(format!("Looking up altitudes for {}", line.line.label), 0)?;
        let report = line.backfill(&backfill, &source, |event| match event {
            BackfillEvent::Started { total } => pb.set_length(total as u64),
            BackfillEvent::Looked { point, result, .. } => {
                if let Err(e) = result {
                    pb.println(format!("warning: {}: {e}", point.code));
                }
                pb.inc(1);
            }
        });
        pb.finish_and_clear();

        if let Some(warning) = interrupted(&report) {
            eprintln!("warning: {warning}");
        }
        eprintln!(
            "{} altitudes filled, {} failed",
            report.filled,
            report.failed.len()
        );
        Ok(())
    }
}

/// Describes why a backfill stopped early.
fn interrupted(report: &BackfillReport) -> Option<String> {
    let reason = match report.interrupted? {
        Interrupt::DeadlineReached => "time budget exhausted",
        Interrupt::Cancelled => "cancelled",
    };
    Some(format!(
        "{reason}, {} altitudes not looked up",
        report.skipped
    ))
}

#[cfg(test)]
mod tests {
    use super::interrupted;
    use linepath::{
        Backfill, BackfillEvent, BackfillReport, ElevationError, EnrichedSpan, Interrupt,
        Midpoint, ResolvedEndpoint, TowerAttributes,
    };
    use std::time::Duration;

    fn endpoint(code: &str, lat: f64) -> ResolvedEndpoint {
        ResolvedEndpoint {
            code: code.into(),
            lat: Some(lat),
            lon: Some(-43.85),
            planar: None,
            altitude_m: None,
            attributes: TowerAttributes::default(),
        }
    }

    #[test]
    fn test_interrupted_message() {
        let mut report = BackfillReport::default();
        assert_eq!(interrupted(&report), None);

        report.interrupted = Some(Interrupt::Cancelled);
        report.skipped = 4;
        assert_eq!(
            interrupted(&report).as_deref(),
            Some("cancelled, 4 altitudes not looked up")
        );

        report.interrupted = Some(Interrupt::DeadlineReached);
        assert_eq!(
            interrupted(&report).as_deref(),
            Some("time budget exhausted, 4 altitudes not looked up")
        );
    }

    #[test]
    fn test_canceller_keeps_found_altitudes() {
        // The handle given to the signal handler stops the run between
        // points.
        let backfill = Backfill::new().cooldown(Duration::ZERO);
        let canceller = backfill.canceller();
        let mut spans = vec![EnrichedSpan {
            line_label: "LT TAQUARIL".into(),
            line_code: "LT-01".into(),
            start: endpoint("PORT-TQR", -19.93),
            end: endpoint("TW-001", -19.94),
            midpoint: Midpoint::default(),
            distance: None,
        }];
        let source = |_: geo::Coord| -> Result<f64, ElevationError> { Ok(901.0) };

        let report = backfill.run(&mut spans, &source, |event| {
            if let BackfillEvent::Looked { .. } = event {
                canceller.cancel();
            }
        });
        assert_eq!(report.filled, 1);
        assert_eq!(spans[0].start.altitude_m, Some(901.0));
        assert_eq!(spans[0].end.altitude_m, None);
        assert_eq!(
            interrupted(&report).as_deref(),
            Some("cancelled, 1 altitudes not looked up")
        );
    }
}
