use crate::{
    options::{Format, Spans},
    output::{self, Summary},
    tables,
};
use anyhow::{anyhow, Result};
use linepath::{reconstruct, ChainBuilder, ReconstructedLine, Tables};
use log::info;
use rayon::prelude::*;

impl Spans {
    pub fn run(&self) -> Result<()> {
        let tables = tables::load(&self.tables)?;
        let chain = self.chain.builder();
        if self.all {
            return Self::summarize(&tables, &chain);
        }

        let label = self
            .line
            .as_deref()
            .ok_or_else(|| anyhow!("either --line or --all is required"))?;
        let line = tables.reconstruct(label, &chain)?;
        warn_defects(&line);

        let stdout = std::io::stdout().lock();
        match self.format {
            Format::Csv => output::write_spans_csv(stdout, &line.spans),
            Format::Json => output::write_spans_json(stdout, &line),
        }
    }

    /// Reconstructs every line in parallel and prints one row per line.
    fn summarize(tables: &Tables, chain: &ChainBuilder) -> Result<()> {
        let now = std::time::Instant::now();
        let summaries: Vec<Summary<'_>> = tables
            .lines
            .par_iter()
            .map(|line| {
                match reconstruct(line, &tables.structures, &tables.connections, chain) {
                    Ok(reconstructed) => Summary {
                        label: &line.label,
                        code: &line.code,
                        spans: Some(reconstructed.spans.len()),
                        distance_km: reconstructed.total_distance_m().map(|m| m / 1000.0),
                        integrity: Some(reconstructed.integrity),
                        crossed_zone: Some(reconstructed.crossed_zone),
                        error: None,
                    },
                    Err(e) => Summary {
                        label: &line.label,
                        code: &line.code,
                        spans: None,
                        distance_km: None,
                        integrity: None,
                        crossed_zone: None,
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect();
        info!(
            "summarize; lines: {}, exec: {:?}",
            summaries.len(),
            now.elapsed()
        );
        output::write_summaries_csv(std::io::stdout().lock(), &summaries)
    }
}

/// Reports a line's field level problems on stderr.
pub fn warn_defects(line: &ReconstructedLine) {
    for defect in &line.defects {
        eprintln!("warning: {defect}");
    }
    if !line.integrity {
        eprintln!(
            "warning: {} is missing tower locations, its spans are incomplete",
            line.line.label
        );
    }
    if line.crossed_zone {
        eprintln!(
            "warning: {} crosses a UTM zone, geodesic distances used across it",
            line.line.label
        );
    }
}
