//! [Open Topo Data](https://www.opentopodata.org) elevation lookups.

use anyhow::Result;
use geo::geometry::Coord;
use linepath::{ElevationError, ElevationSource};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://api.opentopodata.org/v1";
pub const DEFAULT_DATASET: &str = "srtm30m";

/// Single point elevation client.
pub struct OpenTopoData {
    client: Client,
    base_url: String,
    dataset: String,
}

#[derive(Debug, Deserialize)]
struct Lookup {
    results: Vec<Sample>,
}

#[derive(Debug, Deserialize)]
struct Sample {
    elevation: Option<f64>,
}

impl OpenTopoData {
    pub fn new(base_url: &str, dataset: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            dataset: dataset.to_owned(),
        })
    }

    fn url(&self, coord: Coord<f64>) -> String {
        format!(
            "{}/{}?locations={},{}",
            self.base_url, self.dataset, coord.y, coord.x
        )
    }
}

impl ElevationSource for OpenTopoData {
    fn elevation_at(&self, coord: Coord<f64>) -> Result<f64, ElevationError> {
        let unavailable = |e: reqwest::Error| ElevationError::Unavailable(e.to_string());
        let lookup: Lookup = self
            .client
            .get(self.url(coord))
            .send()
            .and_then(Response::error_for_status)
            .map_err(unavailable)?
            .json()
            .map_err(unavailable)?;
        elevation(&lookup, coord)
    }
}

fn elevation(lookup: &Lookup, coord: Coord<f64>) -> Result<f64, ElevationError> {
    lookup
        .results
        .first()
        .and_then(|sample| sample.elevation)
        .ok_or_else(|| {
            ElevationError::Unavailable(format!("no elevation at {},{}", coord.y, coord.x))
        })
}
