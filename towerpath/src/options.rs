use anyhow::{anyhow, Error as AnyError};
use clap::{Args, Parser, ValueEnum};
use geo::geometry::Coord;
use linepath::{BranchPolicy, ChainBuilder, ORIGIN_MARKER};
use std::{path::PathBuf, str::FromStr};

/// Reconstruct transmission line paths from registry exports.
#[derive(Debug, Parser)]
#[command(version)]
pub enum Cli {
    /// List the line labels of the lines table.
    Lines(Lines),

    /// Print a line's spans, resolved and ordered from its origin.
    Spans(Spans),

    /// Print a line's longitudinal profile, looking up missing
    /// altitudes.
    Profile(Profile),

    /// Measure the distance between two points.
    Distance(Distance),

    /// Print the UTM zone and planar coordinates of a point.
    Zone(Zone),
}

#[derive(Debug, Clone, Args)]
pub struct LineTable {
    /// Lines table (CSV).
    #[arg(long)]
    pub lines: PathBuf,

    /// Column of the lines table holding line labels.
    #[arg(long, default_value = "NOME_LT")]
    pub label_column: String,

    /// Column of the lines table holding line SAP codes.
    #[arg(long, default_value = "COD_LT_SAP")]
    pub code_column: String,
}

#[derive(Debug, Clone, Args)]
pub struct Tables {
    #[command(flatten)]
    pub lines: LineTable,

    /// Structures table (CSV).
    #[arg(long)]
    pub structures: PathBuf,

    /// Connections table (CSV).
    #[arg(long)]
    pub connections: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Chain {
    /// Structure code prefix marking a line's origin.
    #[arg(long, default_value = ORIGIN_MARKER)]
    pub origin_marker: String,

    /// Fail on structures with more than one outgoing span instead of
    /// following the first.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

impl Chain {
    pub fn builder(&self) -> ChainBuilder {
        ChainBuilder::new()
            .origin_marker(self.origin_marker.clone())
            .branch_policy(if self.strict {
                BranchPolicy::Reject
            } else {
                BranchPolicy::FirstMatch
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct Lines {
    #[command(flatten)]
    pub table: LineTable,
}

#[derive(Debug, Clone, Args)]
pub struct Spans {
    #[command(flatten)]
    pub tables: Tables,

    #[command(flatten)]
    pub chain: Chain,

    /// Label of the line to reconstruct.
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub line: Option<String>,

    /// Reconstruct every line and print a summary.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,
}

#[derive(Debug, Clone, Args)]
pub struct Profile {
    #[command(flatten)]
    pub tables: Tables,

    #[command(flatten)]
    pub chain: Chain,

    /// Label of the line to profile.
    #[arg(long)]
    pub line: String,

    /// Give up on altitude lookups after this many seconds.
    #[arg(long)]
    pub budget: Option<u64>,

    /// Wait between altitude lookups, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub cooldown_ms: u64,

    /// Elevation service base URL.
    #[arg(long, default_value = crate::opentopo::DEFAULT_URL)]
    pub elevation_url: String,

    /// Elevation service dataset.
    #[arg(long, default_value = crate::opentopo::DEFAULT_DATASET)]
    pub dataset: String,

    /// Elevation request timeout, in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Skip altitude lookups; missing altitudes stay blank.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Distance {
    /// First point "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub from: LatLon,

    /// Second point "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub to: LatLon,
}

#[derive(Debug, Clone, Args)]
pub struct Zone {
    /// Point "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub at: LatLon,
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        Ok(Self(Coord { y: lat, x: lon }))
    }
}
