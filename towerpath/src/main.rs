mod geodesy;
mod lines;
mod opentopo;
mod options;
mod output;
mod profile;
mod progress;
mod spans;
mod tables;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli {
        Cli::Lines(lines) => lines.run(),
        Cli::Spans(spans) => spans.run(),
        Cli::Profile(profile) => profile.run(),
        Cli::Distance(distance) => distance.run(),
        Cli::Zone(zone) => zone.run(),
    }
}
