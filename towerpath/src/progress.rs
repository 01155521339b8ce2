use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

pub fn bar(header: String, length: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(length);
    pb.set_prefix(header);
    pb.set_style(
        ProgressStyle::with_template("{prefix} {pos}/{len}\n[{wide_bar:.cyan/blue}] {eta}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
