use crate::{options::Lines, tables};
use anyhow::Result;
use std::io::Write;

impl Lines {
    pub fn run(&self) -> Result<()> {
        let lines = tables::load_lines(&self.table)?;
        let mut stdout = std::io::stdout().lock();
        for line in &lines {
            writeln!(stdout, "{}\t{}", line.label, line.code)?;
        }
        Ok(())
    }
}
