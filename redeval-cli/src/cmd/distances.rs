use std::io::Write;

use anyhow::Context;
use redeval::distance::DistanceEngine;

use crate::csv_output::CsvOutput;

pub(crate) fn distances(
    engine: &DistanceEngine,
    output: Box<dyn Write + Send>,
) -> anyhow::Result<()> {
    let records = engine
        .compute()
        .context("Could not compute the pairwise distances")?;

    let mut csv = CsvOutput::new(output);
    csv.add_all(&records)?;
    csv.flush()?;

    Ok(())
}
