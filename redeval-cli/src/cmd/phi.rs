use std::io::Write;

use anyhow::Context;
use log::info;
use redeval::distance::DistanceEngine;
use redeval::partition::{make_sequence_sets, make_wfa_sequence_sets, objective_phi};

use crate::csv_output::CsvOutput;

/// How distance records are split into close and far pairs.
#[derive(Debug, Copy, Clone)]
pub(crate) enum Partitioning {
    Radius(f64),
    GroundTruth,
}

pub(crate) fn phi(
    engine: &DistanceEngine,
    partitioning: Partitioning,
    output: Box<dyn Write + Send>,
) -> anyhow::Result<()> {
    let records = engine
        .compute()
        .context("Could not compute the pairwise distances")?;

    let (close, far) = match partitioning {
        Partitioning::Radius(radius) => make_sequence_sets(&records, radius),
        Partitioning::GroundTruth => make_wfa_sequence_sets(&records),
    };
    info!(
        "Partitioned {} pairs into {} close and {} far",
        records.len(),
        close.len(),
        far.len()
    );

    let phi = objective_phi(&close, &far).context("Could not compute the Phi objective")?;
    info!("{}", phi);

    let mut csv = CsvOutput::new(output);
    csv.add_record(&phi)?;
    csv.flush()?;

    Ok(())
}
