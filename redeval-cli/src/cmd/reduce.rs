use std::io::Write;

use anyhow::Context;
use log::info;
use redeval::fasta::writer::{FastaWriter, FastaWriterParams};
use redeval::reduction::mapping::ReductionMapping;
use redeval::reduction::transducer::{SequenceTransducer, TransductionMode};
use redeval::reduction::ReductionStats;
use redeval::sequence::SequenceCollection;

use crate::PROGRESS_BAR;

pub(crate) fn reduce(
    sequences: &SequenceCollection,
    mapping: ReductionMapping,
    mode: TransductionMode,
    line_width: usize,
    output: Box<dyn Write + Send>,
) -> anyhow::Result<()> {
    let transducer = SequenceTransducer::new(mapping);
    let params = FastaWriterParams::builder().line_width(line_width).build();
    let mut writer = FastaWriter::with_params(output, params);

    PROGRESS_BAR.start_stage("Reads", sequences.len() as u64);
    let mut stats = ReductionStats::default();
    for record in sequences {
        let read = transducer
            .transduce_as(record.sequence(), mode)
            .with_context(|| format!("Could not reduce sequence {}", record.identifier()))?;
        stats += ReductionStats::new(record.len(), read.sequence().len());

        writer.write_transduced(record.identifier(), &read)?;
        PROGRESS_BAR.inc(1);
    }
    writer.flush()?;

    info!("Reduced {} reads with {} alignment: {}", sequences.len(), mode, stats);

    Ok(())
}
