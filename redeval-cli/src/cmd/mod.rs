use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use anyhow::Context;
use log::info;
use redeval::distance::{DistanceEngine, DistanceParams};
use redeval::fasta::reader::read_collection;
use redeval::reduction::mapping::ReductionMapping;
use redeval::reduction::transducer::SequenceTransducer;
use redeval::reduction::{HomopolymerCompression, Identity, Reduction};
use redeval::sequence::SequenceCollection;

use crate::cli::{EngineArgs, ReductionArgs};
use crate::opts::InputStream;
use crate::PROGRESS_BAR;

pub(crate) mod distances;
pub(crate) mod generate;
pub(crate) mod phi;
pub(crate) mod reduce;

pub(crate) fn load_sequences(input: &InputStream) -> anyhow::Result<SequenceCollection> {
    let reader = input.as_reader()?;
    let sequences = read_collection(reader.into_buf_read())
        .with_context(|| format!("Could not read sequences from {}", input))?;
    info!("Read {} sequences from {}", sequences.len(), input);

    Ok(sequences)
}

pub(crate) fn load_mapping(path: &std::path::Path) -> anyhow::Result<ReductionMapping> {
    let file = File::open(path)
        .with_context(|| format!("Could not open reduction table {}", path.display()))?;
    let mapping = ReductionMapping::read_json(BufReader::new(file))
        .with_context(|| format!("Could not parse reduction table {}", path.display()))?;
    info!(
        "Loaded reduction table with {} windows of length {}",
        mapping.len(),
        mapping.window()
    );

    Ok(mapping)
}

pub(crate) fn make_reduction(args: &ReductionArgs) -> anyhow::Result<Arc<dyn Reduction>> {
    let reduction: Arc<dyn Reduction> = if let Some(path) = &args.mapping {
        Arc::new(SequenceTransducer::new(load_mapping(path)?))
    } else if args.homopolymer {
        Arc::new(HomopolymerCompression)
    } else {
        Arc::new(Identity)
    };

    Ok(reduction)
}

pub(crate) fn make_engine(
    sequences: SequenceCollection,
    engine_args: &EngineArgs,
    reduction_args: &ReductionArgs,
) -> anyhow::Result<DistanceEngine> {
    let mut builder = DistanceParams::builder();
    builder
        .k(engine_args.k as usize)
        .strategy(engine_args.strategy.into())
        .error_policy(engine_args.on_error.into())
        .progress_notifier(Arc::new(PROGRESS_BAR.clone()));
    if let Some(threads) = engine_args.threads {
        builder.thread_num(threads);
    }

    Ok(DistanceEngine::with_reduction(
        Arc::new(sequences),
        make_reduction(reduction_args)?,
        builder.build(),
    ))
}
