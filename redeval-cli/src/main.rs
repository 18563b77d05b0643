#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use anyhow::Context;
use atty::Stream;
use clap::Parser;
use cli::{Cli, Commands};
use cmd::{distances, generate, phi, reduce};
use human_panic::setup_panic;
use lazy_static::lazy_static;
use redeval::fasta::paired::read_paired;

use crate::logging::init_logging;
use crate::opts::OutputWriter;
use crate::progress_bar::RedevalProgressBar;

mod cli;
mod cmd;
mod csv_output;
mod logging;
mod opts;
mod progress_bar;

lazy_static! {
    pub(crate) static ref PROGRESS_BAR: RedevalProgressBar = RedevalProgressBar::new();
}

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();

    if !cli.no_progress && atty::is(Stream::Stderr) {
        PROGRESS_BAR.show();
    }

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Distances {
            input,
            engine,
            reduction,
            output,
        } => {
            let sequences = cmd::load_sequences(input)?;
            let engine = cmd::make_engine(sequences, engine, reduction)?;
            let output = OutputWriter::from_path(output)?;

            distances::distances(&engine, output.into_write())
                .context("Failed to compute distances for given FASTA file")?;
        }
        Commands::Phi {
            input,
            noisy,
            radius,
            engine,
            reduction,
            output,
        } => {
            let (sequences, partitioning) = match (noisy, radius) {
                (Some(noisy), _) => {
                    let clean_reader = input.as_reader()?.into_buf_read();
                    let noisy_reader = noisy.as_reader()?.into_buf_read();
                    let sequences = read_paired(clean_reader, noisy_reader).with_context(|| {
                        format!("Could not read paired sequences from {} and {}", input, noisy)
                    })?;

                    (sequences, phi::Partitioning::GroundTruth)
                }
                (None, Some(radius)) => {
                    (cmd::load_sequences(input)?, phi::Partitioning::Radius(*radius))
                }
                (None, None) => anyhow::bail!("Either --radius or --noisy must be given"),
            };
            let engine = cmd::make_engine(sequences, engine, reduction)?;
            let output = OutputWriter::from_path(output)?;

            phi::phi(&engine, partitioning, output.into_write())
                .context("Failed to score the reduction")?;
        }
        Commands::Generate {
            input_alphabet,
            output_alphabet,
            input_size,
            output_size,
            seed,
            output,
        } => {
            let options = generate::GenerateOptions {
                input_alphabet,
                output_alphabet,
                input_size: *input_size as usize,
                output_size: *output_size as usize,
                seed: *seed,
            };
            let output = OutputWriter::from_path(output)?;

            generate::generate(&options, output.into_write())
                .context("Failed to generate a reduction table")?;
        }
        Commands::Reduce {
            input,
            mapping,
            alignment,
            line_width,
            output,
        } => {
            let sequences = cmd::load_sequences(input)?;
            let mapping = cmd::load_mapping(mapping)?;
            let output = OutputWriter::from_path(output)?;

            reduce::reduce(
                &sequences,
                mapping,
                (*alignment).into(),
                *line_width,
                output.into_write(),
            )
            .context("Failed to reduce given FASTA file")?;
        }
    }

    PROGRESS_BAR.finish();
    Ok(())
}
