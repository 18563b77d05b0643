use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use redeval::distance::{PairErrorPolicy, ScheduleStrategy};
use redeval::reduction::transducer::TransductionMode;

use crate::opts::{input_stream, InputStream};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Don't display a progress bar/spinner
    #[clap(long, global = true, value_parser)]
    pub no_progress: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyCli {
    FanOut,
    Pool,
}

impl From<StrategyCli> for ScheduleStrategy {
    fn from(strategy: StrategyCli) -> Self {
        match strategy {
            StrategyCli::FanOut => ScheduleStrategy::FanOut,
            StrategyCli::Pool => ScheduleStrategy::Pool,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicyCli {
    Propagate,
    Skip,
    Zero,
}

impl From<ErrorPolicyCli> for PairErrorPolicy {
    fn from(policy: ErrorPolicyCli) -> Self {
        match policy {
            ErrorPolicyCli::Propagate => PairErrorPolicy::Propagate,
            ErrorPolicyCli::Skip => PairErrorPolicy::Skip,
            ErrorPolicyCli::Zero => PairErrorPolicy::Zero,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlignmentCli {
    None,
    RunLength,
    BitVector,
}

impl From<AlignmentCli> for TransductionMode {
    fn from(alignment: AlignmentCli) -> Self {
        match alignment {
            AlignmentCli::None => TransductionMode::Plain,
            AlignmentCli::RunLength => TransductionMode::RunLength,
            AlignmentCli::BitVector => TransductionMode::BitVector,
        }
    }
}

/// Reduction applied to every read before computing the reduced distance.
/// Reads are left unchanged if neither option is given.
#[derive(Args, Debug)]
pub struct ReductionArgs {
    /// JSON reduction table to transduce the reads with
    #[clap(long, value_parser, conflicts_with = "homopolymer")]
    pub mapping: Option<PathBuf>,

    /// Collapse runs of identical nucleotides
    #[clap(long, value_parser)]
    pub homopolymer: bool,
}

#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Length of the k-mers to compare
    #[clap(short, default_value_t = 3, value_parser = clap::value_parser!(u32).range(2..))]
    pub k: u32,

    /// Number of worker threads; defaults to the number of CPUs
    #[clap(long, value_parser)]
    pub threads: Option<usize>,

    /// How pairs are scheduled onto threads
    #[clap(long, value_enum, default_value_t = StrategyCli::FanOut)]
    pub strategy: StrategyCli,

    /// What to do with a pair whose distance cannot be computed
    #[clap(long, value_enum, default_value_t = ErrorPolicyCli::Propagate)]
    pub on_error: ErrorPolicyCli,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute raw and reduced Jaccard distances of all read pairs
    Distances {
        /// Input FASTA file path; `-` is the standard input
        #[clap(default_value_t, value_parser = input_stream)]
        input: InputStream,

        #[clap(flatten)]
        engine: EngineArgs,

        #[clap(flatten)]
        reduction: ReductionArgs,

        /// Output CSV file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Score a reduction with the Phi objective
    Phi {
        /// Input FASTA file path; `-` is the standard input
        #[clap(default_value_t, value_parser = input_stream)]
        input: InputStream,

        /// FASTA file with noisy copies of the input reads, in the same order;
        /// each read is then close only to its own noisy copy
        #[clap(long, value_parser = input_stream, conflicts_with = "radius")]
        noisy: Option<InputStream>,

        /// Pairs with a raw distance up to this value are close
        #[clap(long, value_parser, required_unless_present = "noisy")]
        radius: Option<f64>,

        #[clap(flatten)]
        engine: EngineArgs,

        #[clap(flatten)]
        reduction: ReductionArgs,

        /// Output CSV file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Generate a random surjective reduction table
    Generate {
        /// Symbols of the input windows
        #[clap(long, default_value = "ACGT", value_parser)]
        input_alphabet: String,

        /// Symbols of the output tuples; `.` means a deletion
        #[clap(long, default_value = "ACGT.", value_parser)]
        output_alphabet: String,

        /// Length of the input windows
        #[clap(long, value_parser = clap::value_parser!(u32).range(1..))]
        input_size: u32,

        /// Length of the output tuples
        #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        output_size: u32,

        /// Seed of the random generator; random if not given
        #[clap(long, value_parser)]
        seed: Option<u64>,

        /// Output JSON file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Transduce every read of a FASTA file with a reduction table
    Reduce {
        /// Input FASTA file path; `-` is the standard input
        #[clap(default_value_t, value_parser = input_stream)]
        input: InputStream,

        /// JSON reduction table
        #[clap(long, value_parser)]
        mapping: PathBuf,

        /// Alignment to append to each title
        #[clap(long, value_enum, default_value_t = AlignmentCli::None)]
        alignment: AlignmentCli,

        /// Wrap sequences after this many symbols; 0 disables wrapping
        #[clap(long, default_value_t = 0, value_parser)]
        line_width: usize,

        /// Output FASTA file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },
}
