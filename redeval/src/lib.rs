pub mod distance;
pub mod error;
pub mod fasta;
pub mod kmer;
pub mod partition;
pub mod progress;
pub mod reduction;
pub mod sequence;
pub mod similarity;
pub mod surjection;

#[doc(hidden)]
pub mod _internal_test_data;
