pub mod paired;
pub mod reader;
pub mod writer;

pub const FASTA_TITLE_PREFIX: char = '>';

/// Header key under which the alignment of a transduced read is written.
pub const FASTA_ALIGNMENT_KEY: &str = "alignment=";
