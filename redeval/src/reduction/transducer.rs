use std::fmt::{Display, Formatter};

use log::trace;

use crate::error::{ReduceError, ReduceResult};
use crate::reduction::alignment::{
    AlignmentBuilder, AlignmentEncoding, BitVectorAlignment, NoAlignment, RunLengthAlignment,
};
use crate::reduction::mapping::{MappedSymbol, ReductionMapping};
use crate::reduction::Reduction;

/// Which alignment, if any, to record while transducing a read.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TransductionMode {
    #[default]
    Plain,
    RunLength,
    BitVector,
}

impl Display for TransductionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransductionMode::Plain => write!(f, "plain"),
            TransductionMode::RunLength => write!(f, "run-length"),
            TransductionMode::BitVector => write!(f, "bit-vector"),
        }
    }
}

/// A read after transduction, together with its alignment if one was
/// requested.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransducedRead {
    sequence: String,
    alignment: Option<AlignmentEncoding>,
}

impl TransducedRead {
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    #[must_use]
    pub fn alignment(&self) -> Option<&AlignmentEncoding> {
        self.alignment.as_ref()
    }

    #[must_use]
    pub fn into_data(self) -> (String, Option<AlignmentEncoding>) {
        (self.sequence, self.alignment)
    }
}

/// Reduction function built from a [`ReductionMapping`] with window length
/// `w`.
///
/// The first `w - 1` symbols of a read are copied verbatim (the seed). Then a
/// window of length `w` slides over the read one symbol at a time, and each
/// window appends its mapped symbol to the output, or nothing if it maps to a
/// deletion. Every window accounts for exactly one input position in the
/// alignment, so an alignment always covers the whole read.
///
/// A read shorter than the seed is returned unchanged.
///
/// # Examples
/// ```
/// use redeval::reduction::mapping::ReductionMapping;
/// use redeval::reduction::transducer::SequenceTransducer;
///
/// let mapping = ReductionMapping::new([
///     ("AA", "."), ("AT", "T"), ("TA", "A"), ("TT", "."),
/// ]).unwrap();
/// let transducer = SequenceTransducer::new(mapping);
///
/// assert_eq!(transducer.transduce("AATTTA").unwrap(), "ATA");
/// let (read, alignment) = transducer.transduce_with_offsets("AATTTA").unwrap();
/// assert_eq!(read, "ATA");
/// assert_eq!(alignment.to_string(), "M1D1M1D2M1");
/// ```
#[derive(Debug, Clone)]
pub struct SequenceTransducer {
    mapping: ReductionMapping,
}

impl SequenceTransducer {
    #[must_use]
    pub fn new(mapping: ReductionMapping) -> Self {
        Self { mapping }
    }

    #[must_use]
    pub fn mapping(&self) -> &ReductionMapping {
        &self.mapping
    }

    /// Window length of the underlying mapping.
    #[must_use]
    pub fn window(&self) -> usize {
        self.mapping.window()
    }

    /// Transduces a read without recording the alignment.
    ///
    /// # Errors
    /// Fails with [`ReduceError::UnmappedWindow`] if the read contains a
    /// window the mapping has no entry for, and with
    /// [`ReduceError::InvalidNucleotide`] on non-ASCII symbols.
    pub fn transduce(&self, read: &str) -> ReduceResult<String> {
        let (sequence, ()) = self.run::<NoAlignment>(read)?;
        Ok(sequence)
    }

    /// Transduces a read, recording the alignment as alternating `M`/`D`
    /// runs.
    pub fn transduce_with_offsets(&self, read: &str) -> ReduceResult<(String, RunLengthAlignment)> {
        self.run::<RunLengthAlignment>(read)
    }

    /// Transduces a read, recording the alignment as one bit per input
    /// position.
    pub fn transduce_with_bit_vector(
        &self,
        read: &str,
    ) -> ReduceResult<(String, BitVectorAlignment)> {
        self.run::<BitVectorAlignment>(read)
    }

    /// Transduces a read in given mode.
    pub fn transduce_as(&self, read: &str, mode: TransductionMode) -> ReduceResult<TransducedRead> {
        let (sequence, alignment) = match mode {
            TransductionMode::Plain => (self.transduce(read)?, None),
            TransductionMode::RunLength => {
                let (sequence, alignment) = self.transduce_with_offsets(read)?;
                (sequence, Some(AlignmentEncoding::RunLength(alignment)))
            }
            TransductionMode::BitVector => {
                let (sequence, alignment) = self.transduce_with_bit_vector(read)?;
                (sequence, Some(AlignmentEncoding::BitVector(alignment)))
            }
        };

        Ok(TransducedRead {
            sequence,
            alignment,
        })
    }

    fn run<B: AlignmentBuilder>(&self, read: &str) -> ReduceResult<(String, B::Output)> {
        if let Some(symbol) = read.chars().find(|ch| !ch.is_ascii()) {
            return Err(ReduceError::InvalidNucleotide(symbol));
        }

        let window = self.mapping.window();
        let seed_len = (window - 1).min(read.len());

        let mut output = String::with_capacity(read.len());
        let mut builder = B::with_capacity(read.len());
        output.push_str(&read[..seed_len]);
        builder.push_run(true, seed_len);

        if read.len() >= window {
            for start in 0..=read.len() - window {
                let key = &read[start..start + window];
                match self.mapping.get(key) {
                    Some(MappedSymbol::Symbol(symbol)) => {
                        output.push_str(symbol);
                        builder.push(true);
                    }
                    Some(MappedSymbol::Deletion) => builder.push(false),
                    None => return Err(ReduceError::UnmappedWindow(key.to_owned())),
                }
            }
        }

        trace!(
            "Transduced read of length {} into length {}",
            read.len(),
            output.len()
        );
        Ok((output, builder.finish()))
    }
}

impl Reduction for SequenceTransducer {
    fn reduce(&self, read: &str) -> ReduceResult<String> {
        self.transduce(read)
    }
}
