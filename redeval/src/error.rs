use std::error::Error;
use std::fmt::{Display, Formatter};

/// Broad category of a [`ReduceError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The data passed in (a sequence, a read) is malformed.
    InvalidInput,
    /// A numeric parameter is outside of its valid range.
    InvalidParameter,
    /// The operation is undefined for the current data (e.g. a mean over an
    /// empty set).
    InvalidState,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidInput => write!(f, "Invalid input"),
            ErrorKind::InvalidParameter => write!(f, "Invalid parameter"),
            ErrorKind::InvalidState => write!(f, "Invalid state"),
        }
    }
}

/// Error occurring while k-merizing, reducing or scoring sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum ReduceError {
    /// Tried to reverse complement an empty sequence.
    EmptySequence,
    /// Sequence contains a symbol that is not a nucleotide.
    InvalidNucleotide(char),
    /// `k` is not in range `2..=sequence_len`.
    InvalidKmerLength { k: usize, sequence_len: usize },
    /// Cannot map `n_start` elements onto `n_end` elements surjectively.
    SurjectionImpossible { n_start: usize, n_end: usize },
    /// Cannot draw labels from an empty output set.
    EmptyOutputSet,
    /// Reduction table has no entries.
    EmptyMapping,
    /// Reduction table keys do not share a single, non-zero length.
    InconsistentWindow { expected: usize, found: usize },
    /// A read contains a window that has no entry in the reduction table.
    UnmappedWindow(String),
    /// A set of distance records that has to be non-empty is empty.
    EmptyRecordSet(&'static str),
    /// A far pair has a raw distance of zero, so its distance ratio is
    /// undefined.
    ZeroRawDistance { key1: String, key2: String },
    /// The mean distance ratio of far pairs is zero.
    ZeroFarMean,
    /// A scheduler did not receive a result for every pair.
    MissingResults { expected: usize, received: usize },
}

impl ReduceError {
    /// Returns the category this error belongs to.
    ///
    /// # Examples
    /// ```
    /// use redeval::error::{ErrorKind, ReduceError};
    ///
    /// assert_eq!(ReduceError::EmptySequence.kind(), ErrorKind::InvalidInput);
    /// assert_eq!(ReduceError::ZeroFarMean.kind(), ErrorKind::InvalidState);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReduceError::EmptySequence
            | ReduceError::InvalidNucleotide(_)
            | ReduceError::UnmappedWindow(_) => ErrorKind::InvalidInput,
            ReduceError::InvalidKmerLength { .. }
            | ReduceError::SurjectionImpossible { .. }
            | ReduceError::EmptyOutputSet
            | ReduceError::EmptyMapping
            | ReduceError::InconsistentWindow { .. } => ErrorKind::InvalidParameter,
            ReduceError::EmptyRecordSet(_)
            | ReduceError::ZeroRawDistance { .. }
            | ReduceError::ZeroFarMean
            | ReduceError::MissingResults { .. } => ErrorKind::InvalidState,
        }
    }
}

impl Display for ReduceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.kind())?;

        match self {
            ReduceError::EmptySequence => write!(f, "cannot reverse complement an empty sequence"),
            ReduceError::InvalidNucleotide(ch) => write!(f, "unknown nucleotide: `{}`", ch),
            ReduceError::InvalidKmerLength { k, sequence_len } => write!(
                f,
                "k must be in range 2..={} (got k = {})",
                sequence_len, k
            ),
            ReduceError::SurjectionImpossible { n_start, n_end } => write!(
                f,
                "no surjection from {} elements onto {} elements",
                n_start, n_end
            ),
            ReduceError::EmptyOutputSet => write!(f, "output set is empty"),
            ReduceError::EmptyMapping => write!(f, "reduction table is empty"),
            ReduceError::InconsistentWindow { expected, found } => write!(
                f,
                "reduction table key length mismatch (expected: {}, found: {})",
                expected, found
            ),
            ReduceError::UnmappedWindow(window) => {
                write!(f, "window `{}` is missing from the reduction table", window)
            }
            ReduceError::EmptyRecordSet(name) => write!(f, "{} set is empty", name),
            ReduceError::ZeroRawDistance { key1, key2 } => write!(
                f,
                "far pair ({}, {}) has a raw distance of zero",
                key1, key2
            ),
            ReduceError::ZeroFarMean => write!(f, "mean distance ratio of far pairs is zero"),
            ReduceError::MissingResults { expected, received } => write!(
                f,
                "received {} pair results, expected {}",
                received, expected
            ),
        }
    }
}

impl Error for ReduceError {}

/// The result of a reduction-evaluation operation.
pub type ReduceResult<T> = Result<T, ReduceError>;
