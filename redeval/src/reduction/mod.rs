use std::fmt::{Debug, Display, Formatter};

use derive_more::{Add, AddAssign};
use itertools::Itertools;

use crate::error::ReduceResult;

pub mod alignment;
pub mod mapping;
pub mod transducer;

/// A function shrinking a read before its k-mers are compared.
///
/// Implementations are shared between worker threads, so they must not rely
/// on interior mutability without synchronization.
pub trait Reduction: Debug + Send + Sync {
    /// Returns the reduced form of `read`.
    ///
    /// # Errors
    /// Fails if the read cannot be reduced, e.g. because it contains a symbol
    /// the reduction does not know.
    fn reduce(&self, read: &str) -> ReduceResult<String>;
}

/// Reduction that returns every read unchanged.
#[derive(Debug, Copy, Clone, Default)]
pub struct Identity;

impl Reduction for Identity {
    fn reduce(&self, read: &str) -> ReduceResult<String> {
        Ok(read.to_owned())
    }
}

/// Reduction collapsing every run of identical symbols into a single symbol.
///
/// # Examples
/// ```
/// use redeval::reduction::{HomopolymerCompression, Reduction};
///
/// assert_eq!(HomopolymerCompression.reduce("AATGCCAGTCA").unwrap(), "ATGCAGTCA");
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct HomopolymerCompression;

impl Reduction for HomopolymerCompression {
    fn reduce(&self, read: &str) -> ReduceResult<String> {
        Ok(read.chars().dedup().collect())
    }
}

/// Total length of reads before and after a reduction.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Add, AddAssign)]
pub struct ReductionStats {
    input_len: usize,
    output_len: usize,
}

impl ReductionStats {
    #[must_use]
    pub const fn new(input_len: usize, output_len: usize) -> Self {
        Self {
            input_len,
            output_len,
        }
    }

    #[must_use]
    pub const fn input_len(&self) -> usize {
        self.input_len
    }

    #[must_use]
    pub const fn output_len(&self) -> usize {
        self.output_len
    }

    /// Output length relative to input length, `1.0` if nothing was read.
    ///
    /// # Examples
    /// ```
    /// use redeval::reduction::ReductionStats;
    ///
    /// let mut stats = ReductionStats::new(10, 9);
    /// stats += ReductionStats::new(10, 1);
    /// assert_eq!(stats.ratio(), 0.5);
    /// ```
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.input_len == 0 {
            return 1.0;
        }

        self.output_len as f64 / self.input_len as f64
    }
}

impl Display for ReductionStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} symbols ({:.3}%)",
            self.input_len,
            self.output_len,
            self.ratio() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::reduction::{HomopolymerCompression, Identity, Reduction, ReductionStats};

    #[test]
    fn test_identity() {
        assert_eq!(Identity.reduce("ATTGCATCAT").unwrap(), "ATTGCATCAT");
        assert_eq!(Identity.reduce("").unwrap(), "");
    }

    #[test]
    fn test_homopolymer_compression() {
        let cases = [
            ("AATGCCAGTCA", "ATGCAGTCA"),
            ("", ""),
            ("A", "A"),
            ("AAAAAAA", "A"),
            ("ATTGCATCAT", "ATGCATCAT"),
            ("AGTCAGGCAG", "AGTCAGCAG"),
        ];

        for (read, expected) in cases {
            assert_eq!(HomopolymerCompression.reduce(read).unwrap(), expected);
        }
    }

    #[test]
    fn test_reduction_stats() {
        let stats = ReductionStats::new(8, 4) + ReductionStats::new(2, 1);

        assert_eq!(stats, ReductionStats::new(10, 5));
        assert_eq!(stats.ratio(), 0.5);
        assert_eq!(stats.to_string(), "10 -> 5 symbols (50.000%)");
        assert_eq!(ReductionStats::default().ratio(), 1.0);
    }
}
