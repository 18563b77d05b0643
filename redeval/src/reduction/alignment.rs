//! Encodings of which input bases survive a reduction.
//!
//! Both encodings describe the same thing: the input read is split into
//! positions that were kept (emitted an output symbol, or belong to the seed)
//! and positions that were deleted.

use std::fmt::{Display, Formatter};

use bitvec::prelude::{BitVec, Lsb0};

/// Kind of a single alignment run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AlignmentOp {
    /// Input bases that are kept.
    Match,
    /// Input bases that are deleted.
    Deletion,
}

impl AlignmentOp {
    #[must_use]
    fn from_kept(kept: bool) -> Self {
        if kept {
            AlignmentOp::Match
        } else {
            AlignmentOp::Deletion
        }
    }
}

impl Display for AlignmentOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentOp::Match => write!(f, "M"),
            AlignmentOp::Deletion => write!(f, "D"),
        }
    }
}

/// Receives kept/deleted flags for consecutive input positions.
pub(crate) trait AlignmentBuilder {
    type Output;

    /// Creates a builder expecting about `capacity` positions.
    fn with_capacity(capacity: usize) -> Self;

    fn push(&mut self, kept: bool);

    fn push_run(&mut self, kept: bool, count: usize) {
        for _ in 0..count {
            self.push(kept);
        }
    }

    fn finish(self) -> Self::Output;
}

/// Builder for plain transduction, which records nothing.
#[derive(Debug)]
pub(crate) struct NoAlignment;

impl AlignmentBuilder for NoAlignment {
    type Output = ();

    fn with_capacity(_capacity: usize) -> Self {
        NoAlignment
    }

    #[inline]
    fn push(&mut self, _kept: bool) {
        // nothing to record
    }

    #[inline]
    fn push_run(&mut self, _kept: bool, _count: usize) {
        // nothing to record
    }

    fn finish(self) -> Self::Output {}
}

/// Run-length alignment: alternating `M<count>` / `D<count>` tokens.
///
/// Zero-length runs are never stored, so two adjacent runs always have
/// different [`AlignmentOp`]s. In particular the alignment starts with a `D`
/// token, not with `M0`, when the first recorded position is a deletion
/// (e.g. a window of length 1 mapped to a deletion at the start of a read).
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct RunLengthAlignment {
    runs: Vec<(AlignmentOp, usize)>,
}

impl RunLengthAlignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` positions of given kind, merging with the last run if
    /// it has the same kind.
    ///
    /// # Examples
    /// ```
    /// use redeval::reduction::alignment::{AlignmentOp, RunLengthAlignment};
    ///
    /// let mut alignment = RunLengthAlignment::new();
    /// alignment.push_run(AlignmentOp::Match, 1);
    /// alignment.push_run(AlignmentOp::Deletion, 2);
    /// alignment.push_run(AlignmentOp::Deletion, 2);
    /// alignment.push_run(AlignmentOp::Match, 0);
    /// assert_eq!(alignment.to_string(), "M1D4");
    /// ```
    pub fn push_run(&mut self, op: AlignmentOp, count: usize) {
        if count == 0 {
            return;
        }

        match self.runs.last_mut() {
            Some((last_op, last_count)) if *last_op == op => *last_count += count,
            _ => self.runs.push((op, count)),
        }
    }

    /// Returns the runs in order of appearance.
    #[must_use]
    pub fn runs(&self) -> &[(AlignmentOp, usize)] {
        &self.runs
    }

    /// Number of kept input positions.
    #[must_use]
    pub fn kept_count(&self) -> usize {
        self.count_of(AlignmentOp::Match)
    }

    /// Number of deleted input positions.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.count_of(AlignmentOp::Deletion)
    }

    fn count_of(&self, op: AlignmentOp) -> usize {
        self.runs
            .iter()
            .filter(|(run_op, _)| *run_op == op)
            .map(|(_, count)| count)
            .sum()
    }
}

impl AlignmentBuilder for RunLengthAlignment {
    type Output = RunLengthAlignment;

    fn with_capacity(_capacity: usize) -> Self {
        RunLengthAlignment::new()
    }

    #[inline]
    fn push(&mut self, kept: bool) {
        self.push_run(AlignmentOp::from_kept(kept), 1);
    }

    #[inline]
    fn push_run(&mut self, kept: bool, count: usize) {
        RunLengthAlignment::push_run(self, AlignmentOp::from_kept(kept), count);
    }

    fn finish(self) -> Self::Output {
        self
    }
}

impl From<&BitVectorAlignment> for RunLengthAlignment {
    fn from(bits: &BitVectorAlignment) -> Self {
        let mut alignment = RunLengthAlignment::new();
        for kept in bits.iter() {
            AlignmentBuilder::push(&mut alignment, kept);
        }
        alignment
    }
}

impl Display for RunLengthAlignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (op, count) in &self.runs {
            write!(f, "{}{}", op, count)?;
        }
        Ok(())
    }
}

/// Positional bit vector alignment: bit `i` is set iff input base `i` was
/// kept.
///
/// The number of set and unset bits is tracked on every push, so both counts
/// are available in constant time.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct BitVectorAlignment {
    bits: BitVec<u64, Lsb0>,
    ones: usize,
}

impl BitVectorAlignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(capacity),
            ones: 0,
        }
    }

    /// Appends a single position.
    ///
    /// # Examples
    /// ```
    /// use redeval::reduction::alignment::BitVectorAlignment;
    ///
    /// let mut bits = BitVectorAlignment::new();
    /// bits.push_back(true);
    /// bits.push_back(false);
    /// bits.push_back(false);
    /// assert_eq!(bits.len(), 3);
    /// assert_eq!(bits.count_ones(), 1);
    /// assert_eq!(bits.count_zeros(), 2);
    /// assert_eq!(bits.to_string(), "100");
    /// ```
    #[inline]
    pub fn push_back(&mut self, kept: bool) {
        self.bits.push(kept);
        if kept {
            self.ones += 1;
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns whether input position `index` was kept.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|bit| *bit)
    }

    /// Number of kept positions.
    #[inline]
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    /// Number of deleted positions.
    #[inline]
    #[must_use]
    pub fn count_zeros(&self) -> usize {
        self.bits.len() - self.ones
    }

    /// Number of kept positions strictly before `position`, i.e. the offset in
    /// the reduced read of the output produced at input `position`.
    ///
    /// # Panics
    /// Panics if `position > self.len()`.
    #[must_use]
    pub fn rank_ones(&self, position: usize) -> usize {
        self.bits[..position].count_ones()
    }

    /// Number of deleted positions strictly before `position`.
    ///
    /// # Panics
    /// Panics if `position > self.len()`.
    #[must_use]
    pub fn rank_zeros(&self, position: usize) -> usize {
        position - self.rank_ones(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }
}

impl AlignmentBuilder for BitVectorAlignment {
    type Output = BitVectorAlignment;

    fn with_capacity(capacity: usize) -> Self {
        BitVectorAlignment::with_capacity(capacity)
    }

    #[inline]
    fn push(&mut self, kept: bool) {
        self.push_back(kept);
    }

    fn finish(self) -> Self::Output {
        self
    }
}

impl FromIterator<bool> for BitVectorAlignment {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut alignment = BitVectorAlignment::new();
        for kept in iter {
            alignment.push_back(kept);
        }
        alignment
    }
}

impl Display for BitVectorAlignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for kept in self.iter() {
            write!(f, "{}", if kept { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Alignment produced alongside a transduced read.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum AlignmentEncoding {
    RunLength(RunLengthAlignment),
    BitVector(BitVectorAlignment),
}

impl Display for AlignmentEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentEncoding::RunLength(alignment) => write!(f, "{}", alignment),
            AlignmentEncoding::BitVector(alignment) => write!(f, "{}", alignment),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::reduction::alignment::{
        AlignmentBuilder, AlignmentOp, BitVectorAlignment, RunLengthAlignment,
    };

    #[test]
    fn test_run_length_merges_runs() {
        let mut alignment = RunLengthAlignment::new();
        alignment.push_run(AlignmentOp::Match, 2);
        alignment.push_run(AlignmentOp::Match, 1);
        alignment.push_run(AlignmentOp::Deletion, 1);
        alignment.push_run(AlignmentOp::Match, 4);

        assert_eq!(
            alignment.runs(),
            [
                (AlignmentOp::Match, 3),
                (AlignmentOp::Deletion, 1),
                (AlignmentOp::Match, 4)
            ]
        );
        assert_eq!(alignment.to_string(), "M3D1M4");
        assert_eq!(alignment.kept_count(), 7);
        assert_eq!(alignment.deleted_count(), 1);
    }

    #[test]
    fn test_empty_alignments() {
        assert_eq!(RunLengthAlignment::new().to_string(), "");
        let bits = BitVectorAlignment::new();
        assert!(bits.is_empty());
        assert_eq!(bits.count_ones(), 0);
        assert_eq!(bits.count_zeros(), 0);
    }

    #[test]
    fn test_bit_vector_rank() {
        let bits: BitVectorAlignment = [true, false, false, true, true, false, true]
            .into_iter()
            .collect();

        assert_eq!(bits.count_ones(), 4);
        assert_eq!(bits.count_zeros(), 3);
        assert_eq!(bits.rank_ones(0), 0);
        assert_eq!(bits.rank_ones(3), 1);
        assert_eq!(bits.rank_ones(7), 4);
        assert_eq!(bits.rank_zeros(3), 2);
        assert_eq!(bits.get(3), Some(true));
        assert_eq!(bits.get(7), None);
        assert_eq!(bits.to_string(), "1001101");
    }

    #[test]
    fn test_bit_vector_to_run_length() {
        let bits: BitVectorAlignment = "1000010000001"
            .chars()
            .map(|ch| ch == '1')
            .collect();

        assert_eq!(RunLengthAlignment::from(&bits).to_string(), "M1D4M1D6M1");
    }

    #[test]
    fn test_builders_with_capacity() {
        let mut bits = <BitVectorAlignment as AlignmentBuilder>::with_capacity(8);
        AlignmentBuilder::push_run(&mut bits, true, 2);
        AlignmentBuilder::push(&mut bits, false);
        let bits = bits.finish();
        assert_eq!(bits.to_string(), "110");
        assert_eq!(bits.count_zeros(), 1);

        let mut runs = <RunLengthAlignment as AlignmentBuilder>::with_capacity(8);
        AlignmentBuilder::push_run(&mut runs, false, 2);
        AlignmentBuilder::push(&mut runs, true);
        assert_eq!(runs.finish().to_string(), "D2M1");
    }
}
