//! Canonical k-mer sets.
//!
//! A k-mer is canonical when it is lexicographically not greater than its
//! reverse complement, which makes a [`KmerSet`] independent of the strand the
//! sequence was read from.

use std::collections::hash_set;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::error::{ReduceError, ReduceResult};

#[inline]
#[must_use]
const fn complement(base: char) -> Option<char> {
    match base {
        'A' => Some('T'),
        'T' => Some('A'),
        'G' => Some('C'),
        'C' => Some('G'),
        _ => None,
    }
}

/// Returns the reverse complement of a nucleotide sequence.
///
/// # Examples
/// ```
/// use redeval::kmer::reverse_complement;
///
/// assert_eq!(reverse_complement("ATGC").unwrap(), "GCAT");
/// assert!(reverse_complement("").is_err());
/// assert!(reverse_complement("ATGCH").is_err());
/// ```
pub fn reverse_complement(seq: &str) -> ReduceResult<String> {
    if seq.is_empty() {
        return Err(ReduceError::EmptySequence);
    }

    seq.chars()
        .rev()
        .map(|base| complement(base).ok_or(ReduceError::InvalidNucleotide(base)))
        .collect()
}

/// Returns the canonical form of a k-mer: the k-mer itself if it is
/// lexicographically not greater than its reverse complement, or the reverse
/// complement otherwise.
///
/// # Examples
/// ```
/// use redeval::kmer::canonize;
///
/// assert_eq!(canonize("TCG").unwrap(), "CGA");
/// assert_eq!(canonize("CGA").unwrap(), "CGA");
/// ```
pub fn canonize(kmer: &str) -> ReduceResult<String> {
    let rc = reverse_complement(kmer)?;

    if rc.as_str() < kmer {
        Ok(rc)
    } else {
        Ok(kmer.to_owned())
    }
}

/// Returns the set of canonical k-mers of `seq`.
///
/// # Errors
/// Fails with [`ReduceError::InvalidKmerLength`] if `k <= 1` or `k` is larger
/// than the sequence, and with [`ReduceError::InvalidNucleotide`] if the
/// sequence contains anything other than `A`, `C`, `G`, `T`.
///
/// # Examples
/// ```
/// use redeval::kmer::{kmerize, KmerSet};
///
/// let kmers = kmerize("ATCGATCAC", 3).unwrap();
/// assert_eq!(kmers, KmerSet::from_iter(["ATC", "CGA", "TCA", "CAC"]));
/// ```
pub fn kmerize(seq: &str, k: usize) -> ReduceResult<KmerSet> {
    if k <= 1 || k > seq.len() {
        return Err(ReduceError::InvalidKmerLength {
            k,
            sequence_len: seq.len(),
        });
    }
    if let Some(base) = seq.chars().find(|&base| complement(base).is_none()) {
        return Err(ReduceError::InvalidNucleotide(base));
    }

    // Only ASCII nucleotides past this point, so byte slicing is safe
    let kmers = (0..=seq.len() - k)
        .map(|start| canonize(&seq[start..start + k]))
        .collect::<ReduceResult<HashSet<String>>>()?;

    Ok(KmerSet(kmers))
}

/// Set of unique (canonical) k-mers.
///
/// Equality is set equality: insertion order does not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KmerSet(HashSet<String>);

impl KmerSet {
    #[must_use]
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// Adds a k-mer to the set. Returns whether it was not present before.
    pub fn insert<T: Into<String>>(&mut self, kmer: T) -> bool {
        self.0.insert(kmer.into())
    }

    #[must_use]
    pub fn contains(&self, kmer: &str) -> bool {
        self.0.contains(kmer)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Returns the set of k-mers present in both `self` and `other`.
    ///
    /// # Examples
    /// ```
    /// use redeval::kmer::KmerSet;
    ///
    /// let set_1 = KmerSet::from_iter(["ATG", "GAC", "GCC"]);
    /// let set_2 = KmerSet::from_iter(["ATG", "GCA"]);
    /// assert_eq!(set_1.intersection(&set_2), KmerSet::from_iter(["ATG"]));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &KmerSet) -> KmerSet {
        KmerSet(self.0.intersection(&other.0).cloned().collect())
    }

    /// Returns the set of k-mers present in `self`, `other` or both.
    #[must_use]
    pub fn union(&self, other: &KmerSet) -> KmerSet {
        KmerSet(self.0.union(&other.0).cloned().collect())
    }

    /// Size of the intersection, without materializing it.
    #[must_use]
    pub fn intersection_len(&self, other: &KmerSet) -> usize {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller.iter().filter(|kmer| larger.contains(kmer)).count()
    }

    /// Size of the union, without materializing it.
    #[must_use]
    pub fn union_len(&self, other: &KmerSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }
}

impl<T: Into<String>> FromIterator<T> for KmerSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>> Extend<T> for KmerSet {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for KmerSet {
    type Item = String;
    type IntoIter = hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for KmerSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}} ({})",
            self.0.iter().sorted().join(", "),
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    use crate::error::{ErrorKind, ReduceError};
    use crate::kmer::{canonize, kmerize, reverse_complement, KmerSet};

    #[test]
    fn test_reverse_complement() {
        let cases = [
            ("ATGC", "GCAT"),
            ("AATAAGTCGGCCA", "TGGCCGACTTATT"),
            (
                "AAAAAAAATTTTTTTGGGGTTTTAAATTTAGGGATTAAGGATTAGAGCCCATAGAC",
                "GTCTATGGGCTCTAATCCTTAATCCCTAAATTTAAAACCCCAAAAAAATTTTTTTT",
            ),
        ];

        for (seq, expected) in cases {
            assert_eq!(reverse_complement(seq).unwrap(), expected);
        }
    }

    #[test]
    fn test_reverse_complement_errors() {
        assert_eq!(reverse_complement(""), Err(ReduceError::EmptySequence));
        assert_eq!(
            reverse_complement("ATGCH"),
            Err(ReduceError::InvalidNucleotide('H'))
        );
        assert_eq!(
            reverse_complement("ATGCH").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_canonize() {
        let cases = [
            ("TCG", "CGA"),
            ("CGA", "CGA"),
            ("GAT", "ATC"),
            ("ATC", "ATC"),
            ("TCA", "TCA"),
            ("CAC", "CAC"),
            ("GTG", "CAC"),
        ];

        for (kmer, expected) in cases {
            assert_eq!(canonize(kmer).unwrap(), expected);
        }
    }

    #[test]
    fn test_canonize_strand_independent() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let bases = ['A', 'C', 'G', 'T'];

        for _ in 0..200 {
            let len = rng.gen_range(1..32);
            let kmer: String = (0..len).map(|_| bases[rng.gen_range(0..4)]).collect();
            let rc = reverse_complement(&kmer).unwrap();

            assert_eq!(canonize(&kmer).unwrap(), canonize(&rc).unwrap());
        }
    }

    #[test]
    fn test_kmerize() {
        assert_eq!(
            kmerize("ATCGATCAC", 3).unwrap(),
            KmerSet::from_iter(["ATC", "CGA", "TCA", "CAC"])
        );
        assert_eq!(
            kmerize("AAAAAAAAA", 3).unwrap(),
            KmerSet::from_iter(["AAA"])
        );
    }

    #[test]
    fn test_kmerize_errors() {
        assert_eq!(
            kmerize("ATGCTGAC", 1),
            Err(ReduceError::InvalidKmerLength {
                k: 1,
                sequence_len: 8
            })
        );
        assert_eq!(
            kmerize("ATGCTGAC", 0).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            kmerize("ATGCTGAC", 10).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            kmerize("ATGNTGAC", 3),
            Err(ReduceError::InvalidNucleotide('N'))
        );
    }

    #[test]
    fn test_kmerize_size_bound() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1337);
        let bases = ['A', 'C', 'G', 'T'];

        for _ in 0..100 {
            let len = rng.gen_range(2..64);
            let seq: String = (0..len).map(|_| bases[rng.gen_range(0..4)]).collect();
            let k = rng.gen_range(2..=len);

            assert!(kmerize(&seq, k).unwrap().len() <= len - k + 1);
        }
    }

    #[test]
    fn test_set_equality() {
        let set_1 = KmerSet::from_iter(["ATG", "GAC", "GCC"]);
        let set_2 = KmerSet::from_iter(["GCC", "ATG", "GAC", "ATG"]);
        let set_3 = KmerSet::from_iter(["ATG", "GAC", "GCA"]);
        let set_4 = KmerSet::from_iter(["ATG", "GAC", "GCA", "GCC"]);

        assert_eq!(set_1, set_2);
        assert_ne!(set_1, set_3);
        assert_ne!(set_1, set_4);
        assert_eq!(KmerSet::new(), KmerSet::default());
    }

    #[test]
    fn test_set_algebra() {
        let set_1 = KmerSet::from_iter(["ATG", "GAC", "GCC"]);
        let set_2 = KmerSet::from_iter(["ATG", "GCA", "GCC", "TTT"]);

        assert_eq!(
            set_1.intersection(&set_2),
            KmerSet::from_iter(["ATG", "GCC"])
        );
        assert_eq!(
            set_1.union(&set_2),
            KmerSet::from_iter(["ATG", "GAC", "GCA", "GCC", "TTT"])
        );
        assert_eq!(set_1.intersection_len(&set_2), 2);
        assert_eq!(set_1.union_len(&set_2), 5);
        assert!(set_1.intersection(&KmerSet::new()).is_empty());
        assert_eq!(set_1.union(&KmerSet::new()), set_1);
    }

    #[test]
    fn test_set_display() {
        let set = KmerSet::from_iter(["GAC", "ATG"]);
        assert_eq!(set.to_string(), "{ATG, GAC} (2)");
    }
}
