use crate::error::ReduceResult;
use crate::kmer::{kmerize, KmerSet};

/// Returns the Jaccard index `|A ∩ B| / |A ∪ B|` of two k-mer sets, or `0.0`
/// if either of them is empty.
///
/// # Examples
/// ```
/// use redeval::kmer::KmerSet;
/// use redeval::similarity::jaccard_similarity;
///
/// let set_1 = KmerSet::from_iter(["ATG", "GAC"]);
/// let set_2 = KmerSet::from_iter(["ATG", "GCC"]);
/// assert_eq!(jaccard_similarity(&set_1, &set_2), 1.0 / 3.0);
/// assert_eq!(jaccard_similarity(&set_1, &KmerSet::new()), 0.0);
/// ```
#[must_use]
pub fn jaccard_similarity(set_1: &KmerSet, set_2: &KmerSet) -> f64 {
    if set_1.is_empty() || set_2.is_empty() {
        return 0.0;
    }

    let intersection_len = set_1.intersection_len(set_2);
    let union_len = set_1.union_len(set_2);

    intersection_len as f64 / union_len as f64
}

/// Returns the Jaccard distance between the canonical k-mer sets of two
/// sequences.
///
/// # Errors
/// Propagates [`kmerize`] failures for either sequence.
///
/// # Examples
/// ```
/// use redeval::similarity::kmerized_jaccard_distance;
///
/// let distance = kmerized_jaccard_distance("ATTGCATCAT", "CGATGGCATA", 3).unwrap();
/// assert_eq!(distance, 0.7);
/// ```
pub fn kmerized_jaccard_distance(seq_1: &str, seq_2: &str, k: usize) -> ReduceResult<f64> {
    let kmers_1 = kmerize(seq_1, k)?;
    let kmers_2 = kmerize(seq_2, k)?;

    Ok(1.0 - jaccard_similarity(&kmers_1, &kmers_2))
}
