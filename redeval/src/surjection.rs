//! Random reduction tables.
//!
//! A reduction table generated here maps every input tuple over some alphabet
//! to an output tuple over another alphabet, so that every output tuple is
//! used at least once.

use itertools::Itertools;
use log::debug;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{ReduceError, ReduceResult};
use crate::reduction::mapping::ReductionMapping;

/// Returns the number of surjections from a set of `n_start` elements onto a
/// set of `n_end` elements, or `None` if it does not fit in `u128`.
///
/// # Examples
/// ```
/// use redeval::surjection::count_surjections;
///
/// assert_eq!(count_surjections(6, 5), Some(1800));
/// assert_eq!(count_surjections(3, 5), Some(0));
/// assert_eq!(count_surjections(200, 100), None);
/// ```
#[must_use]
pub fn count_surjections(n_start: usize, n_end: usize) -> Option<u128> {
    let exponent = u32::try_from(n_start).ok()?;
    let mut total: i128 = 0;
    let mut binomial: i128 = 1;

    for k in 0..=n_end {
        if k > 0 {
            // C(n, k) = C(n, k - 1) * (n - k + 1) / k, always exact
            binomial = binomial.checked_mul(i128::try_from(n_end - k + 1).ok()?)? / k as i128;
        }

        let term = binomial.checked_mul(i128::try_from(k).ok()?.checked_pow(exponent)?)?;
        total = if (n_end - k) % 2 == 0 {
            total.checked_add(term)?
        } else {
            total.checked_sub(term)?
        };
    }

    u128::try_from(total).ok()
}

/// Returns `n_start` independent, uniformly random labels from `0..n_end`.
///
/// The result is not guaranteed to use every label.
///
/// # Errors
/// Fails with [`ReduceError::EmptyOutputSet`] if `n_end == 0` and there is at
/// least one element to label.
pub fn random_mapping<R: Rng + ?Sized>(
    n_start: usize,
    n_end: usize,
    rng: &mut R,
) -> ReduceResult<Vec<usize>> {
    if n_end == 0 && n_start > 0 {
        return Err(ReduceError::EmptyOutputSet);
    }

    Ok((0..n_start).map(|_| rng.gen_range(0..n_end)).collect())
}

/// Returns a random surjective labelling of `n_start` elements with labels
/// `0..n_end`.
///
/// `n_end` distinct positions are chosen to receive the labels `0..n_end`,
/// and the rest get uniformly random labels. Every label is guaranteed to be
/// used, but the surjections are not sampled uniformly.
///
/// # Errors
/// Fails with [`ReduceError::SurjectionImpossible`] if `n_end > n_start` and
/// with [`ReduceError::EmptyOutputSet`] if `n_end == 0 < n_start`.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
/// use redeval::surjection::surjection;
///
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
/// let labels = surjection(10, 4, &mut rng).unwrap();
/// assert_eq!(labels.len(), 10);
/// assert!((0..4).all(|label| labels.contains(&label)));
/// assert!(surjection(3, 4, &mut rng).is_err());
/// ```
pub fn surjection<R: Rng + ?Sized>(
    n_start: usize,
    n_end: usize,
    rng: &mut R,
) -> ReduceResult<Vec<usize>> {
    if n_end > n_start {
        return Err(ReduceError::SurjectionImpossible { n_start, n_end });
    }

    let mut labels = random_mapping(n_start, n_end, rng)?;
    for (label, position) in index::sample(rng, n_start, n_end).into_iter().enumerate() {
        labels[position] = label;
    }

    Ok(labels)
}

/// Returns every string of length `n` over `alphabet` (the `n`-th Cartesian
/// power), in the order induced by the alphabet.
///
/// An empty vector is returned for `n == 0`.
///
/// # Examples
/// ```
/// use redeval::surjection::get_tuples;
///
/// assert_eq!(get_tuples(2, "AT"), ["AA", "AT", "TA", "TT"]);
/// assert!(get_tuples(0, "AT").is_empty());
/// ```
#[must_use]
pub fn get_tuples(n: usize, alphabet: &str) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }

    std::iter::repeat(alphabet.chars())
        .take(n)
        .multi_cartesian_product()
        .map(String::from_iter)
        .collect()
}

/// Builds a random surjective reduction table from all `input_size`-tuples
/// over `input_alphabet` onto all `output_size`-tuples over
/// `output_alphabet`.
///
/// Both tuple spaces are sorted before the surjection is drawn, so for a
/// given generator state the result only depends on the alphabets' contents.
/// An output tuple equal to `.` is a deletion.
///
/// # Errors
/// Fails if there are fewer input tuples than output tuples, or if any of the
/// tuple spaces is empty.
pub fn get_random_reduction<R: Rng + ?Sized>(
    input_alphabet: &str,
    output_alphabet: &str,
    input_size: usize,
    output_size: usize,
    rng: &mut R,
) -> ReduceResult<ReductionMapping> {
    let mut input_tuples = get_tuples(input_size, input_alphabet);
    let mut output_tuples = get_tuples(output_size, output_alphabet);
    input_tuples.sort_unstable();
    output_tuples.sort_unstable();

    debug!(
        "Drawing a surjection from {} input tuples onto {} output tuples",
        input_tuples.len(),
        output_tuples.len()
    );

    let labels = surjection(input_tuples.len(), output_tuples.len(), rng)?;
    let entries = input_tuples
        .into_iter()
        .zip(labels)
        .map(|(input, label)| (input, output_tuples[label].clone()));

    ReductionMapping::new(entries)
}

/// Source of random reduction tables owning its own generator.
///
/// Each instance has a separate generator state, so generators can be used
/// from different threads without synchronization.
#[derive(Debug, Clone)]
pub struct SurjectionGenerator {
    rng: Xoshiro256PlusPlus,
}

impl SurjectionGenerator {
    /// Creates a generator seeded from the operating system entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// Creates a generator with a fixed seed, producing the same tables on
    /// every run.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn random_mapping(&mut self, n_start: usize, n_end: usize) -> ReduceResult<Vec<usize>> {
        random_mapping(n_start, n_end, &mut self.rng)
    }

    pub fn surjection(&mut self, n_start: usize, n_end: usize) -> ReduceResult<Vec<usize>> {
        surjection(n_start, n_end, &mut self.rng)
    }

    pub fn random_reduction(
        &mut self,
        input_alphabet: &str,
        output_alphabet: &str,
        input_size: usize,
        output_size: usize,
    ) -> ReduceResult<ReductionMapping> {
        get_random_reduction(
            input_alphabet,
            output_alphabet,
            input_size,
            output_size,
            &mut self.rng,
        )
    }
}

impl Default for SurjectionGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
