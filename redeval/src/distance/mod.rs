//! Pairwise raw and reduced k-mer distances of a sequence collection.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, trace, warn};
use number_prefix::NumberPrefix;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;

use crate::error::{ReduceError, ReduceResult};
use crate::progress::{DummyProgressNotifier, ProgressNotifier};
use crate::reduction::{Identity, Reduction};
use crate::sequence::SequenceCollection;
use crate::similarity::kmerized_jaccard_distance;

mod fan_out;
mod pool;
mod queue;

/// Raw and reduced distance of an unordered pair of sequences.
///
/// The pair is unordered: records differing only in the order of their keys
/// are equal and hash the same. Distances are compared bit by bit.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceRecord {
    key1: String,
    key2: String,
    raw_distance: f64,
    reduced_distance: f64,
}

impl DistanceRecord {
    #[must_use]
    pub fn new<T, U>(key1: T, key2: U, raw_distance: f64, reduced_distance: f64) -> Self
    where
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            key1: key1.into(),
            key2: key2.into(),
            raw_distance,
            reduced_distance,
        }
    }

    #[must_use]
    pub fn key1(&self) -> &str {
        &self.key1
    }

    #[must_use]
    pub fn key2(&self) -> &str {
        &self.key2
    }

    #[must_use]
    pub fn raw_distance(&self) -> f64 {
        self.raw_distance
    }

    #[must_use]
    pub fn reduced_distance(&self) -> f64 {
        self.reduced_distance
    }

    /// Returns the keys ordered lexicographically.
    #[must_use]
    pub fn sorted_keys(&self) -> (&str, &str) {
        if self.key1 <= self.key2 {
            (&self.key1, &self.key2)
        } else {
            (&self.key2, &self.key1)
        }
    }

    /// Returns a copy of this record with its keys ordered lexicographically.
    ///
    /// # Examples
    /// ```
    /// use redeval::distance::DistanceRecord;
    ///
    /// let record = DistanceRecord::new("seq2", "seq1", 0.5, 0.25).normalized();
    /// assert_eq!(record.key1(), "seq1");
    /// assert_eq!(record.key2(), "seq2");
    /// ```
    #[must_use]
    pub fn normalized(&self) -> Self {
        let (key1, key2) = self.sorted_keys();
        Self::new(key1, key2, self.raw_distance, self.reduced_distance)
    }

    fn comparison_key(&self) -> (&str, &str, u64, u64) {
        let (key1, key2) = self.sorted_keys();
        (
            key1,
            key2,
            self.raw_distance.to_bits(),
            self.reduced_distance.to_bits(),
        )
    }
}

impl PartialEq for DistanceRecord {
    fn eq(&self, other: &Self) -> bool {
        self.comparison_key() == other.comparison_key()
    }
}

impl Eq for DistanceRecord {}

impl Hash for DistanceRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.comparison_key().hash(state);
    }
}

impl Display for DistanceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}): raw = {}, reduced = {}",
            self.key1, self.key2, self.raw_distance, self.reduced_distance
        )
    }
}

/// Returns whether two record collections contain the same records, ignoring
/// the order of the records and the order of keys within each record.
///
/// # Examples
/// ```
/// use redeval::distance::{are_distance_record_slices_equal, DistanceRecord};
///
/// let records_1 = [
///     DistanceRecord::new("a", "b", 0.5, 0.5),
///     DistanceRecord::new("a", "c", 0.7, 0.1),
/// ];
/// let records_2 = [
///     DistanceRecord::new("c", "a", 0.7, 0.1),
///     DistanceRecord::new("b", "a", 0.5, 0.5),
/// ];
/// assert!(are_distance_record_slices_equal(&records_1, &records_2));
/// assert!(!are_distance_record_slices_equal(&records_1, &records_2[..1]));
/// ```
#[must_use]
pub fn are_distance_record_slices_equal(
    records_1: &[DistanceRecord],
    records_2: &[DistanceRecord],
) -> bool {
    if records_1.len() != records_2.len() {
        return false;
    }

    let sorted_1 = records_1
        .iter()
        .map(DistanceRecord::comparison_key)
        .sorted_unstable();
    let sorted_2 = records_2
        .iter()
        .map(DistanceRecord::comparison_key)
        .sorted_unstable();

    sorted_1.eq(sorted_2)
}

/// What to do with a pair whose distance could not be computed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PairErrorPolicy {
    /// Finish all pairs, then return the first error in pair order.
    #[default]
    Propagate,
    /// Leave the pair out of the result.
    Skip,
    /// Use a distance of `0` in place of each distance that failed.
    Zero,
}

impl Display for PairErrorPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PairErrorPolicy::Propagate => write!(f, "propagate"),
            PairErrorPolicy::Skip => write!(f, "skip"),
            PairErrorPolicy::Zero => write!(f, "zero"),
        }
    }
}

/// How pairs are scheduled onto threads.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ScheduleStrategy {
    /// One task per pair on the global rayon pool, results collected by a
    /// single aggregator thread.
    #[default]
    FanOut,
    /// A fixed number of worker threads draining a shared job queue.
    Pool,
}

impl Display for ScheduleStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleStrategy::FanOut => write!(f, "fan-out"),
            ScheduleStrategy::Pool => write!(f, "pool"),
        }
    }
}

#[must_use]
fn default_thread_num() -> usize {
    std::thread::available_parallelism()
        .map(|num| num.get())
        .unwrap_or(1)
}

#[derive(Debug, Clone)]
pub struct DistanceParams {
    k: usize,
    thread_num: usize,
    error_policy: PairErrorPolicy,
    strategy: ScheduleStrategy,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl DistanceParams {
    pub fn builder() -> DistanceParamsBuilder {
        DistanceParamsBuilder::new()
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    #[must_use]
    pub fn thread_num(&self) -> usize {
        self.thread_num
    }

    #[must_use]
    pub fn error_policy(&self) -> PairErrorPolicy {
        self.error_policy
    }

    #[must_use]
    pub fn strategy(&self) -> ScheduleStrategy {
        self.strategy
    }
}

impl Default for DistanceParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct DistanceParamsBuilder {
    k: usize,
    thread_num: usize,
    error_policy: PairErrorPolicy,
    strategy: ScheduleStrategy,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl DistanceParamsBuilder {
    pub fn new() -> Self {
        Self {
            k: 3,
            thread_num: default_thread_num(),
            error_policy: PairErrorPolicy::default(),
            strategy: ScheduleStrategy::default(),
            progress_notifier: Arc::new(DummyProgressNotifier),
        }
    }

    pub fn k(&mut self, k: usize) -> &mut Self {
        let mut new = self;
        new.k = k;
        new
    }

    /// Number of workers of the [`ScheduleStrategy::Pool`] strategy. Values
    /// below 1 are treated as 1.
    pub fn thread_num(&mut self, thread_num: usize) -> &mut Self {
        let mut new = self;
        new.thread_num = thread_num;
        new
    }

    pub fn error_policy(&mut self, error_policy: PairErrorPolicy) -> &mut Self {
        let mut new = self;
        new.error_policy = error_policy;
        new
    }

    pub fn strategy(&mut self, strategy: ScheduleStrategy) -> &mut Self {
        let mut new = self;
        new.strategy = strategy;
        new
    }

    pub fn progress_notifier(&mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> &mut Self {
        let mut new = self;
        new.progress_notifier = progress_notifier;
        new
    }

    pub fn build(&mut self) -> DistanceParams {
        DistanceParams {
            k: self.k,
            thread_num: self.thread_num.max(1),
            error_policy: self.error_policy,
            strategy: self.strategy,
            progress_notifier: self.progress_notifier.clone(),
        }
    }
}

impl Default for DistanceParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Unordered pair of sequences, by their positions in the collection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct PairJob {
    index: usize,
    first: usize,
    second: usize,
}

#[derive(Debug)]
struct PairOutcome {
    job: PairJob,
    raw: ReduceResult<f64>,
    reduced: ReduceResult<f64>,
}

/// Everything a worker needs to compute a pair, shareable across threads.
///
/// Every sequence is reduced once up front; `reduced[i]` is the reduced form
/// of the `i`-th sequence, or the error its reduction failed with.
#[derive(Debug, Clone)]
struct PairContext {
    sequences: Arc<SequenceCollection>,
    reduced: Arc<Vec<ReduceResult<String>>>,
    k: usize,
}

impl PairContext {
    fn new(sequences: Arc<SequenceCollection>, reduction: &dyn Reduction, k: usize) -> Self {
        let reduced: Vec<ReduceResult<String>> = (0..sequences.len())
            .into_par_iter()
            .map(|i| reduction.reduce(sequences[i].sequence()))
            .collect();
        debug!(
            "Reduced {} sequences ({} failed)",
            reduced.len(),
            reduced.iter().filter(|result| result.is_err()).count()
        );

        Self {
            sequences,
            reduced: Arc::new(reduced),
            k,
        }
    }

    fn compute(&self, job: PairJob) -> PairOutcome {
        let seq_1 = self.sequences[job.first].sequence();
        let seq_2 = self.sequences[job.second].sequence();

        let raw = kmerized_jaccard_distance(seq_1, seq_2, self.k);
        let reduced = match (&self.reduced[job.first], &self.reduced[job.second]) {
            (Ok(reduced_1), Ok(reduced_2)) => {
                kmerized_jaccard_distance(reduced_1, reduced_2, self.k)
            }
            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
        };

        trace!(
            "Computed pair ({}, {}): raw = {:?}, reduced = {:?}",
            job.first,
            job.second,
            raw,
            reduced
        );
        PairOutcome { job, raw, reduced }
    }
}

/// Computes raw and reduced distances for every unordered pair of sequences
/// in a collection.
///
/// The raw distance of a pair is the k-mer Jaccard distance of the two
/// sequences; the reduced distance is the same distance computed after
/// applying the [`Reduction`] to both.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use redeval::distance::{DistanceEngine, DistanceParams};
/// use redeval::sequence::SequenceCollection;
///
/// let sequences = SequenceCollection::from_iter([
///     ("seq1", "ATTGCATCAT"),
///     ("seq4", "CGATGGCATA"),
/// ]);
/// let engine = DistanceEngine::new(Arc::new(sequences), DistanceParams::default());
/// let records = engine.get_distances().unwrap();
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].raw_distance(), 0.7);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceEngine {
    sequences: Arc<SequenceCollection>,
    reduction: Arc<dyn Reduction>,
    params: DistanceParams,
}

impl DistanceEngine {
    /// Creates an engine for which the reduced distance equals the raw one.
    #[must_use]
    pub fn new(sequences: Arc<SequenceCollection>, params: DistanceParams) -> Self {
        Self::with_reduction(sequences, Arc::new(Identity), params)
    }

    #[must_use]
    pub fn with_reduction(
        sequences: Arc<SequenceCollection>,
        reduction: Arc<dyn Reduction>,
        params: DistanceParams,
    ) -> Self {
        Self {
            sequences,
            reduction,
            params,
        }
    }

    #[must_use]
    pub fn sequences(&self) -> &SequenceCollection {
        &self.sequences
    }

    #[must_use]
    pub fn params(&self) -> &DistanceParams {
        &self.params
    }

    /// Number of unordered pairs, `n * (n - 1) / 2`.
    #[must_use]
    pub fn pair_num(&self) -> usize {
        let n = self.sequences.len();
        n * n.saturating_sub(1) / 2
    }

    /// Computes the distances using the strategy configured in the params.
    pub fn compute(&self) -> ReduceResult<Vec<DistanceRecord>> {
        match self.params.strategy {
            ScheduleStrategy::FanOut => self.get_distances(),
            ScheduleStrategy::Pool => self.get_distances_pooled(),
        }
    }

    /// Computes the distances by spawning a task for every pair.
    ///
    /// # Errors
    /// Fails according to the configured [`PairErrorPolicy`].
    pub fn get_distances(&self) -> ReduceResult<Vec<DistanceRecord>> {
        self.run(ScheduleStrategy::FanOut, |context, jobs, notifier| {
            fan_out::compute_all(context, jobs, notifier)
        })
    }

    /// Computes the distances with a fixed number of worker threads pulling
    /// pairs from a shared queue.
    ///
    /// # Errors
    /// Fails according to the configured [`PairErrorPolicy`].
    pub fn get_distances_pooled(&self) -> ReduceResult<Vec<DistanceRecord>> {
        let thread_num = self.params.thread_num;
        self.run(ScheduleStrategy::Pool, |context, jobs, notifier| {
            pool::compute_all(context, jobs, thread_num, notifier)
        })
    }

    fn run<F>(&self, strategy: ScheduleStrategy, scheduler: F) -> ReduceResult<Vec<DistanceRecord>>
    where
        F: FnOnce(&PairContext, Vec<PairJob>, Arc<dyn ProgressNotifier>) -> Vec<PairOutcome>,
    {
        let start_time = Instant::now();
        let jobs = self.jobs();
        let expected = jobs.len();
        info!(
            "Computing distances of {} pairs (k = {}, strategy: {})",
            expected, self.params.k, strategy
        );

        self.params.progress_notifier.set_iter_num(expected as u64);
        let outcomes = if jobs.is_empty() {
            Vec::new()
        } else {
            let context =
                PairContext::new(self.sequences.clone(), self.reduction.as_ref(), self.params.k);
            scheduler(&context, jobs, self.params.progress_notifier.clone())
        };

        if outcomes.len() != expected {
            return Err(ReduceError::MissingResults {
                expected,
                received: outcomes.len(),
            });
        }

        let records = self.collect_records(outcomes)?;
        info!("Computed {}", format_stats(start_time, records.len()));

        Ok(records)
    }

    fn jobs(&self) -> Vec<PairJob> {
        (0..self.sequences.len())
            .tuple_combinations()
            .enumerate()
            .map(|(index, (first, second))| PairJob {
                index,
                first,
                second,
            })
            .collect()
    }

    fn collect_records(&self, mut outcomes: Vec<PairOutcome>) -> ReduceResult<Vec<DistanceRecord>> {
        outcomes.sort_unstable_by_key(|outcome| outcome.job.index);

        let policy = self.params.error_policy;
        let mut records = Vec::with_capacity(outcomes.len());
        let mut first_error = None;
        let mut failed = 0;

        for outcome in outcomes {
            let key1 = self.sequences[outcome.job.first].identifier();
            let key2 = self.sequences[outcome.job.second].identifier();

            let (raw, reduced) = match (outcome.raw, outcome.reduced) {
                (Ok(raw), Ok(reduced)) => (raw, reduced),
                (raw, reduced) => {
                    failed += 1;
                    match policy {
                        PairErrorPolicy::Propagate => {
                            if first_error.is_none() {
                                first_error = raw.err().or_else(|| reduced.err());
                            }
                            continue;
                        }
                        PairErrorPolicy::Skip => {
                            if let Err(e) = raw.as_ref().and(reduced.as_ref()) {
                                warn!("Skipping pair ({}, {}): {}", key1, key2, e);
                            }
                            continue;
                        }
                        PairErrorPolicy::Zero => (
                            zero_on_error(raw, key1, key2, "raw"),
                            zero_on_error(reduced, key1, key2, "reduced"),
                        ),
                    }
                }
            };

            records.push(DistanceRecord::new(key1, key2, raw, reduced));
        }

        if let Some(error) = first_error {
            debug!("{} pairs failed, returning the first error", failed);
            return Err(error);
        }
        if failed > 0 {
            info!("{} pairs failed (policy: {})", failed, policy);
        }

        Ok(records)
    }
}

fn zero_on_error(result: ReduceResult<f64>, key1: &str, key2: &str, name: &str) -> f64 {
    result.unwrap_or_else(|e| {
        warn!(
            "Using 0 as the {} distance of pair ({}, {}): {}",
            name, key1, key2, e
        );
        0.0
    })
}

#[must_use]
fn format_stats(start_time: Instant, pairs: usize) -> String {
    let elapsed = start_time.elapsed();

    let rate = pairs as f32 / elapsed.as_secs_f32();
    let rate_human = match NumberPrefix::decimal(rate) {
        NumberPrefix::Standalone(pairs) => {
            format!("{:.1} pairs/s", pairs)
        }
        NumberPrefix::Prefixed(prefix, n) => {
            format!("{:.3} {}pairs/s", n, prefix)
        }
    };

    format!(
        "{} pairs in {:.2}s ({})",
        pairs,
        elapsed.as_secs_f32(),
        rate_human,
    )
}

/// Orders records by their sorted keys.
#[must_use]
pub fn compare_by_keys(record_1: &DistanceRecord, record_2: &DistanceRecord) -> Ordering {
    record_1.sorted_keys().cmp(&record_2.sorted_keys())
}
