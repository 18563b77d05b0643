use std::sync::mpsc;
use std::sync::Arc;

use log::debug;

use crate::distance::queue::JobQueue;
use crate::distance::{PairContext, PairJob, PairOutcome};
use crate::progress::ProgressNotifier;

/// Runs `min(thread_num, jobs.len())` workers draining a queue that holds
/// every job up front. The caller collects exactly one outcome per job.
///
/// Returns fewer outcomes than jobs only if a worker died before reporting.
pub(super) fn compute_all(
    context: &PairContext,
    jobs: Vec<PairJob>,
    thread_num: usize,
    progress_notifier: Arc<dyn ProgressNotifier>,
) -> Vec<PairOutcome> {
    let expected = jobs.len();
    let worker_num = thread_num.min(expected).max(1);

    let queue = Arc::new(JobQueue::new());
    queue.push_all(jobs);
    queue.close();

    debug!(
        "Starting {} workers for {} queued pairs",
        worker_num,
        queue.len()
    );
    let pool = threadpool::Builder::new()
        .num_threads(worker_num)
        .thread_name("redeval-worker".to_owned())
        .build();

    let (sender, receiver) = mpsc::channel::<PairOutcome>();
    for _ in 0..worker_num {
        let queue = queue.clone();
        let context = context.clone();
        let sender = sender.clone();

        pool.execute(move || {
            while let Some(job) = queue.pop() {
                if sender.send(context.compute(job)).is_err() {
                    return;
                }
            }
        });
    }
    drop(sender);

    let outcomes: Vec<PairOutcome> = receiver
        .iter()
        .take(expected)
        .inspect(|_| progress_notifier.inc_iter())
        .collect();
    pool.join();

    outcomes
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use crate::_internal_test_data::SCENARIO_COLLECTION;
    use crate::distance::pool::compute_all;
    use crate::distance::{PairContext, PairJob};
    use crate::progress::ProgressNotifier;
    use crate::reduction::HomopolymerCompression;

    #[derive(Debug, Default)]
    struct CountingNotifier {
        done: AtomicU64,
    }

    impl ProgressNotifier for CountingNotifier {
        fn set_iter_num(&self, _num_iter: u64) {}

        fn inc_iter(&self) {
            self.done.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_more_threads_than_jobs() {
        let context = PairContext::new(
            Arc::new(SCENARIO_COLLECTION.clone()),
            &HomopolymerCompression,
            3,
        );
        let jobs = vec![
            PairJob {
                index: 0,
                first: 0,
                second: 3,
            },
            PairJob {
                index: 1,
                first: 1,
                second: 2,
            },
        ];
        let notifier = Arc::new(CountingNotifier::default());

        let mut outcomes = compute_all(&context, jobs, 64, notifier.clone());
        outcomes.sort_unstable_by_key(|outcome| outcome.job.index);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].raw, Ok(0.7));
        assert_eq!(outcomes[0].reduced, Ok(0.5));
        assert_eq!(outcomes[1].raw, Ok(0.33333333333333337));
        assert_eq!(notifier.done.load(Ordering::Relaxed), 2);
    }
}
