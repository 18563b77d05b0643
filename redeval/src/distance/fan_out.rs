use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use log::debug;

use crate::distance::{PairContext, PairJob, PairOutcome};
use crate::progress::ProgressNotifier;

/// Spawns one task per pair on the rayon pool. Results are sent to a single
/// aggregator thread that stops after it has received one result per pair.
///
/// Returns fewer outcomes than jobs only if a task died before reporting.
pub(super) fn compute_all(
    context: &PairContext,
    jobs: Vec<PairJob>,
    progress_notifier: Arc<dyn ProgressNotifier>,
) -> Vec<PairOutcome> {
    let expected = jobs.len();
    let (sender, receiver) = mpsc::channel::<PairOutcome>();

    let aggregator = thread::Builder::new()
        .name("redeval-aggregator".to_owned())
        .spawn(move || {
            let mut outcomes = Vec::with_capacity(expected);
            while outcomes.len() < expected {
                match receiver.recv() {
                    Ok(outcome) => {
                        outcomes.push(outcome);
                        progress_notifier.inc_iter();
                    }
                    Err(_) => break,
                }
            }
            outcomes
        })
        .expect("Could not spawn aggregator thread");

    debug!("Spawning {} pair tasks", expected);
    rayon::scope(|scope| {
        for job in jobs {
            let sender = sender.clone();
            scope.spawn(move |_| {
                // the aggregator only stops early if it has everything
                let _ = sender.send(context.compute(job));
            });
        }
    });
    drop(sender);

    aggregator.join().expect("Aggregator thread panicked")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::_internal_test_data::SCENARIO_COLLECTION;
    use crate::distance::fan_out::compute_all;
    use crate::distance::{PairContext, PairJob};
    use crate::progress::DummyProgressNotifier;
    use crate::reduction::Identity;

    #[test]
    fn test_every_job_reported_once() {
        let context = PairContext::new(Arc::new(SCENARIO_COLLECTION.clone()), &Identity, 3);
        let jobs: Vec<PairJob> = (0..40)
            .map(|index| PairJob {
                index,
                first: index % 4,
                second: (index + 1) % 4,
            })
            .collect();

        let outcomes = compute_all(&context, jobs, Arc::new(DummyProgressNotifier));

        let mut indices: Vec<usize> = outcomes.iter().map(|outcome| outcome.job.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..40).collect::<Vec<usize>>());
        assert!(outcomes.iter().all(|outcome| outcome.raw.is_ok()));
    }
}
