use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

#[derive(Debug)]
struct JobQueueState<T> {
    jobs: VecDeque<T>,
    closed: bool,
}

impl<T> JobQueueState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            jobs: VecDeque::new(),
            closed: false,
        }
    }
}

/// Multi-consumer queue of jobs that can be closed for further pushes.
///
/// Consumers block in [`JobQueue::pop`] until there is a job available or the
/// queue is both closed and drained.
#[derive(Debug)]
pub(super) struct JobQueue<T> {
    state: Mutex<JobQueueState<T>>,
    cvar: Condvar,
}

impl<T> JobQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(JobQueueState::new()),
            cvar: Condvar::new(),
        }
    }

    pub fn push_all<I: IntoIterator<Item = T>>(&self, jobs: I) {
        let mut state = self.state.lock().expect("Could not acquire job queue lock");

        assert!(!state.closed, "Cannot push to a closed job queue");
        state.jobs.extend(jobs);
        self.cvar.notify_all();
    }

    pub fn close(&self) {
        let mut state = self.state.lock().expect("Could not acquire job queue lock");

        state.closed = true;
        self.cvar.notify_all();
    }

    /// Takes the next job, waiting for one if the queue is empty but still
    /// open. Returns `None` once the queue is closed and drained.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock().expect("Could not acquire job queue lock");
        while !state.closed && state.jobs.is_empty() {
            state = self
                .cvar
                .wait(state)
                .expect("Could not acquire job queue lock");
        }

        state.jobs.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let state = self.state.lock().expect("Could not acquire job queue lock");
        state.jobs.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use crate::distance::queue::JobQueue;

    #[test]
    fn test_pop_in_order() {
        let queue = JobQueue::new();
        queue.push_all([1, 2]);
        queue.push_all([3, 4]);
        queue.close();

        assert_eq!(queue.len(), 4);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_closed_empty() {
        let queue: JobQueue<u32> = JobQueue::new();
        queue.close();
        assert_eq!(queue.pop(), None);
    }

    #[test]
    #[should_panic(expected = "Cannot push to a closed job queue")]
    fn test_push_after_close() {
        let queue = JobQueue::new();
        queue.close();
        queue.push_all([1]);
    }

    #[test]
    fn test_concurrent_consumers() {
        let queue = Arc::new(JobQueue::new());

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    let mut sum = 0u64;
                    while let Some(job) = queue.pop() {
                        sum += job;
                    }
                    sum
                })
            })
            .collect();

        for chunk in (1..=1000u64).collect::<Vec<_>>().chunks(100) {
            queue.push_all(chunk.iter().copied());
        }
        queue.close();

        let total: u64 = consumers
            .into_iter()
            .map(|consumer| consumer.join().unwrap())
            .sum();
        assert_eq!(total, 500500);
    }
}
