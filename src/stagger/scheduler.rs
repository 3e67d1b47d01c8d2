// src/stagger/scheduler.rs

//! The coordinating loop behind [`stagger`] / [`stagger_indexed`].
//!
//! One future owns all schedule state:
//! - `pending`: FIFO queue of tasks not yet started
//! - `ongoing`: a `FuturesUnordered` of started tasks (size <= limit)
//! - `done`: outcomes in completion order
//! - `last_start`: monotonic timestamp of the most recent start
//!
//! Task futures are polled inline rather than spawned, so the bookkeeping
//! between polls is plain sequential code and needs no locking.

use std::collections::VecDeque;
use std::future::Future;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

use super::options::StaggerOptions;

/// An outcome paired with the input position of the task that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed<O> {
    pub index: usize,
    pub outcome: O,
}

/// Run every task, throttled by `options`, and collect the outcomes in
/// completion order.
///
/// Each task is a closure producing a future; the closure is invoked at the
/// moment the task starts. Outcomes are not inspected, so callers that can
/// fail should produce a `Result` and decide afterwards what a failure means
/// for the batch.
pub async fn stagger<I, F, Fut>(tasks: I, options: StaggerOptions) -> Vec<Fut::Output>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future,
{
    stagger_indexed(tasks, options)
        .await
        .into_iter()
        .map(|c| c.outcome)
        .collect()
}

/// Like [`stagger`], but every outcome carries the index of its task so the
/// caller can restore input order.
pub async fn stagger_indexed<I, F, Fut>(
    tasks: I,
    options: StaggerOptions,
) -> Vec<Completed<Fut::Output>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future,
{
    let mut pending: VecDeque<(usize, F)> = tasks.into_iter().enumerate().collect();
    let total = pending.len();
    let limit = options.concurrency_limit();
    let interval = options.min_interval();

    debug!(
        total,
        concurrency_limit = limit,
        per_second = options.per_second(),
        "stagger: scheduling tasks"
    );

    let mut ongoing = FuturesUnordered::new();
    let mut done = Vec::with_capacity(total);
    let mut last_start: Option<Instant> = None;

    while done.len() < total {
        if ongoing.len() < limit && !pending.is_empty() {
            // Respect the start interval, but keep draining completions
            // while we wait.
            if let Some(ready_at) = last_start.map(|t| t + interval) {
                if ready_at > Instant::now() {
                    tokio::select! {
                        biased;
                        Some(completed) = ongoing.next() => {
                            let completed: Completed<Fut::Output> = completed;
                            trace!(index = completed.index, "stagger: task finished while waiting");
                            done.push(completed);
                            continue;
                        }
                        _ = sleep_until(ready_at) => {}
                    }
                }
            }

            let Some((index, task)) = pending.pop_front() else {
                continue;
            };
            last_start = Some(Instant::now());
            trace!(index, ongoing = ongoing.len() + 1, "stagger: starting task");

            let fut = task();
            ongoing.push(async move {
                Completed {
                    index,
                    outcome: fut.await,
                }
            });
        } else {
            match ongoing.next().await {
                Some(completed) => {
                    trace!(index = completed.index, "stagger: task finished");
                    done.push(completed);
                }
                None => break,
            }
        }
    }

    debug!(completed = done.len(), "stagger: all tasks settled");
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use tokio::time::sleep;

    fn opts(limit: usize, per_second: u32) -> StaggerOptions {
        StaggerOptions::new(limit, per_second).unwrap()
    }

    fn assert_starts(actual: &[Duration], expected_ms: &[u64]) {
        assert_eq!(actual.len(), expected_ms.len(), "starts: {actual:?}");
        for (got, want) in actual.iter().zip(expected_ms) {
            let want = Duration::from_millis(*want);
            assert!(
                *got >= want && *got <= want + Duration::from_millis(2),
                "start at {got:?}, expected ~{want:?} (all: {actual:?})"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_resolves_immediately() {
        let tasks: Vec<fn() -> std::future::Ready<u8>> = Vec::new();
        let started = Instant::now();
        let out = stagger(tasks, opts(5, 10)).await;
        assert!(out.is_empty());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn ramp_up_starts_are_spaced_by_interval() {
        let starts = Rc::new(RefCell::new(Vec::new()));
        let t0 = Instant::now();

        let tasks = (0..4).map(|i| {
            let starts = Rc::clone(&starts);
            move || {
                starts.borrow_mut().push(t0.elapsed());
                async move {
                    sleep(Duration::from_secs(5)).await;
                    i
                }
            }
        });

        let out = stagger(tasks, opts(4, 10)).await;
        assert_eq!(out.len(), 4);

        assert_starts(&starts.borrow(), &[0, 100, 200, 300]);
    }

    #[tokio::test(start_paused = true)]
    async fn replacement_start_waits_for_remaining_interval() {
        // Task 0 finishes after 10ms, but the rate is 2/s, so task 1 must
        // not start before 500ms.
        let starts = Rc::new(RefCell::new(Vec::new()));
        let t0 = Instant::now();

        let tasks = (0..2).map(|_| {
            let starts = Rc::clone(&starts);
            move || {
                starts.borrow_mut().push(t0.elapsed());
                sleep(Duration::from_millis(10))
            }
        });

        stagger(tasks, opts(1, 2)).await;
        assert_starts(&starts.borrow(), &[0, 500]);
    }

    #[tokio::test(start_paused = true)]
    async fn replacement_starts_immediately_when_interval_elapsed() {
        let starts = Rc::new(RefCell::new(Vec::new()));
        let t0 = Instant::now();

        let tasks = (0..2).map(|_| {
            let starts = Rc::clone(&starts);
            move || {
                starts.borrow_mut().push(t0.elapsed());
                sleep(Duration::from_millis(300))
            }
        });

        stagger(tasks, opts(1, 10)).await;
        assert_starts(&starts.borrow(), &[0, 300]);
    }

    #[tokio::test(start_paused = true)]
    async fn completions_are_collected_while_waiting_to_start() {
        // At 1/s the second start is due at 1000ms; task 0 finishes at 10ms
        // and must be recorded during that wait.
        let starts = Rc::new(RefCell::new(Vec::new()));
        let t0 = Instant::now();

        let tasks = [10u64, 10].into_iter().enumerate().map(|(i, ms)| {
            let starts = Rc::clone(&starts);
            move || {
                starts.borrow_mut().push(t0.elapsed());
                async move {
                    sleep(Duration::from_millis(ms)).await;
                    i
                }
            }
        });

        let out = stagger_indexed(tasks, opts(2, 1)).await;
        let indices: Vec<usize> = out.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_starts(&starts.borrow(), &[0, 1000]);
        assert!(t0.elapsed() >= Duration::from_millis(1010));
    }

    #[tokio::test(start_paused = true)]
    async fn indexed_outcomes_can_be_sorted_back() {
        let tasks = [30u64, 10, 20].into_iter().map(|ms| {
            move || async move {
                sleep(Duration::from_millis(ms)).await;
                ms
            }
        });

        let mut out = stagger_indexed(tasks, opts(3, 1000)).await;
        let completion: Vec<usize> = out.iter().map(|c| c.index).collect();
        assert_eq!(completion, vec![1, 2, 0]);

        out.sort_by_key(|c| c.index);
        let values: Vec<u64> = out.into_iter().map(|c| c.outcome).collect();
        assert_eq!(values, vec![30, 10, 20]);
    }
}
