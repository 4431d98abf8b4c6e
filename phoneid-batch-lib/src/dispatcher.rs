//! Bounded worker pool that runs the executor over a whole batch.
//!
//! A fixed number of workers pull phone numbers off a shared queue until it
//! is empty. `run` returns only after every worker has exited, with exactly
//! one outcome per submitted number. A panic while processing one number is
//! caught and recorded as a failed outcome for that number alone.

use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::collector::{OutcomeSet, OutcomeSink, ResultCollector};
use crate::executor::RequestExecutor;
use crate::rate_limiter::RateLimiter;
use crate::transport::Transport;
use crate::types::{Outcome, RequestConfig};

/// Runs a batch of phone numbers with bounded parallelism.
pub struct Dispatcher {
    executor: RequestExecutor,
    concurrency: usize,
}

impl Dispatcher {
    /// Create a dispatcher; `concurrency` is coerced to at least 1.
    pub fn new(executor: RequestExecutor, concurrency: usize) -> Self {
        Self {
            executor,
            concurrency: concurrency.max(1),
        }
    }

    /// Wire a dispatcher from its collaborators.
    pub fn from_parts(
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        config: RequestConfig,
        concurrency: usize,
    ) -> Self {
        Self::new(
            RequestExecutor::new(transport, limiter, Arc::new(config)),
            concurrency,
        )
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process every phone number and wait for all of them.
    ///
    /// Duplicates in `phones` are processed independently and each yields
    /// its own outcome. Outcomes are in completion order.
    pub async fn run(&self, phones: &[String]) -> OutcomeSet {
        let (sink, collector) = ResultCollector::channel(phones.len());
        if phones.is_empty() {
            drop(sink);
            return collector.finish().await;
        }

        let workers = self.concurrency.min(phones.len());
        let queue = Arc::new(WorkQueue::new(phones));
        let started = Instant::now();

        tracing::info!(
            total = phones.len(),
            workers,
            product = %self.executor.config().product,
            "starting batch"
        );

        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let queue = queue.clone();
                let executor = self.executor.clone();
                let sink = sink.clone();
                tokio::spawn(worker_loop(worker_id, queue, executor, sink))
            })
            .collect();
        drop(sink);

        for (worker_id, result) in join_all(handles).await.into_iter().enumerate() {
            if let Err(err) = result {
                tracing::error!(worker = worker_id, error = %err, "worker task failed");
            }
        }

        let outcomes = collector.finish().await;
        tracing::info!(
            total = outcomes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );
        outcomes
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<WorkQueue>,
    executor: RequestExecutor,
    sink: OutcomeSink,
) {
    while let Some(phone) = queue.pop() {
        let result = AssertUnwindSafe(executor.execute(&phone))
            .catch_unwind()
            .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(panic_payload) => {
                let panic_msg = panic_message(panic_payload.as_ref());
                tracing::error!(
                    worker = worker_id,
                    phone = %phone,
                    panic = %panic_msg,
                    "worker panicked while processing phone"
                );
                Outcome::failure(&phone, format!("internal error: {}", panic_msg))
            }
        };

        sink.record(outcome);
    }
    tracing::trace!(worker = worker_id, "worker drained queue");
}

/// FIFO of phone numbers still waiting for a worker.
struct WorkQueue {
    items: Mutex<VecDeque<String>>,
}

impl WorkQueue {
    fn new(phones: &[String]) -> Self {
        Self {
            items: Mutex::new(phones.iter().cloned().collect()),
        }
    }

    fn pop(&self) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
