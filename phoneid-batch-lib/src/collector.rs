//! Outcome collection for a running batch.
//!
//! Workers push outcomes through cloned [`OutcomeSink`]s in whatever order
//! they finish. The [`ResultCollector`] only hands out the final
//! [`OutcomeSet`] once every sink has been dropped, so nobody can observe a
//! partial batch as complete.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::types::Outcome;

/// Write side of the collector, one clone per worker.
#[derive(Clone)]
pub struct OutcomeSink {
    tx: mpsc::UnboundedSender<Outcome>,
}

impl OutcomeSink {
    /// Hand a finished outcome to the collector.
    pub fn record(&self, outcome: Outcome) {
        if let Err(err) = self.tx.send(outcome) {
            tracing::error!(phone = err.0.phone(), "result collector dropped before batch end");
        }
    }
}

/// Read side of the collector.
pub struct ResultCollector {
    rx: mpsc::UnboundedReceiver<Outcome>,
    expected: usize,
}

impl ResultCollector {
    /// Create a collector expecting `expected` outcomes, plus its first sink.
    pub fn channel(expected: usize) -> (OutcomeSink, ResultCollector) {
        let (tx, rx) = mpsc::unbounded_channel();
        (OutcomeSink { tx }, ResultCollector { rx, expected })
    }

    /// Wait until every sink is gone and return everything recorded.
    pub async fn finish(mut self) -> OutcomeSet {
        let mut outcomes = Vec::with_capacity(self.expected);
        while let Some(outcome) = self.rx.recv().await {
            outcomes.push(outcome);
        }

        if outcomes.len() != self.expected {
            tracing::error!(
                expected = self.expected,
                received = outcomes.len(),
                "batch finished with a mismatched outcome count"
            );
        }

        OutcomeSet { outcomes }
    }
}

/// All outcomes of a finished batch, in completion order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct OutcomeSet {
    outcomes: Vec<Outcome>,
}

impl OutcomeSet {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    pub fn into_vec(self) -> Vec<Outcome> {
        self.outcomes
    }

    /// Outcomes recorded for `phone` (more than one if it was submitted twice).
    pub fn for_phone<'a>(&'a self, phone: &'a str) -> impl Iterator<Item = &'a Outcome> + 'a {
        self.outcomes.iter().filter(move |o| o.phone() == phone)
    }

    /// Counts per status class.
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.outcomes.len(),
            ..Default::default()
        };
        for outcome in &self.outcomes {
            match outcome.status_code() {
                200..=299 => summary.succeeded += 1,
                429 | 500..=599 => summary.server_errors += 1,
                400..=499 => summary.client_errors += 1,
                code if code < 0 => summary.transport_failures += 1,
                _ => summary.other += 1,
            }
        }
        summary
    }
}

impl IntoIterator for OutcomeSet {
    type Item = Outcome;
    type IntoIter = std::vec::IntoIter<Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a> IntoIterator for &'a OutcomeSet {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// Per-class totals for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    /// 2xx
    pub succeeded: usize,
    /// 4xx other than 429
    pub client_errors: usize,
    /// 429 and 5xx left after retries
    pub server_errors: usize,
    /// No HTTP response (status -1)
    pub transport_failures: usize,
    /// 1xx/3xx
    pub other: usize,
}
