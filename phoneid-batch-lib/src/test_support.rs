//! Scripted in-memory transports shared by the unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

use crate::error::TransportError;
use crate::transport::{Transport, TransportRequest, TransportResponse};

pub(crate) type Reply = Result<TransportResponse, TransportError>;

pub(crate) fn ok(status: u16, body: &str) -> Reply {
    Ok(TransportResponse::new(status, body))
}

pub(crate) fn refused() -> Reply {
    Err(TransportError::connect("connection refused"))
}

/// Replays a per-phone script; the last reply repeats once the script runs out.
///
/// The phone is taken from the last path segment of the request URL.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Instant)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<std::time::Duration>,
    panic_on: Option<String>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_script(self, phone: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(phone.to_string(), replies.into());
        self
    }

    /// Hold every call for `delay` so concurrent calls overlap.
    pub(crate) fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn panicking_on(mut self, phone: &str) -> Self {
        self.panic_on = Some(phone.to_string());
        self
    }

    pub(crate) fn call_count(&self, phone: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == phone)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn call_times(&self, phone: &str) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == phone)
            .map(|(_, t)| *t)
            .collect()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self, phone: &str) -> Reply {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(phone) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| ok(200, "{}")),
            None => ok(200, "{}"),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &TransportRequest) -> Reply {
        let phone = request.url.rsplit('/').next().unwrap_or_default().to_string();
        self.calls
            .lock()
            .unwrap()
            .push((phone.clone(), Instant::now()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.as_deref() == Some(phone.as_str()) {
            panic!("scripted transport exploded for {}", phone);
        }

        self.next_reply(&phone)
    }
}
