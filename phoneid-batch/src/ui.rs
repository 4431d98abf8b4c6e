//! Terminal display logic for the phoneid-batch CLI.
//!
//! Everything here writes to stderr so the report path on stdout stays easy
//! to script against. Uses only the `console` crate.

use console::{style, Term};
use phoneid_batch_lib::{BatchSummary, Outcome, OutcomeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner on stderr.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner with the given message; `None` when stderr isn't a TTY.
    pub fn start(message: String) -> Option<Self> {
        if !Term::stderr().is_term() {
            return None;
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a run.
pub fn print_header(phone_count: usize, product: &str, concurrency: usize, tps: Option<f64>) {
    eprintln!(
        "{} {} {}",
        style("phoneid-batch").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "- Looking up {} number{}",
            phone_count,
            plural(phone_count)
        ))
        .dim(),
    );

    let mut meta_parts = vec![
        format!("Product: {}", product),
        format!("Concurrency: {}", concurrency),
    ];
    if let Some(tps) = tps.filter(|t| *t > 0.0) {
        meta_parts.push(format!("TPS limit: {}", tps));
    }

    eprintln!("{}", style(meta_parts.join(" | ")).dim());
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(summary: &BatchSummary, duration: Duration) {
    eprintln!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );

    let separator = format!("  {}  ", style("|").dim());
    let counts: Vec<String> = summary_counts(summary)
        .into_iter()
        .map(|(label, tone)| match tone {
            Tone::Good => style(label).green().to_string(),
            Tone::Warn => style(label).yellow().to_string(),
            Tone::Bad => style(label).red().to_string(),
            Tone::Neutral => style(label).dim().to_string(),
        })
        .collect();

    eprintln!(
        "  {} number{} in {:.1}s{}{}",
        style(summary.total).bold(),
        plural(summary.total),
        duration.as_secs_f64(),
        separator,
        counts.join(&separator),
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Good,
    Warn,
    Bad,
    Neutral,
}

/// Count labels for the summary bar; `other` only shows up when non-zero.
fn summary_counts(summary: &BatchSummary) -> Vec<(String, Tone)> {
    let mut counts = vec![
        (format!("{} ok", summary.succeeded), Tone::Good),
        (format!("{} client errors", summary.client_errors), Tone::Warn),
        (format!("{} server errors", summary.server_errors), Tone::Bad),
        (format!("{} failed", summary.transport_failures), Tone::Bad),
    ];
    if summary.other > 0 {
        counts.push((format!("{} other", summary.other), Tone::Neutral));
    }
    counts
}

// ── Failure summary ──────────────────────────────────────────────────────────

/// List numbers that never got an HTTP response, grouped by reason.
pub fn print_failure_summary(outcomes: &OutcomeSet) {
    let mut timeouts = Vec::new();
    let mut connection = Vec::new();
    let mut other = Vec::new();

    for outcome in outcomes.iter().filter(|o| o.is_transport_failure()) {
        let phone = outcome.phone().to_string();
        match brief_error(outcome) {
            "(timeout)" => timeouts.push(phone),
            "(connection error)" => connection.push(phone),
            _ => other.push(phone),
        }
    }

    if timeouts.is_empty() && connection.is_empty() && other.is_empty() {
        return;
    }

    eprintln!("  {}", style("Some numbers got no response:").yellow());
    for (label, phones) in [
        ("timeout", &timeouts),
        ("connection error", &connection),
        ("other error", &other),
    ] {
        if !phones.is_empty() {
            eprintln!(
                "  {} {} {}{}: {}",
                style("•").dim(),
                phones.len(),
                label,
                plural(phones.len()),
                format_list(phones, 5),
            );
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Join at most `max_show` entries, then "... and N more".
pub fn format_list(items: &[String], max_show: usize) -> String {
    if items.len() <= max_show {
        items.join(", ")
    } else {
        let shown = &items[..max_show];
        let remaining = items.len() - max_show;
        format!("{}, ... and {} more", shown.join(", "), remaining)
    }
}

/// Brief reason for a failed outcome.
fn brief_error(outcome: &Outcome) -> &'static str {
    match outcome.error_message() {
        Some(msg) => {
            let m = msg.to_lowercase();
            if m.contains("timeout") || m.contains("timed out") {
                "(timeout)"
            } else if m.contains("connect") || m.contains("dns") {
                "(connection error)"
            } else {
                "(error)"
            }
        }
        None => "(unknown)",
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_error_timeout() {
        let outcome = Outcome::failure("1", "request timed out after 15s");
        assert_eq!(brief_error(&outcome), "(timeout)");
    }

    #[test]
    fn test_brief_error_connection() {
        let outcome = Outcome::failure("1", "connection failed: refused");
        assert_eq!(brief_error(&outcome), "(connection error)");
    }

    #[test]
    fn test_brief_error_other() {
        let outcome = Outcome::failure("1", "internal error: boom");
        assert_eq!(brief_error(&outcome), "(error)");
        let outcome = Outcome::from_response("1", 500, "{}");
        assert_eq!(brief_error(&outcome), "(unknown)");
    }

    #[test]
    fn test_summary_counts_include_other_statuses() {
        let summary = BatchSummary {
            total: 5,
            succeeded: 2,
            client_errors: 1,
            server_errors: 0,
            transport_failures: 1,
            other: 1,
        };
        let labels: Vec<String> = summary_counts(&summary)
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(
            labels,
            vec!["2 ok", "1 client errors", "0 server errors", "1 failed", "1 other"]
        );
        assert_eq!(summary_counts(&summary)[4].1, Tone::Neutral);

        let summary = BatchSummary {
            total: 1,
            succeeded: 1,
            ..Default::default()
        };
        assert_eq!(summary_counts(&summary).len(), 4);
    }

    #[test]
    fn test_format_list_truncates() {
        let items: Vec<String> = (1..=7).map(|i| i.to_string()).collect();
        assert_eq!(format_list(&items[..3], 5), "1, 2, 3");
        assert_eq!(format_list(&items, 5), "1, 2, 3, 4, 5, ... and 2 more");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(0), "s");
        assert_eq!(plural(2), "s");
    }
}
