//! Debounced search input.
//!
//! Keystrokes are buffered: a term is committed only after a quiet
//! period with no further input. Each keystroke bumps a generation
//! counter and spawns a timer; when the timer fires, the term is sent
//! on the commit channel only if no later keystroke has superseded it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

/// Debouncer for one search input.
#[derive(Debug)]
pub struct SearchDebouncer {
    quiet: Duration,
    generation: Arc<AtomicU64>,
    commits: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    /// Create a debouncer and the channel its committed terms arrive on.
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (commits, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            quiet,
            generation: Arc::new(AtomicU64::new(0)),
            commits,
        };
        (debouncer, rx)
    }

    /// Record a keystroke. The full current term is passed each time;
    /// only the latest one survives the quiet period.
    pub fn input(&self, term: impl Into<String>) {
        let term = term.into();
        let seq = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let commits = self.commits.clone();
        let quiet = self.quiet;

        tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if generation.load(Ordering::SeqCst) == seq {
                // Receiver gone means the session closed; nothing to do.
                let _ = commits.send(term);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_term_in_burst_commits() {
        let (debouncer, mut rx) = SearchDebouncer::new(Duration::from_millis(300));

        debouncer.input("s");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.input("st");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.input("steel");

        assert_eq!(rx.recv().await.as_deref(), Some("steel"));

        // The superseded timers fired without committing.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_pauses_commit_separately() {
        let (debouncer, mut rx) = SearchDebouncer::new(Duration::from_millis(300));

        debouncer.input("lote");
        assert_eq!(rx.recv().await.as_deref(), Some("lote"));

        debouncer.input("");
        assert_eq!(rx.recv().await.as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_receiver_discards_commits() {
        let (debouncer, rx) = SearchDebouncer::new(Duration::from_millis(300));
        drop(rx);

        // Must not panic when the session has been torn down.
        debouncer.input("orphan");
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}
