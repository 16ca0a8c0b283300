//! Debounced insights recomputation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::{Insights, Transaction};

use super::Summarizer;

/// Quiet period before insights are recomputed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Coalesces ledger changes into one summarizer call
///
/// Each `schedule` cancels the pending recomputation and starts a new quiet
/// period. Results are published on a watch channel; a result from a
/// superseded generation is never published.
pub struct InsightsDebouncer {
    summarizer: Summarizer,
    window: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    tx: Arc<watch::Sender<Option<Insights>>>,
}

impl InsightsDebouncer {
    pub fn new(summarizer: Summarizer, window: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            summarizer,
            window,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            tx: Arc::new(tx),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Receiver that sees every published result
    pub fn subscribe(&self) -> watch::Receiver<Option<Insights>> {
        self.tx.subscribe()
    }

    /// Last published insights, if any
    pub fn latest(&self) -> Option<Insights> {
        self.tx.borrow().clone()
    }

    /// Whether a recomputation is waiting or running
    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Restart the quiet period with a new snapshot
    ///
    /// Must be called from within a tokio runtime. Returns the generation
    /// assigned to this request.
    pub fn schedule(&self, transactions: Vec<Transaction>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut pending = self.lock_pending();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let summarizer = self.summarizer.clone();
        let window = self.window;
        let current = Arc::clone(&self.generation);
        let tx = Arc::clone(&self.tx);

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let insights = summarizer.summarize(&transactions).await;

            if current.load(Ordering::SeqCst) == generation {
                debug!(generation, "Publishing insights");
                tx.send_replace(Some(insights));
            } else {
                debug!(generation, "Dropping stale insights");
            }
        }));

        generation
    }

    /// Abort any pending recomputation without publishing
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for InsightsDebouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIClient, MockBackend};
    use crate::insights::EMPTY_SUMMARY;
    use crate::models::Category;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn txs(categories: &[Category]) -> Vec<Transaction> {
        categories
            .iter()
            .map(|&category| Transaction {
                id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                description: "x".into(),
                amount: 10.0,
                category,
            })
            .collect()
    }

    fn debouncer(mock: &MockBackend) -> InsightsDebouncer {
        InsightsDebouncer::new(
            Summarizer::new(Some(AIClient::Mock(mock.clone()))),
            DEFAULT_DEBOUNCE,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_one_call() {
        let mock = MockBackend::new();
        let debouncer = debouncer(&mock);
        assert_eq!(debouncer.window(), DEFAULT_DEBOUNCE);
        let mut rx = debouncer.subscribe();

        debouncer.schedule(txs(&[Category::Food]));
        debouncer.schedule(txs(&[Category::Food, Category::Rent]));
        let last = debouncer.schedule(txs(&[Category::Food, Category::Rent, Category::Travel]));
        assert_eq!(last, 3);

        rx.changed().await.unwrap();
        let insights = rx.borrow().clone().unwrap();
        assert!(insights.summary.contains("across 3 categories"));
        assert_eq!(mock.summarize_calls(), 1);
        assert_eq!(debouncer.latest(), Some(insights));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_published_before_window() {
        let mock = MockBackend::new();
        let debouncer = debouncer(&mock);

        debouncer.schedule(txs(&[Category::Food]));
        tokio::time::sleep(DEFAULT_DEBOUNCE / 2).await;
        assert!(debouncer.latest().is_none());
        assert!(debouncer.is_pending());
        assert_eq!(mock.summarize_calls(), 0);

        tokio::time::sleep(DEFAULT_DEBOUNCE).await;
        assert!(debouncer.latest().is_some());
        assert_eq!(mock.summarize_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_restarts_window() {
        let mock = MockBackend::new();
        let debouncer = debouncer(&mock);

        debouncer.schedule(txs(&[Category::Food]));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        debouncer.schedule(txs(&[Category::Food, Category::Rent]));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        // 2s since first schedule, but only 1s since the last one
        assert!(debouncer.latest().is_none());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let insights = debouncer.latest().unwrap();
        assert!(insights.summary.contains("across 2 categories"));
        assert_eq!(mock.summarize_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let mock = MockBackend::new();
        let debouncer = debouncer(&mock);

        debouncer.schedule(txs(&[Category::Food]));
        debouncer.cancel();
        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
        assert!(debouncer.latest().is_none());
        assert_eq!(mock.summarize_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_ledger_publishes_placeholder() {
        let mock = MockBackend::new();
        let debouncer = debouncer(&mock);
        let mut rx = debouncer.subscribe();

        debouncer.schedule(Vec::new());
        rx.changed().await.unwrap();
        assert_eq!(debouncer.latest().unwrap().summary, EMPTY_SUMMARY);
        assert_eq!(mock.summarize_calls(), 0);
    }
}
