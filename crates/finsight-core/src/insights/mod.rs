//! Spending insights
//!
//! - [`Summarizer`] turns the ledger into a short summary plus tips, falling
//!   back to fixed text whenever the AI backend is missing or misbehaves.
//! - [`InsightsDebouncer`] coalesces bursts of ledger changes into a single
//!   recomputation.
//!
//! ```rust,ignore
//! let summarizer = Summarizer::new(AIClient::from_env());
//! let debouncer = InsightsDebouncer::new(summarizer, DEFAULT_DEBOUNCE);
//! let mut rx = debouncer.subscribe();
//! debouncer.schedule(store.list());
//! rx.changed().await?;
//! ```

mod debounce;
mod summarizer;

pub use debounce::{InsightsDebouncer, DEFAULT_DEBOUNCE};
pub use summarizer::{
    Summarizer, EMPTY_SUMMARY, EMPTY_TIP, FAILED_SUMMARY, FAILED_TIP, MISSING_SUMMARY,
    MISSING_TIP,
};
