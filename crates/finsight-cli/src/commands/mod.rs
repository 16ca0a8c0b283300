//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Setup commands (init, reset, ai-status) and shared utilities (open_store)
//! - `transactions` - Transaction commands (add, list, delete)
//! - `import` - CSV import
//! - `reports` - Derived views (trend, categories, insights, dashboard)
//! - `shell` - Interactive session with debounced insights

pub mod core;
pub mod import;
pub mod reports;
pub mod shell;
pub mod transactions;

// Re-export command functions for main.rs
pub use self::core::*;
pub use import::*;
pub use reports::*;
pub use shell::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount in rupees
pub fn rupees(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

/// First block of a transaction id, as shown in listings
pub fn short_id(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
