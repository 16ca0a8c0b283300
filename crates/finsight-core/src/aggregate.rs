//! Aggregation engine
//!
//! Pure functions deriving the chart views from a transaction slice. Nothing
//! here touches storage or the network.

use std::collections::BTreeMap;

use crate::ai::CategoryTotals;
use crate::models::{Category, CategoryDataPoint, Transaction, TrendDataPoint};

/// Display label for a trend point, e.g. "2 Jan"
pub fn trend_label(date: chrono::NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// Total spending per calendar date, ascending by date
pub fn spending_trend(transactions: &[Transaction]) -> Vec<TrendDataPoint> {
    let mut by_date: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
    for tx in transactions {
        *by_date.entry(tx.date).or_insert(0.0) += tx.amount;
    }

    by_date
        .into_iter()
        .map(|(date, amount)| TrendDataPoint {
            date: trend_label(date),
            amount,
            full_date: date,
        })
        .collect()
}

/// Total spending and members per category, largest first
///
/// Members keep their encountered order. Equal totals keep the order in which
/// each category was first seen.
pub fn category_distribution(transactions: &[Transaction]) -> Vec<CategoryDataPoint> {
    let mut groups: Vec<CategoryDataPoint> = Vec::new();
    for tx in transactions {
        match groups.iter_mut().find(|g| g.name == tx.category) {
            Some(group) => {
                group.value += tx.amount;
                group.transactions.push(tx.clone());
            }
            None => groups.push(CategoryDataPoint {
                name: tx.category,
                value: tx.amount,
                transactions: vec![tx.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| b.value.total_cmp(&a.value));
    groups
}

/// Per-category totals (the summarizer's input)
pub fn category_totals(transactions: &[Transaction]) -> CategoryTotals {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(tx.category).or_insert(0.0) += tx.amount;
    }
    totals
}

/// Sum of all amounts
pub fn total_spending(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.amount).sum()
}

/// Case-insensitive substring filter on description
///
/// An empty (or whitespace-only) term matches everything.
pub fn filter_by_description<'a>(
    transactions: &'a [Transaction],
    term: &str,
) -> Vec<&'a Transaction> {
    let needle = term.trim().to_lowercase();
    transactions
        .iter()
        .filter(|tx| needle.is_empty() || tx.description.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(d: &str, description: &str, amount: f64, category: Category) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            date: date(d),
            description: description.to_string(),
            amount,
            category,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("2024-01-01", "Rent", 1000.0, Category::Rent),
            tx("2024-01-02", "Food", 200.0, Category::Food),
            tx("2024-01-02", "Food", 50.0, Category::Food),
        ]
    }

    #[test]
    fn test_empty_input_yields_empty_views() {
        assert!(spending_trend(&[]).is_empty());
        assert!(category_distribution(&[]).is_empty());
        assert!(category_totals(&[]).is_empty());
        assert_eq!(total_spending(&[]), 0.0);
        assert!(filter_by_description(&[], "x").is_empty());
    }

    #[test]
    fn test_trend_groups_and_sorts_by_date() {
        let trend = spending_trend(&sample());
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].full_date, date("2024-01-01"));
        assert_eq!(trend[0].amount, 1000.0);
        assert_eq!(trend[0].date, "1 Jan");
        assert_eq!(trend[1].full_date, date("2024-01-02"));
        assert_eq!(trend[1].amount, 250.0);
        assert_eq!(trend[1].date, "2 Jan");
    }

    #[test]
    fn test_trend_sorts_across_years_by_date_not_label() {
        let txs = vec![
            tx("2024-12-31", "a", 1.0, Category::Other),
            tx("2023-12-31", "b", 2.0, Category::Other),
            tx("2024-01-15", "c", 3.0, Category::Other),
        ];
        let trend = spending_trend(&txs);
        let dates: Vec<_> = trend.iter().map(|p| p.full_date).collect();
        assert_eq!(
            dates,
            vec![date("2023-12-31"), date("2024-01-15"), date("2024-12-31")]
        );
        // Same label, distinct points
        assert_eq!(trend[0].date, trend[2].date);
    }

    #[test]
    fn test_distribution_sorted_descending_with_members() {
        let dist = category_distribution(&sample());
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].name, Category::Rent);
        assert_eq!(dist[0].value, 1000.0);
        assert_eq!(dist[0].transactions.len(), 1);
        assert_eq!(dist[1].name, Category::Food);
        assert_eq!(dist[1].value, 250.0);
        assert_eq!(dist[1].transactions.len(), 2);
        assert_eq!(dist[1].transactions[0].amount, 200.0);
        assert_eq!(dist[1].transactions[1].amount, 50.0);
    }

    #[test]
    fn test_distribution_ties_keep_first_encountered_order() {
        let txs = vec![
            tx("2024-01-01", "movie", 100.0, Category::Entertainment),
            tx("2024-01-01", "bus", 100.0, Category::Travel),
            tx("2024-01-01", "lunch", 300.0, Category::Food),
        ];
        let names: Vec<_> = category_distribution(&txs).iter().map(|g| g.name).collect();
        assert_eq!(
            names,
            vec![Category::Food, Category::Entertainment, Category::Travel]
        );
    }

    #[test]
    fn test_totals_are_consistent() {
        let txs = vec![
            tx("2024-02-01", "a", 10.25, Category::Food),
            tx("2024-02-03", "b", 99.5, Category::Shopping),
            tx("2024-02-01", "c", 0.0, Category::Other),
            tx("2024-02-07", "d", 1234.0, Category::Rent),
            tx("2024-02-03", "e", 7.75, Category::Food),
        ];
        let total = total_spending(&txs);
        let trend_sum: f64 = spending_trend(&txs).iter().map(|p| p.amount).sum();
        let dist_sum: f64 = category_distribution(&txs).iter().map(|g| g.value).sum();
        let totals_sum: f64 = category_totals(&txs).values().sum();

        assert!((total - 1351.5).abs() < 1e-9);
        assert!((trend_sum - total).abs() < 1e-9);
        assert!((dist_sum - total).abs() < 1e-9);
        assert!((totals_sum - total).abs() < 1e-9);
    }

    #[test]
    fn test_filter_by_description() {
        let txs = vec![
            tx("2024-01-01", "Netflix subscription", 649.0, Category::Subscriptions),
            tx("2024-01-02", "Swiggy", 300.0, Category::Food),
        ];
        assert_eq!(filter_by_description(&txs, "NETFLIX").len(), 1);
        assert_eq!(filter_by_description(&txs, "  ").len(), 2);
        assert_eq!(filter_by_description(&txs, "").len(), 2);
        assert!(filter_by_description(&txs, "uber").is_empty());
    }
}
