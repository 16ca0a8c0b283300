//! Domain models for FinSight

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Spending category
///
/// A closed set: anything the classifier returns that is not one of these
/// labels becomes [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Category {
    Food,
    Rent,
    Travel,
    Utilities,
    Subscriptions,
    Shopping,
    Entertainment,
    #[default]
    Other,
}

impl Category {
    /// Every category, in prompt order
    pub const ALL: [Category; 8] = [
        Self::Food,
        Self::Rent,
        Self::Travel,
        Self::Utilities,
        Self::Subscriptions,
        Self::Shopping,
        Self::Entertainment,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Rent => "Rent",
            Self::Travel => "Travel",
            Self::Utilities => "Utilities",
            Self::Subscriptions => "Subscriptions",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    /// Always non-negative
    pub amount: f64,
    pub category: Category,
}

/// A transaction before the store assigns its id and category
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
}

impl NewTransaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
        }
    }

    /// Reject records that would break the ledger invariants
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("description must not be empty".into());
        }
        if !self.amount.is_finite() {
            return Err(format!("amount must be a finite number, got {}", self.amount));
        }
        if self.amount < 0.0 {
            return Err(format!("amount must not be negative, got {}", self.amount));
        }
        Ok(())
    }

    /// Attach an id and category
    pub fn into_transaction(self, category: Category) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            date: self.date,
            description: self.description.trim().to_string(),
            amount: self.amount,
            category,
        }
    }
}

// ========== Derived Views ==========

/// Total spending on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDataPoint {
    /// Display label, e.g. "2 Jan"
    pub date: String,
    pub amount: f64,
    /// The date the label was rendered from (sort key)
    pub full_date: NaiveDate,
}

/// Total spending and member transactions for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDataPoint {
    pub name: Category,
    pub value: f64,
    pub transactions: Vec<Transaction>,
}

/// AI-generated spending summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub summary: String,
    pub tips: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl Insights {
    pub fn new(summary: impl Into<String>, tips: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            tips,
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("  SUBSCRIPTIONS ".parse::<Category>().unwrap(), Category::Subscriptions);
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, "\"Entertainment\"");
        let back: Category = serde_json::from_str("\"Shopping\"").unwrap();
        assert_eq!(back, Category::Shopping);
    }

    #[test]
    fn test_new_transaction_validate() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(NewTransaction::new(date, "Coffee", 3.5).validate().is_ok());
        assert!(NewTransaction::new(date, "Coffee", 0.0).validate().is_ok());
        assert!(NewTransaction::new(date, "   ", 3.5).validate().is_err());
        assert!(NewTransaction::new(date, "Coffee", -1.0).validate().is_err());
        assert!(NewTransaction::new(date, "Coffee", f64::NAN).validate().is_err());
    }

    #[test]
    fn test_trend_point_uses_camel_case() {
        let point = TrendDataPoint {
            date: "2 Jan".into(),
            amount: 250.0,
            full_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["fullDate"], "2024-01-02");
        assert_eq!(json["date"], "2 Jan");
    }
}
