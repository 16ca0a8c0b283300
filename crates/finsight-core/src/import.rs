//! CSV import parsing
//!
//! Input is `date,description,amount` text. The first line is a header and is
//! discarded without inspection. Fields are split on commas with no quoting
//! support; anything after the third field is ignored.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction};

/// A data line that was not imported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the original text (the header is line 1)
    pub line: usize,
    pub content: String,
    pub reason: String,
}

/// Result of parsing import text, before classification
#[derive(Debug, Default)]
pub struct ParsedImport {
    /// Accepted records in file order
    pub records: Vec<NewTransaction>,
    pub skipped: Vec<SkippedLine>,
}

/// Outcome of a completed import
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    /// Persisted records in file order
    pub imported: Vec<Transaction>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse import text into records, collecting the lines that were skipped
pub fn parse_csv_text(text: &str) -> Result<ParsedImport> {
    // Header is whatever the first line holds
    let Some((_, body)) = text.split_once('\n') else {
        debug!("Import text has no data lines");
        return Ok(ParsedImport::default());
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let mut parsed = ParsedImport::default();

    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record.position().map(|p| p.line() as usize + 1).unwrap_or(0);

        match parse_record(&record) {
            Ok(tx) => parsed.records.push(tx),
            Err(e) => {
                let reason = match e {
                    Error::Import(msg) => msg,
                    other => other.to_string(),
                };
                debug!(line, reason = %reason, "Skipping import line");
                parsed.skipped.push(SkippedLine {
                    line,
                    content: record.iter().collect::<Vec<_>>().join(","),
                    reason,
                });
            }
        }
    }

    debug!(
        "Parsed {} import records ({} skipped)",
        parsed.records.len(),
        parsed.skipped.len()
    );
    Ok(parsed)
}

/// Turn one split line into a record
fn parse_record(record: &StringRecord) -> Result<NewTransaction> {
    let date_str = record.get(0).unwrap_or("");
    let description = record.get(1).unwrap_or("");
    let amount_str = record.get(2).unwrap_or("");

    if date_str.is_empty() {
        return Err(Error::Import("missing date".into()));
    }
    if description.is_empty() {
        return Err(Error::Import("missing description".into()));
    }
    let amount = parse_amount(amount_str)?;
    let date = parse_date(date_str)?;

    if amount < 0.0 {
        return Err(Error::Import(format!("negative amount: {}", amount_str)));
    }

    Ok(NewTransaction::new(date, description, amount))
}

/// Parse a date in one of the accepted formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%y", // 01/15/24
        "%m/%d/%Y", // 01/15/2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("unrecognized date: {}", s)))
}

/// Parse an amount, tolerating a leading currency symbol
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned = s.trim().trim_start_matches(['₹', '$']).trim();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| Error::Import(format!("amount is not a number: {}", s)))
}
