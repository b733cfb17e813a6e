//! CSV ingestion of transaction statements
//!
//! Accepted layout: `date,description,amount[,category]`. Header names are
//! matched case-insensitively and may appear in any order; extra columns are
//! ignored.

use std::io::{Read, Write};

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use crate::categorizer::Categorizer;
use crate::error::{Error, Result};
use crate::models::TransactionRecord;

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    category: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::Import(format!("Missing required column: {}", name)))
        };

        Ok(Self {
            date: require("date")?,
            description: require("description")?,
            amount: require("amount")?,
            category: find("category"),
        })
    }
}

/// Parse a transaction CSV. Fails on the first malformed row, naming its
/// line number (the header is line 1).
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut records = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let row = result?;

        let field = |idx: usize, name: &str| {
            row.get(idx)
                .map(str::trim)
                .ok_or_else(|| Error::Import(format!("Row {}: missing {}", line, name)))
        };

        let date = parse_date(field(columns.date, "date")?)
            .map_err(|e| Error::Import(format!("Row {}: {}", line, e)))?;
        let description = field(columns.description, "description")?.to_string();
        let amount = parse_amount(field(columns.amount, "amount")?)
            .map_err(|e| Error::Import(format!("Row {}: {}", line, e)))?;
        let category = columns
            .category
            .and_then(|idx| row.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        records.push(TransactionRecord {
            date,
            description,
            amount,
            category,
        });
    }

    debug!("Parsed {} transactions", records.len());
    Ok(records)
}

/// Assign a category to every record that lacks one
pub fn categorize_rows(
    records: Vec<TransactionRecord>,
    categorizer: &Categorizer,
) -> Vec<TransactionRecord> {
    let mut classified = 0usize;
    let records: Vec<TransactionRecord> = records
        .into_iter()
        .map(|mut record| {
            if record.category.is_none() {
                record.category = Some(categorizer.classify(&record.description));
                classified += 1;
            }
            record
        })
        .collect();

    debug!(
        total = records.len(),
        classified,
        trained = categorizer.is_trained(),
        "Categorized transactions"
    );
    records
}

/// Write records as `date,description,amount,category`
pub fn write_csv<W: Write>(records: &[TransactionRecord], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["date", "description", "amount", "category"])?;

    for record in records {
        wtr.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.description.clone(),
            format!("{:.2}", record.amount),
            record.category_or_others().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Parse a date string in common formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    // `%Y` also accepts two digits, so the short-year form goes first
    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%y", // 01/15/24
        "%m/%d/%Y", // 01/15/2024
        "%d-%m-%Y", // 15-01-2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            if has_full_year(date) {
                return Ok(date);
            }
        }
    }

    // Timestamps exported with a time component: 2024-01-15 10:30:00
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        if has_full_year(dt.date()) {
            return Ok(dt.date());
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Rejects truncated years such as `24-01-15` read through `%Y`
fn has_full_year(date: NaiveDate) -> bool {
    date.year() >= 1000
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '₹', '€', '£', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}
