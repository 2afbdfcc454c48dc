// src/clean/mod.rs
//! Row validation and cleaning: gate rows on their identifier columns, coerce
//! every field to its target type, then suppress exact duplicates.

pub mod fields;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::ingest::RawRecord;

/// Identifier columns every usable row must carry. The cleaner takes the set
/// as a parameter (callers normally pass this default); the post-cleaning
/// validator re-checks the same three, fixed.
pub const REQUIRED_ID_FIELDS: [&str; 3] = ["ProductID", "SaleID", "RetailerID"];

/// A sales row after the identifier gate and per-field coercion.
///
/// Serialization order is the canonical duplicate identity, so field order
/// here is load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRecord {
    pub sale_id: i64,
    pub product_id: i64,
    pub retailer_id: i64,
    pub product_name: String,
    pub brand: String,
    pub category: String,
    pub retailer_name: String,
    pub channel: String,
    pub location: Option<String>,
    pub date: String,
    pub quantity: i64,
    pub price: f64,
}

impl CleanedRecord {
    /// The required identifiers by column name, in the order the validator
    /// checks them.
    pub fn identifiers(&self) -> [(&'static str, i64); 3] {
        [
            ("ProductID", self.product_id),
            ("SaleID", self.sale_id),
            ("RetailerID", self.retailer_id),
        ]
    }
}

/// True when a raw value is usable as a record identifier: non-empty, ASCII
/// digits only, and within i64 range. Signs, decimals and padding all fail
/// the digit test, which is the point: those are not identifiers.
fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit())
        && value.parse::<i64>().is_ok()
}

/// Filter and normalize raw rows into deduplicated `CleanedRecord`s.
///
/// Three passes over each row, in order:
/// 1. the structural gate: drop (and log) the row if any `id_fields` column
///    is missing, empty, or not a plain digit string; the check runs against
///    the raw values, before any trimming, so padded identifiers fail too;
/// 2. whole-row trim, then the per-column rules in [`fields`];
/// 3. duplicate suppression on the full cleaned field set, first appearance
///    wins, input order preserved.
///
/// Dropped rows are diagnostics only; they never fail the run.
pub fn clean_rows(rows: Vec<RawRecord>, id_fields: &[&str]) -> Result<Vec<CleanedRecord>> {
    let total = rows.len();
    let mut structurally_valid = Vec::with_capacity(total);

    'rows: for row in rows {
        for &field in id_fields {
            match row.get(field).map(String::as_str) {
                None | Some("") => {
                    warn!(row = ?row, field, "row excluded: missing identifier field");
                    continue 'rows;
                }
                Some(value) if !is_valid_identifier(value) => {
                    warn!(row = ?row, field, value, "row excluded: invalid identifier");
                    continue 'rows;
                }
                Some(_) => {}
            }
        }
        structurally_valid.push(row);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut cleaned = Vec::with_capacity(structurally_valid.len());
    for row in structurally_valid {
        let record = coerce_row(&row)?;
        let identity =
            serde_json::to_string(&record).context("serializing record identity")?;
        if seen.insert(identity) {
            cleaned.push(record);
        }
    }

    debug!(input = total, output = cleaned.len(), "cleaned rows");
    Ok(cleaned)
}

/// Trim every value, then apply the per-column coercions. Identifier columns
/// already passed the digit gate, so their parses cannot fail in practice;
/// the error path stays for honesty.
fn coerce_row(row: &RawRecord) -> Result<CleanedRecord> {
    let trimmed = |key: &str| row.get(key).map(|v| v.trim()).unwrap_or("");

    let parse_id = |key: &str| -> Result<i64> {
        trimmed(key)
            .parse()
            .with_context(|| format!("identifier {} not a valid integer", key))
    };

    Ok(CleanedRecord {
        sale_id: parse_id("SaleID")?,
        product_id: parse_id("ProductID")?,
        retailer_id: parse_id("RetailerID")?,
        product_name: trimmed("ProductName").to_string(),
        brand: trimmed("Brand").to_string(),
        category: trimmed("Category").to_string(),
        retailer_name: trimmed("RetailerName").to_string(),
        channel: trimmed("Channel").to_string(),
        location: fields::clean_location(trimmed("Location")),
        date: fields::clean_date(trimmed("Date")),
        quantity: fields::clean_quantity(trimmed("Quantity")),
        price: fields::clean_price(trimmed("Price")),
    })
}
