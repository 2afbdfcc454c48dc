// src/transform/mod.rs
//! Reshape cleaned sales rows into the star schema: three dimensions keyed by
//! ProductID / RetailerID / Date, one fact set keyed by SaleID. Single pass,
//! first occurrence wins on every key.

pub mod calendar;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;

use crate::clean::CleanedRecord;

/// Product dimension row, one per distinct ProductID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDimRecord {
    pub product_id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
}

/// Retailer dimension row, one per distinct RetailerID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetailerDimRecord {
    pub retailer_id: i64,
    pub name: String,
    pub channel: Option<String>,
    pub location: Option<String>,
}

/// Date dimension row, one per distinct date string, calendar attributes
/// derived in [`calendar`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateDimRecord {
    pub date: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub quarter: i32,
    pub day_of_week: String,
    pub week_of_year: i32,
}

/// Sales fact row, one per distinct SaleID. Dimension keys are carried by
/// value; referential integrity is the store's concern, not checked here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesFactRecord {
    pub sale_id: i64,
    pub product_id: i64,
    pub retailer_id: i64,
    pub date: String,
    pub quantity: i64,
    pub price: f64,
}

/// The four record sets of one pipeline run, ready for publishing.
#[derive(Debug, Default, PartialEq)]
pub struct MartTables {
    pub product_dim: Vec<ProductDimRecord>,
    pub retailer_dim: Vec<RetailerDimRecord>,
    pub date_dim: Vec<DateDimRecord>,
    pub sales_fact: Vec<SalesFactRecord>,
}

/// Partition cleaned records into the four star-schema record sets.
///
/// Uniqueness registers track what has been *emitted*, not what has been
/// seen: a product whose first occurrence had an empty name is not
/// registered, so a later, named occurrence still produces its dimension
/// row. Output order is first-emission order.
///
/// A date that fails calendar derivation aborts the whole run.
pub fn transform_records(records: &[CleanedRecord]) -> Result<MartTables> {
    let mut tables = MartTables::default();
    let mut products: HashSet<i64> = HashSet::new();
    let mut retailers: HashSet<i64> = HashSet::new();
    let mut dates: HashSet<String> = HashSet::new();
    let mut sales: HashSet<i64> = HashSet::new();

    for record in records {
        if !products.contains(&record.product_id) && !record.product_name.is_empty() {
            products.insert(record.product_id);
            tables.product_dim.push(ProductDimRecord {
                product_id: record.product_id,
                name: record.product_name.clone(),
                brand: non_empty(&record.brand),
                category: non_empty(&record.category),
            });
        }

        if !retailers.contains(&record.retailer_id) && !record.retailer_name.is_empty() {
            retailers.insert(record.retailer_id);
            tables.retailer_dim.push(RetailerDimRecord {
                retailer_id: record.retailer_id,
                name: record.retailer_name.clone(),
                channel: non_empty(&record.channel),
                location: record.location.clone(),
            });
        }

        if !dates.contains(&record.date) {
            let parts = calendar::derive_calendar_parts(&record.date)
                .with_context(|| format!("deriving calendar row for sale {}", record.sale_id))?;
            // historical truthiness gate: emit only when every derived field
            // is non-zero/non-empty (reachable for year-0 dates)
            if parts.day != 0
                && parts.month != 0
                && parts.year != 0
                && parts.quarter != 0
                && !parts.day_of_week.is_empty()
                && parts.week_of_year != 0
            {
                dates.insert(record.date.clone());
                tables.date_dim.push(DateDimRecord {
                    date: record.date.clone(),
                    day: parts.day,
                    month: parts.month,
                    year: parts.year,
                    quarter: parts.quarter,
                    day_of_week: parts.day_of_week,
                    week_of_year: parts.week_of_year,
                });
            }
        }

        if sales.insert(record.sale_id) {
            tables.sales_fact.push(SalesFactRecord {
                sale_id: record.sale_id,
                product_id: record.product_id,
                retailer_id: record.retailer_id,
                date: record.date.clone(),
                quantity: record.quantity,
                price: record.price,
            });
        }
    }

    Ok(tables)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sale_id: i64, product_id: i64, retailer_id: i64, date: &str) -> CleanedRecord {
        CleanedRecord {
            sale_id,
            product_id,
            retailer_id,
            product_name: "Widget".into(),
            brand: "Acme".into(),
            category: "Tools".into(),
            retailer_name: "MegaMart".into(),
            channel: "Online".into(),
            location: Some("Seattle".into()),
            date: date.into(),
            quantity: 2,
            price: 19.99,
        }
    }

    #[test]
    fn partitions_one_record_into_all_four_sets() -> Result<()> {
        let tables = transform_records(&[record(1, 10, 100, "2024-03-15")])?;

        assert_eq!(tables.product_dim.len(), 1);
        assert_eq!(tables.retailer_dim.len(), 1);
        assert_eq!(tables.date_dim.len(), 1);
        assert_eq!(tables.sales_fact.len(), 1);

        let date = &tables.date_dim[0];
        assert_eq!(date.quarter, 1);
        assert_eq!(date.day_of_week, "Friday");
        assert_eq!(date.week_of_year, 11);

        let fact = &tables.sales_fact[0];
        assert_eq!(fact.sale_id, 1);
        assert_eq!(fact.quantity, 2);
        assert_eq!(fact.price, 19.99);
        Ok(())
    }

    #[test]
    fn first_product_occurrence_wins() -> Result<()> {
        let mut second = record(2, 10, 100, "2024-03-15");
        second.product_name = "Widget Mk2".into();

        let tables = transform_records(&[record(1, 10, 100, "2024-03-15"), second])?;

        assert_eq!(tables.product_dim.len(), 1);
        assert_eq!(tables.product_dim[0].name, "Widget");
        assert_eq!(tables.sales_fact.len(), 2);
        Ok(())
    }

    #[test]
    fn unnamed_product_leaves_the_key_claimable() -> Result<()> {
        // first occurrence has no name, so it emits nothing and does not
        // register the key; the named second occurrence takes the slot
        let mut first = record(1, 10, 100, "2024-03-15");
        first.product_name = "".into();
        let mut second = record(2, 10, 100, "2024-03-15");
        second.product_name = "Widget Mk2".into();

        let tables = transform_records(&[first, second])?;

        assert_eq!(tables.product_dim.len(), 1);
        assert_eq!(tables.product_dim[0].name, "Widget Mk2");
        Ok(())
    }

    #[test]
    fn empty_brand_and_category_become_null() -> Result<()> {
        let mut rec = record(1, 10, 100, "2024-03-15");
        rec.brand = "".into();
        rec.category = "".into();
        rec.channel = "".into();
        rec.location = None;

        let tables = transform_records(&[rec])?;

        assert_eq!(tables.product_dim[0].brand, None);
        assert_eq!(tables.product_dim[0].category, None);
        assert_eq!(tables.retailer_dim[0].channel, None);
        assert_eq!(tables.retailer_dim[0].location, None);
        Ok(())
    }

    #[test]
    fn repeated_dates_emit_one_dimension_row() -> Result<()> {
        let tables = transform_records(&[
            record(1, 10, 100, "2024-03-15"),
            record(2, 20, 200, "2024-03-15"),
            record(3, 30, 300, "2024-03-16"),
        ])?;

        assert_eq!(tables.date_dim.len(), 2);
        assert_eq!(tables.date_dim[0].date, "2024-03-15");
        assert_eq!(tables.date_dim[1].date, "2024-03-16");
        Ok(())
    }

    #[test]
    fn duplicate_sale_ids_keep_the_first_fact() -> Result<()> {
        let mut second = record(1, 10, 100, "2024-03-15");
        second.quantity = 99;

        let tables = transform_records(&[record(1, 10, 100, "2024-03-15"), second])?;

        assert_eq!(tables.sales_fact.len(), 1);
        assert_eq!(tables.sales_fact[0].quantity, 2);
        Ok(())
    }

    #[test]
    fn malformed_date_fails_the_run() {
        let err = transform_records(&[record(1, 10, 100, "not-a-date")]).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("not-a-date"));
        assert!(chain.contains("sale 1"));
    }

    #[test]
    fn year_zero_date_is_gated_out_of_the_dimension() -> Result<()> {
        // parses under chrono, then the truthiness gate drops it; the fact
        // row still carries the date string
        let tables = transform_records(&[record(1, 10, 100, "0000-01-02")])?;

        assert!(tables.date_dim.is_empty());
        assert_eq!(tables.sales_fact.len(), 1);
        assert_eq!(tables.sales_fact[0].date, "0000-01-02");
        Ok(())
    }

    #[test]
    fn deterministic_over_repeated_runs() -> Result<()> {
        let records = vec![
            record(1, 10, 100, "2024-03-15"),
            record(2, 20, 200, "2024-06-01"),
            record(3, 10, 200, "2024-03-15"),
        ];

        let first = transform_records(&records)?;
        let second = transform_records(&records)?;
        assert_eq!(first, second);
        Ok(())
    }
}
