// src/validate.rs

use tracing::warn;

use crate::clean::CleanedRecord;

/// Second look at the identifier invariant after cleaning: ProductID, SaleID
/// and RetailerID (fixed, unlike the cleaner's configurable gate) must have
/// survived coercion non-negative. A zero identifier passes. Violating
/// records are logged and dropped, never repaired; values are not touched.
///
/// Cleaning cannot currently produce a violation, so this stage normally
/// passes everything through; it is deliberate redundancy in front of the
/// transformer, kept in its own pass.
pub fn validate_records(records: Vec<CleanedRecord>) -> Vec<CleanedRecord> {
    records
        .into_iter()
        .filter(|record| {
            for (field, value) in record.identifiers() {
                if value < 0 {
                    warn!(record = ?record, field, "record excluded: identifier lost in cleaning");
                    return false;
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sale_id: i64, product_id: i64, retailer_id: i64) -> CleanedRecord {
        CleanedRecord {
            sale_id,
            product_id,
            retailer_id,
            product_name: "Widget".into(),
            brand: "Acme".into(),
            category: "Tools".into(),
            retailer_name: "MegaMart".into(),
            channel: "Online".into(),
            location: None,
            date: "2024-03-15".into(),
            quantity: 1,
            price: 9.99,
        }
    }

    #[test]
    fn passes_intact_records_through_unchanged() {
        let input = vec![record(1, 10, 100), record(2, 20, 200)];
        let output = validate_records(input.clone());
        assert_eq!(output, input);
    }

    #[test]
    fn zero_identifiers_pass() {
        let output = validate_records(vec![record(0, 0, 0)]);
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn negative_identifiers_are_dropped() {
        // unreachable through the cleaner, but the gate must still hold
        let output = validate_records(vec![record(-1, 10, 100), record(2, 20, 200)]);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].sale_id, 2);
    }
}
