// src/ingest.rs

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};
use tracing::info;

/// One input row, keyed by header name. Values are raw, untrimmed strings.
pub type RawRecord = BTreeMap<String, String>;

/// Read a headered sales CSV into one RawRecord per data row, in file order.
///
/// Field counts are flexible: values are zipped with the header positionally,
/// so a short row simply lacks its trailing keys and surplus values are
/// dropped. Anything structurally worse (unreadable file, broken quoting) is
/// fatal for the run.
pub fn read_sales_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        rows.push(row);
    }

    info!(rows = rows.len(), file = %path.display(), "read sales csv");
    Ok(rows)
}
