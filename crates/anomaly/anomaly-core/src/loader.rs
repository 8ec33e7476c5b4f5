//! Delimited-text loading into numeric tables.
//!
//! The first record is the header. A column is kept when every non-missing
//! cell parses as a number; rows with a missing cell in any kept column are
//! dropped. Row order is preserved. Missing cells use the pandas default NA
//! spellings, and any cell that parses to NaN counts as missing too.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anomaly_spi::{AnomalyError, NumericTable, Result};
use tracing::debug;

/// Cell spellings treated as missing values.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Load a numeric table from a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<NumericTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        AnomalyError::data_format(format!("failed to open {}: {}", path.display(), e))
    })?;
    from_csv_reader(BufReader::new(file))
}

/// Parse a numeric table from CSV text.
pub fn parse_csv(text: &str) -> Result<NumericTable> {
    from_csv_reader(text.as_bytes())
}

/// Parse a numeric table from any CSV byte stream.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<NumericTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnomalyError::data_format(format!("failed to read header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AnomalyError::data_format("input has no header row"));
    }

    let width = headers.len();
    let mut numeric = vec![true; width];
    let mut cells: Vec<Vec<Option<f64>>> = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| AnomalyError::data_format(format!("failed to read record: {}", e)))?;
        if record.len() > width {
            return Err(AnomalyError::data_format(format!(
                "record {} has {} fields, header has {}",
                line + 1,
                record.len(),
                width
            )));
        }

        let row = (0..width)
            .map(|col| {
                let cell = record.get(col).unwrap_or("");
                if is_missing(cell) {
                    return None;
                }
                match cell.parse::<f64>() {
                    Ok(v) if v.is_nan() => None,
                    Ok(v) => Some(v),
                    Err(_) => {
                        numeric[col] = false;
                        None
                    }
                }
            })
            .collect();
        cells.push(row);
    }

    let kept: Vec<usize> = (0..width).filter(|&col| numeric[col]).collect();
    if kept.is_empty() {
        return Err(AnomalyError::data_format("table has no numeric columns"));
    }

    let columns = kept.iter().map(|&col| headers[col].clone()).collect();
    let total = cells.len();
    let rows: Vec<Vec<f64>> = cells
        .into_iter()
        .filter_map(|row| kept.iter().map(|&col| row[col]).collect::<Option<Vec<f64>>>())
        .collect();

    debug!(
        columns = kept.len(),
        dropped_columns = width - kept.len(),
        rows = rows.len(),
        dropped_rows = total - rows.len(),
        "parsed numeric table"
    );

    NumericTable::new(columns, rows)
}
