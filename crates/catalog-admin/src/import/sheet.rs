//! Spreadsheet reading: `.xlsx`/`.xls` through calamine, `.csv` through csv.

use super::ImportError;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One spreadsheet row. Empty cells read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub variant_name: Option<String>,
    pub variant_image_url: Option<String>,
}

impl RawRow {
    /// Build a row from header → cell text.
    pub fn from_record(mut record: HashMap<String, String>) -> Self {
        let mut take = |column: &str| record.remove(column).filter(|v| !v.is_empty());
        Self {
            product_id: take("product_id"),
            name: take("name"),
            category: take("category"),
            image_url: take("image_url"),
            price: take("price"),
            variant_name: take("variant_name"),
            variant_image_url: take("variant_image_url"),
        }
    }
}

/// Header text to column key: `Variant Name` → `variant_name`.
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn rows_from_cells<I, R>(headers: &[String], data: I) -> Vec<RawRow>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut records = Vec::new();
    for cells in data {
        let mut record = HashMap::new();
        for (col_idx, value) in cells.into_iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                record.insert(header.clone(), value.trim().to_string());
            }
        }
        if record.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(RawRow::from_record(record));
    }
    records
}

/// Read CSV with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let mut data = Vec::new();
    for result in reader.records() {
        let record = result?;
        data.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    non_empty(rows_from_cells(&headers, data))
}

fn read_workbook(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoData)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(ImportError::NoData);
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| normalize_header(&cell.to_string()))
        .collect();
    let data = rows.map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
    debug!(sheet = %sheet_name, "reading worksheet");
    non_empty(rows_from_cells(&headers, data))
}

fn non_empty(rows: Vec<RawRow>) -> Result<Vec<RawRow>, ImportError> {
    if rows.is_empty() {
        Err(ImportError::NoData)
    } else {
        Ok(rows)
    }
}

/// Read the first worksheet of a workbook, or a CSV file, by extension.
pub fn read_sheet(path: impl AsRef<Path>) -> Result<Vec<RawRow>, ImportError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?),
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}
