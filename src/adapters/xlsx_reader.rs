//! Spreadsheet extraction.
//!
//! Rows are always anchored at cell A1 and cut off at a fixed column bound,
//! whatever the sheet's actual used range is. Columns past the bound are
//! dropped without notice.

use crate::domain::model::{CellValue, Record};
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// Default column bound (`A:EK`).
pub const DEFAULT_MAX_COLUMN: &str = "EK";

/// Converts spreadsheet column letters into a 1-based column count
/// (`"A"` → 1, `"Z"` → 26, `"EK"` → 141).
pub fn column_count_from_letters(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    letters.chars().try_fold(0usize, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Reads `sheet_name` from workbook bytes as rows `1..=max_row`, each
/// `max_columns` cells wide.
pub fn read_sheet(bytes: Vec<u8>, sheet_name: &str, max_columns: usize) -> Result<Vec<Record>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(EtlError::SheetNotFound {
            sheet: sheet_name.to_string(),
        });
    }

    let range = workbook.worksheet_range(sheet_name)?;

    let Some((last_row, last_col)) = range.end() else {
        tracing::debug!("Sheet '{}' is empty", sheet_name);
        return Ok(Vec::new());
    };

    if last_col as usize >= max_columns {
        tracing::debug!(
            "Sheet '{}' uses {} columns, only the first {} are read",
            sheet_name,
            last_col + 1,
            max_columns
        );
    }

    let records = (0..=last_row)
        .map(|row| {
            let cells = (0..max_columns)
                .map(|col| {
                    range
                        .get_value((row, col as u32))
                        .map(cell_from_data)
                        .unwrap_or_default()
                })
                .collect();
            Record::new(cells)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Read {} rows x {} columns from sheet '{}'",
        records.len(),
        max_columns,
        sheet_name
    );

    Ok(records)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::String(other.to_string()),
    }
}
