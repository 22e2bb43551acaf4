use crate::domain::model::CellValue;
use crate::utils::error::Result;
use rust_xlsxwriter::Workbook;

/// Name of the single sheet in every output workbook.
pub const OUTPUT_SHEET: &str = "data";

pub fn output_file_name(stem: &str) -> String {
    format!("{}.xlsx", stem)
}

/// Serializes a whole grid into an in-memory `.xlsx` workbook with one sheet.
/// Empty cells are left unwritten.
pub fn write_workbook(grid: &[Vec<CellValue>], sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (row_idx, row) in grid.iter().enumerate() {
        let row_num = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = col_idx as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::String(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row_num, col_num, *f)?;
                }
                CellValue::Int(i) => {
                    worksheet.write_number(row_num, col_num, *i as f64)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(
        "Serialized {} rows into sheet '{}' ({} bytes)",
        grid.len(),
        sheet_name,
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::xlsx_reader::read_sheet;
    use crate::domain::model::{OutputRecord, TransformResult};

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("nyc_neighborhoods"), "nyc_neighborhoods.xlsx");
        assert_eq!(output_file_name("out/firms"), "out/firms.xlsx");
    }

    #[test]
    fn test_written_workbook_reads_back() {
        let result = TransformResult {
            rows: vec![
                OutputRecord {
                    industry: CellValue::from("Tech"),
                    latitude: CellValue::Float(40.7128),
                    longitude: CellValue::Float(-74.0060),
                    neighborhood: "Chelsea".to_string(),
                },
                OutputRecord {
                    industry: CellValue::Float(5411.0),
                    latitude: CellValue::Float(40.7549),
                    longitude: CellValue::Float(-73.9840),
                    neighborhood: "Midtown".to_string(),
                },
            ],
        };
        let grid = result.grid();

        let bytes = write_workbook(&grid, OUTPUT_SHEET).unwrap();
        let records = read_sheet(bytes, OUTPUT_SHEET, 4).unwrap();

        let read_back: Vec<Vec<CellValue>> = records.into_iter().map(|r| r.cells).collect();
        assert_eq!(read_back, grid);
    }

    #[test]
    fn test_header_only_grid() {
        let grid = TransformResult::default().grid();

        let bytes = write_workbook(&grid, OUTPUT_SHEET).unwrap();
        let records = read_sheet(bytes, OUTPUT_SHEET, 4).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cell(3), &CellValue::from("Neighborhood"));
    }
}
