use crate::adapters::xlsx_reader::read_sheet;
use crate::adapters::xlsx_writer::{output_file_name, write_workbook, OUTPUT_SHEET};
use crate::core::progress::ProgressReporter;
use crate::core::{
    ConfigProvider, NeighborhoodResolver, OutputRecord, Pipeline, Record, Storage,
    TransformResult,
};
use crate::utils::error::{EtlError, Result};

/// Spreadsheet → reverse geocoding → spreadsheet.
///
/// Rows are resolved strictly one after another with a single resolver. The
/// first failing row aborts the run, and since the output is only written in
/// `load`, a failed run leaves no output file behind.
pub struct NeighborhoodPipeline<S: Storage, R: NeighborhoodResolver, C: ConfigProvider> {
    storage: S,
    resolver: R,
    config: C,
}

impl<S: Storage, R: NeighborhoodResolver, C: ConfigProvider> NeighborhoodPipeline<S, R, C> {
    pub fn new(storage: S, resolver: R, config: C) -> Self {
        Self {
            storage,
            resolver,
            config,
        }
    }
}

fn coordinate(record: &Record, column: usize, row: usize, name: &str) -> Result<f64> {
    record
        .cell(column)
        .as_f64()
        .ok_or_else(|| EtlError::InvalidRecord {
            row,
            message: format!("{} '{}' is not a number", name, record.cell(column)),
        })
}

#[async_trait::async_trait]
impl<S: Storage, R: NeighborhoodResolver, C: ConfigProvider> Pipeline
    for NeighborhoodPipeline<S, R, C>
{
    async fn extract(&self) -> Result<Vec<Record>> {
        let path = self.config.input_path();
        tracing::debug!("Loading workbook from: {}", path);
        let bytes = self.storage.read_file(path).await?;

        read_sheet(
            bytes,
            self.config.sheet_name(),
            self.config.max_columns(),
        )
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        // 第一列為標題列
        let total = data.len().saturating_sub(1);
        let mut progress = ProgressReporter::new(self.config.progress_interval(), total);
        let mut rows = Vec::with_capacity(total);

        for (idx, record) in data.iter().enumerate().skip(1) {
            // 1-based sheet row, for error messages
            let sheet_row = idx + 1;

            // 查詢前先計數
            progress.tick();

            let latitude = coordinate(record, Record::LATITUDE_COLUMN, sheet_row, "latitude")?;
            let longitude = coordinate(record, Record::LONGITUDE_COLUMN, sheet_row, "longitude")?;

            // 服務要求經度在前
            let neighborhood = self.resolver.resolve(longitude, latitude).await?;
            tracing::debug!(
                "Row {}: ({}, {}) -> {}",
                sheet_row,
                latitude,
                longitude,
                neighborhood
            );

            rows.push(OutputRecord {
                industry: record.industry().clone(),
                latitude: record.latitude().clone(),
                longitude: record.longitude().clone(),
                neighborhood,
            });
        }

        Ok(TransformResult { rows })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = output_file_name(self.config.output_stem());

        let bytes = write_workbook(&result.grid(), OUTPUT_SHEET)?;

        tracing::debug!("Writing workbook ({} bytes) to storage", bytes.len());
        self.storage.write_file(&output_path, &bytes).await?;

        Ok(output_path)
    }
}
