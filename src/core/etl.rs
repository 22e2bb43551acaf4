use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Extract, transform and load in order. Returns the output path.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting ETL process");
        self.monitor.log_stats("start");

        tracing::info!("📥 Extracting rows...");
        let raw_data = self.pipeline.extract().await?;
        tracing::info!(rows = raw_data.len(), "Extracted {} rows (header included)", raw_data.len());
        self.monitor.log_stats("extract");

        tracing::info!("🗺️ Resolving neighborhoods...");
        let transformed_result = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            rows = transformed_result.rows.len(),
            "Resolved {} rows",
            transformed_result.rows.len()
        );
        self.monitor.log_stats("transform");

        tracing::info!("💾 Writing workbook...");
        let output_path = self.pipeline.load(transformed_result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
