use crate::domain::model::{Record, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Connection settings for the reverse-geocoding service.
#[derive(Clone, PartialEq)]
pub struct GeocoderSettings {
    pub endpoint: String,
    pub dataset: String,
    pub access_token: String,
    pub timeout_seconds: Option<u64>,
    pub types: Vec<String>,
    pub language: Option<String>,
}

impl fmt::Debug for GeocoderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocoderSettings")
            .field("endpoint", &self.endpoint)
            .field("dataset", &self.dataset)
            .field("access_token", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("types", &self.types)
            .field("language", &self.language)
            .finish()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_stem(&self) -> &str;
    fn sheet_name(&self) -> &str;
    /// Number of columns scanned per row, counted from column A.
    fn max_columns(&self) -> usize;
    fn progress_interval(&self) -> usize;
    fn geocoder_settings(&self) -> GeocoderSettings;
}

/// Turns a coordinate into a neighborhood name.
#[async_trait]
pub trait NeighborhoodResolver: Send + Sync {
    async fn resolve(&self, longitude: f64, latitude: f64) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
