use crate::adapters::mapbox::{DEFAULT_DATASET, DEFAULT_ENDPOINT};
use crate::adapters::xlsx_reader::{column_count_from_letters, DEFAULT_MAX_COLUMN};
use crate::core::{ConfigProvider, GeocoderSettings};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub sheet: Option<String>,
    pub max_column: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub endpoint: Option<String>,
    pub dataset: Option<String>,
    pub access_token: String,
    pub timeout_seconds: Option<u64>,
    pub types: Option<Vec<String>>,
    pub language: Option<String>,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("endpoint", &self.endpoint)
            .field("dataset", &self.dataset)
            .field("access_token", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("types", &self.types)
            .field("language", &self.language)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    pub progress_interval: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_stem: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAPBOX_ACCESS_TOKEN})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    fn max_column(&self) -> &str {
        self.source.max_column.as_deref().unwrap_or(DEFAULT_MAX_COLUMN)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_non_empty_string("source.sheet", self.sheet_name())?;
        validation::validate_column_letters("source.max_column", self.max_column())?;
        validation::validate_url(
            "geocoder.endpoint",
            self.geocoder.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
        )?;
        validation::validate_secret("geocoder.access_token", &self.geocoder.access_token)?;
        validation::validate_positive_number(
            "transform.progress_interval",
            self.progress_interval(),
            1,
        )?;
        validation::validate_path("load.output_stem", &self.load.output_stem)?;

        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_ref()) {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format.as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.clone(),
                    reason: format!("Valid formats: {}", valid_formats.join(", ")),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn output_stem(&self) -> &str {
        &self.load.output_stem
    }

    fn sheet_name(&self) -> &str {
        self.source.sheet.as_deref().unwrap_or("Sheet1")
    }

    fn max_columns(&self) -> usize {
        column_count_from_letters(self.max_column()).unwrap_or(0)
    }

    fn progress_interval(&self) -> usize {
        self.transform.progress_interval.unwrap_or(43)
    }

    fn geocoder_settings(&self) -> GeocoderSettings {
        GeocoderSettings {
            endpoint: self
                .geocoder
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            dataset: self
                .geocoder
                .dataset
                .clone()
                .unwrap_or_else(|| DEFAULT_DATASET.to_string()),
            access_token: self.geocoder.access_token.clone(),
            timeout_seconds: self.geocoder.timeout_seconds,
            types: self.geocoder.types.clone().unwrap_or_default(),
            language: self.geocoder.language.clone(),
        }
    }
}
