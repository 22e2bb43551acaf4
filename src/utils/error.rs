use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    WorkbookWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Worksheet '{sheet}' not found in workbook")]
    SheetNotFound { sheet: String },

    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    #[error("Geocoding request to {url} returned HTTP {status}")]
    GeocodeStatus { status: u16, url: String },

    #[error("Unexpected geocoding response: {message}")]
    GeocodeShape { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Input,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::GeocodeStatus { .. } => ErrorCategory::Network,
            EtlError::SpreadsheetError(_)
            | EtlError::SheetNotFound { .. }
            | EtlError::InvalidRecord { .. } => ErrorCategory::Input,
            EtlError::WorkbookWriteError(_) | EtlError::IoError(_) => ErrorCategory::Output,
            EtlError::SerializationError(_) | EtlError::GeocodeShape { .. } => {
                ErrorCategory::Processing
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Processing | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and the geocoding endpoint, then rerun".to_string()
            }
            EtlError::GeocodeStatus { status, .. } if *status == 401 || *status == 403 => {
                "Check that the access token is valid (MAPBOX_ACCESS_TOKEN)".to_string()
            }
            EtlError::GeocodeStatus { .. } => {
                "The geocoding service rejected a request; rerun once it is available".to_string()
            }
            EtlError::GeocodeShape { .. } => {
                "A coordinate has no neighborhood context; check the row's latitude/longitude"
                    .to_string()
            }
            EtlError::SpreadsheetError(_) => {
                "Make sure the input file is a valid spreadsheet workbook".to_string()
            }
            EtlError::SheetNotFound { sheet } => {
                format!("Add a sheet named '{}' or pass --sheet", sheet)
            }
            EtlError::InvalidRecord { row, .. } => {
                format!("Fix the latitude/longitude cells on row {}", row)
            }
            EtlError::WorkbookWriteError(_) | EtlError::IoError(_) => {
                "Check that the input exists and the output location is writable".to_string()
            }
            EtlError::SerializationError(_) => "Inspect the service response format".to_string(),
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the command line arguments or configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Geocoding service problem: {}", self),
            ErrorCategory::Input => format!("Could not read input: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
