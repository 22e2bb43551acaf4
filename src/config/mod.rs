pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::adapters::mapbox::{DEFAULT_DATASET, DEFAULT_ENDPOINT};
    use crate::adapters::xlsx_reader::{column_count_from_letters, DEFAULT_MAX_COLUMN};
    use crate::core::{ConfigProvider, GeocoderSettings};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;

    #[derive(Clone, Parser)]
    #[command(name = "neighborhood-etl")]
    #[command(about = "Adds reverse-geocoded neighborhood names to a spreadsheet of firms")]
    pub struct CliConfig {
        /// Input workbook (xlsx, xls, xlsb or ods)
        pub input: String,

        /// Output file name without extension; `.xlsx` is appended
        pub output_stem: String,

        /// Geocoding access token
        #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
        pub access_token: String,

        #[arg(long, default_value = "Sheet1")]
        pub sheet: String,

        /// Last column scanned on each row (spreadsheet letters)
        #[arg(long, default_value = DEFAULT_MAX_COLUMN)]
        pub max_column: String,

        /// Log a progress event every N rows
        #[arg(long, default_value = "43")]
        pub progress_interval: usize,

        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        pub endpoint: String,

        #[arg(long, default_value = DEFAULT_DATASET)]
        pub dataset: String,

        /// Restrict results to these feature types, e.g. neighborhood,locality
        #[arg(long, value_delimiter = ',')]
        pub types: Vec<String>,

        #[arg(long)]
        pub language: Option<String>,

        /// Per-request timeout; no timeout when unset
        #[arg(long)]
        pub timeout_seconds: Option<u64>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log process CPU/memory after each phase")]
        pub monitor: bool,
    }

    impl std::fmt::Debug for CliConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CliConfig")
                .field("input", &self.input)
                .field("output_stem", &self.output_stem)
                .field("sheet", &self.sheet)
                .field("max_column", &self.max_column)
                .field("progress_interval", &self.progress_interval)
                .field("geocoder", &self.geocoder_settings())
                .field("verbose", &self.verbose)
                .field("monitor", &self.monitor)
                .finish()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("input", &self.input)?;
            validation::validate_path("output_stem", &self.output_stem)?;
            validation::validate_non_empty_string("sheet", &self.sheet)?;
            validation::validate_column_letters("max_column", &self.max_column)?;
            validation::validate_positive_number("progress_interval", self.progress_interval, 1)?;
            validation::validate_url("endpoint", &self.endpoint)?;
            validation::validate_non_empty_string("dataset", &self.dataset)?;
            validation::validate_secret("access_token", &self.access_token)?;
            Ok(())
        }
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_stem(&self) -> &str {
            &self.output_stem
        }

        fn sheet_name(&self) -> &str {
            &self.sheet
        }

        fn max_columns(&self) -> usize {
            column_count_from_letters(&self.max_column).unwrap_or(0)
        }

        fn progress_interval(&self) -> usize {
            self.progress_interval
        }

        fn geocoder_settings(&self) -> GeocoderSettings {
            GeocoderSettings {
                endpoint: self.endpoint.clone(),
                dataset: self.dataset.clone(),
                access_token: self.access_token.clone(),
                timeout_seconds: self.timeout_seconds,
                types: self.types.clone(),
                language: self.language.clone(),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(extra: &[&str]) -> CliConfig {
            let mut args = vec!["neighborhood-etl", "firms.xlsx", "firms_out"];
            args.extend_from_slice(extra);
            CliConfig::try_parse_from(args).unwrap()
        }

        #[test]
        fn test_defaults() {
            let config = parse(&["--access-token", "pk.abc"]);

            assert_eq!(config.input_path(), "firms.xlsx");
            assert_eq!(config.output_stem(), "firms_out");
            assert_eq!(config.sheet_name(), "Sheet1");
            assert_eq!(config.max_columns(), 141);
            assert_eq!(config.progress_interval(), 43);
            assert_eq!(config.geocoder_settings().endpoint, "https://api.mapbox.com");
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_overrides() {
            let config = parse(&[
                "--access-token",
                "pk.abc",
                "--max-column",
                "C",
                "--progress-interval",
                "10",
                "--types",
                "neighborhood,locality",
            ]);

            assert_eq!(config.max_columns(), 3);
            assert_eq!(config.progress_interval(), 10);
            assert_eq!(
                config.geocoder_settings().types,
                vec!["neighborhood".to_string(), "locality".to_string()]
            );
        }

        #[test]
        fn test_validation_rejects_bad_values() {
            let config = parse(&["--access-token", "pk.abc", "--progress-interval", "0"]);
            assert!(config.validate().is_err());

            let config = parse(&["--access-token", "pk.abc", "--max-column", "12"]);
            assert!(config.validate().is_err());

            let config = parse(&["--access-token", " "]);
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_debug_hides_token() {
            let config = parse(&["--access-token", "pk.secret"]);
            assert!(!format!("{:?}", config).contains("pk.secret"));
        }
    }
}
