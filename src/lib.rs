pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::mapbox::MapboxGeocoder;
pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{etl::EtlEngine, pipeline::NeighborhoodPipeline};
pub use utils::error::{EtlError, Result};
