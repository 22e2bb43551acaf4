pub mod etl;
pub mod pipeline;
pub mod progress;

pub use crate::domain::model::{CellValue, OutputRecord, Record, TransformResult};
pub use crate::domain::ports::{
    ConfigProvider, GeocoderSettings, NeighborhoodResolver, Pipeline, Storage,
};
pub use crate::utils::error::Result;
