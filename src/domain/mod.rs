// Domain layer: records, geocoding response shapes and the ports the pipeline talks through.

pub mod model;
pub mod ports;
