// Adapters layer: concrete implementations for external systems (spreadsheets, geocoding http).

pub mod mapbox;
pub mod xlsx_reader;
pub mod xlsx_writer;
