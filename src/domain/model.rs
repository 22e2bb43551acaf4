use serde::Deserialize;
use std::fmt;

/// Header row written ahead of every output table.
pub const OUTPUT_HEADER: [&str; 4] = ["Industry", "Latitude", "Longitude", "Neighborhood"];

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl CellValue {
    /// Numeric view of the cell. Strings are parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse().ok(),
            CellValue::Empty | CellValue::Bool(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

/// One input row: industry in column A, latitude in B, longitude in C.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cells: Vec<CellValue>,
}

impl Record {
    pub const INDUSTRY_COLUMN: usize = 0;
    pub const LATITUDE_COLUMN: usize = 1;
    pub const LONGITUDE_COLUMN: usize = 2;

    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, column: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn industry(&self) -> &CellValue {
        self.cell(Self::INDUSTRY_COLUMN)
    }

    pub fn latitude(&self) -> &CellValue {
        self.cell(Self::LATITUDE_COLUMN)
    }

    pub fn longitude(&self) -> &CellValue {
        self.cell(Self::LONGITUDE_COLUMN)
    }
}

/// Industry, latitude and longitude are the input cells as read, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub industry: CellValue,
    pub latitude: CellValue,
    pub longitude: CellValue,
    pub neighborhood: String,
}

impl OutputRecord {
    pub fn to_cells(&self) -> Vec<CellValue> {
        vec![
            self.industry.clone(),
            self.latitude.clone(),
            self.longitude.clone(),
            CellValue::String(self.neighborhood.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub rows: Vec<OutputRecord>,
}

impl TransformResult {
    /// Header row followed by one row per output record, in input order.
    pub fn grid(&self) -> Vec<Vec<CellValue>> {
        let header = OUTPUT_HEADER.iter().map(|h| CellValue::from(*h)).collect();
        std::iter::once(header)
            .chain(self.rows.iter().map(OutputRecord::to_cells))
            .collect()
    }
}

/// Reverse-geocoding response body (GeoJSON feature collection).
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub context: Vec<ContextEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextEntry {
    pub text: String,
}

impl FeatureCollection {
    /// `features[0].context[0].text`
    pub fn neighborhood(&self) -> Option<&str> {
        self.features
            .first()?
            .context
            .first()
            .map(|entry| entry.text.as_str())
    }
}
