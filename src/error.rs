use std::fmt;

/// Which half of a coordinate pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Inclusive bounds, in degrees.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Axis::Latitude => (-90.0, 90.0),
            Axis::Longitude => (-180.0, 180.0),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// Rejection of a coordinate, either because it is not a number at all or
/// because it falls outside its axis domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("Invalid {axis}: {raw:?} is not a number")]
    Parse { axis: Axis, raw: String },
    #[error("Invalid {axis}. Must be between {min} and {max}.", min = .axis.bounds().0, max = .axis.bounds().1)]
    Range { axis: Axis, value: f64 },
}

impl CoordinateError {
    pub fn axis(&self) -> Axis {
        match self {
            CoordinateError::Parse { axis, .. } | CoordinateError::Range { axis, .. } => *axis,
        }
    }
}

/// Errors raised while registering shops or loading them from a CSV file.
#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    #[error("shop name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    #[error("expected columns name,latitude,longitude")]
    MissingColumns,
    #[error("reading shop file: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    AtLine {
        line: u64,
        #[source]
        source: Box<ShopError>,
    },
}

impl ShopError {
    pub(crate) fn at_line(self, line: u64) -> Self {
        ShopError::AtLine { line, source: Box::new(self) }
    }
}

/// Errors raised while writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("writing csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
