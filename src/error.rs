use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an [`AqiError`], for callers that only need to branch
/// on what went wrong rather than inspect the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed a malformed argument (e.g. a negative station id).
    InvalidArgument,
    /// The transport failed, or the provider reported a failure.
    FetchFailure,
    /// The provider answered, but the payload did not have the expected shape.
    UnexpectedFormat,
    /// A lookup by station name found no match.
    StationNotFound,
    /// A lookup by coordinate found no station with usable coordinates.
    NoStationResolved,
    /// The dataset was empty, so there was nothing to return.
    NoDataAvailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::FetchFailure => "fetch failure",
            ErrorKind::UnexpectedFormat => "unexpected format",
            ErrorKind::StationNotFound => "station not found",
            ErrorKind::NoStationResolved => "no station resolved",
            ErrorKind::NoDataAvailable => "no data available",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AqiError {
    #[error("Invalid station id {0}: must be a finite number >= 0")]
    InvalidStationId(f64),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response body from {0} is not valid JSON")]
    ResponseBody(String, #[source] reqwest::Error),

    #[error("Failed to fetch AQI data: provider reported status '{status}': {message}")]
    ApiStatus { status: String, message: String },

    #[error("Failed to load station catalog '{0}'")]
    CatalogRead(PathBuf, #[source] std::io::Error),

    #[error("Unexpected data format from {source_name}: {message}")]
    UnexpectedFormat {
        source_name: &'static str,
        message: String,
    },

    #[error("Station '{0}' not found")]
    StationNotFound(String),

    #[error("No station with valid coordinates near {lat}, {lon}")]
    NoStationResolved { lat: f64, lon: f64 },

    #[error("No AQI data available")]
    NoDataAvailable,
}

impl AqiError {
    /// Returns the [`ErrorKind`] this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AqiError::InvalidStationId(_) => ErrorKind::InvalidArgument,
            AqiError::NetworkRequest(..)
            | AqiError::HttpStatus { .. }
            | AqiError::ResponseBody(..)
            | AqiError::ApiStatus { .. }
            | AqiError::CatalogRead(..) => ErrorKind::FetchFailure,
            AqiError::UnexpectedFormat { .. } => ErrorKind::UnexpectedFormat,
            AqiError::StationNotFound(_) => ErrorKind::StationNotFound,
            AqiError::NoStationResolved { .. } => ErrorKind::NoStationResolved,
            AqiError::NoDataAvailable => ErrorKind::NoDataAvailable,
        }
    }

    pub(crate) fn unexpected_format(source_name: &'static str, message: impl Into<String>) -> Self {
        AqiError::UnexpectedFormat {
            source_name,
            message: message.into(),
        }
    }
}
