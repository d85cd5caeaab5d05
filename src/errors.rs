use crate::models::DatasetKind;
use axum::http::StatusCode;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("country '{country}' not found in {kind} data")]
    CountryNotFound { country: String, kind: DatasetKind },
    #[error("date {0} is outside the available range")]
    DateNotFound(NaiveDate),
    #[error("{country} has too few report dates ({dates}) for this series")]
    SeriesTooShort { country: String, dates: usize },
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("header has no date columns")]
    MissingDates,
    #[error("invalid date column '{0}'")]
    InvalidDateColumn(String),
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{kind} data is unusable: {source}")]
    Parse {
        kind: DatasetKind,
        #[source]
        source: DataError,
    },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::CountryNotFound { .. } => Self::not_found(err.to_string()),
            DataError::DateNotFound(_)
            | DataError::InvalidRange { .. }
            | DataError::SeriesTooShort { .. } => {
                Self::bad_request(err.to_string())
            }
            _ => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
