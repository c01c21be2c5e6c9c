use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::RowOrigin;

/// Failures of the daily resampling transform.
///
/// There is no partial-success mode: any of these aborts the whole call
/// before an output table is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResampleError {
    /// A required column is not part of the input schema.
    #[error("invalid field `{field}`: not one of the input columns [{}]", available.join(", "))]
    InvalidField { field: String, available: Vec<String> },

    /// A field was asked of a resampled table that does not carry it.
    #[error("`{field}` is not a resampled field (have: [{}])", available.join(", "))]
    UnknownField { field: String, available: Vec<String> },

    /// No rows, so there is no date range to build.
    #[error("empty input: no rows to establish a date range")]
    EmptyInput,

    #[error("{origin}: malformed date '{value}'")]
    MalformedDate { origin: RowOrigin, value: String },

    #[error("{origin}: malformed value '{value}' in column `{field}`")]
    MalformedValue {
        origin: RowOrigin,
        field: String,
        value: String,
    },

    #[error("{origin}: missing group label")]
    MissingGroup { origin: RowOrigin },

    /// Two rows disagree on the same (date, group, field) cell.
    #[error("conflicting values for `{field}` of group '{group}' on {date}: {first} vs {second}")]
    ConflictingObservation {
        date: NaiveDate,
        group: String,
        field: String,
        first: f64,
        second: f64,
    },
}

impl ResampleError {
    pub(crate) fn invalid_field(field: &str, available: &[String]) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            available: available.to_vec(),
        }
    }
}

/// Application-level error carrying the process exit code.
///
/// Exit codes:
/// - 2: schema, I/O, or usage problems
/// - 3: input data that cannot be resampled
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ResampleError> for AppError {
    fn from(err: ResampleError) -> Self {
        let exit_code = match err {
            ResampleError::InvalidField { .. } | ResampleError::UnknownField { .. } => 2,
            _ => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_errors_map_to_exit_code_2() {
        let err = ResampleError::invalid_field("date", &["day".to_string(), "canton".to_string()]);
        assert_eq!(err.to_string(), "invalid field `date`: not one of the input columns [day, canton]");
        assert_eq!(AppError::from(err).exit_code(), 2);

        let err = ResampleError::UnknownField {
            field: "ncumul_ICU".to_string(),
            available: vec!["ncumul_conf".to_string()],
        };
        assert_eq!(AppError::from(err).exit_code(), 2);
    }

    #[test]
    fn data_errors_map_to_exit_code_3() {
        assert_eq!(AppError::from(ResampleError::EmptyInput).exit_code(), 3);
        let err = ResampleError::MissingGroup {
            origin: RowOrigin::line(4),
        };
        assert_eq!(AppError::from(err).exit_code(), 3);
    }
}
