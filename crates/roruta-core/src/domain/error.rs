//! Error taxonomy for ROR-UTA sessions.

use std::path::PathBuf;

use super::NumberType;

/// Errors produced by the validation pass that runs before any XMCDA
/// document is written.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("name contains a comma and cannot be stored in the CSV table: {0}")]
    CommaInName(String),

    #[error("performance table has no value for alternative {alternative:?} on criterion {criterion:?}")]
    MissingPerformance {
        alternative: String,
        criterion: String,
    },

    #[error("expected {expected} criterion directions, got {found}")]
    DirectionCountMismatch { expected: usize, found: usize },

    #[error("{context} references unknown alternative {id} (session has {count} alternatives)")]
    UnknownAlternative {
        context: String,
        id: String,
        count: usize,
    },

    #[error("{context} has an empty alternatives set")]
    EmptyAlternativeSet { context: String },
}

/// ROR-UTA domain errors.
#[derive(Debug, thiserror::Error)]
pub enum RorutaError {
    #[error("malformed row {line} in {path:?}: expected {expected} columns, found {found}")]
    MalformedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("performance table {0:?} has no header row")]
    MissingHeader(PathBuf),

    #[error("value {value:?} for criterion {criterion:?} is not a valid {expected}")]
    InvalidValue {
        criterion: String,
        value: String,
        expected: NumberType,
    },

    #[error("line {line} of {path:?} does not match `a<i> > a<j>`: {content:?}")]
    UnmatchedPreferenceLine {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("size = {size} breaks the assumption 0 <= size <= #different pairs ({max})")]
    SampleSizeOutOfBounds { size: usize, max: usize },

    #[error("invalid linear order: {0}")]
    InvalidOrder(String),

    #[error("no utility sample for value {value} of alternative {alternative:?} on criterion {criterion}")]
    MissingUtilitySample {
        alternative: String,
        criterion: String,
        value: String,
    },

    #[error("representative function has no marginal for criterion {0}")]
    MissingCriterionFunction(String),

    #[error("pair in {path:?} has no enclosing comparisonType")]
    MissingComparisonType { path: PathBuf },

    #[error("unknown comparison type {0:?}")]
    UnknownComparisonType(String),

    #[error("ordinate {value:?} of criterion {criterion} is not a number")]
    InvalidOrdinate { criterion: String, value: String },

    #[error("no run directories found in {0:?}")]
    NoRuns(PathBuf),

    #[error("plot grid {rows}x{cols} cannot hold {criteria} criteria")]
    GridTooSmall {
        rows: usize,
        cols: usize,
        criteria: usize,
    },

    #[error("xml error in {path:?}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ROR-UTA operations.
pub type Result<T> = std::result::Result<T, RorutaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_size_error_names_bounds() {
        let err = RorutaError::SampleSizeOutOfBounds { size: 7, max: 3 };
        let msg = err.to_string();
        assert!(msg.contains("size = 7"));
        assert!(msg.contains("(3)"));
    }

    #[test]
    fn test_malformed_row_display() {
        let err = RorutaError::MalformedRow {
            path: PathBuf::from("performances.csv"),
            line: 4,
            expected: 9,
            found: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("row 4"));
        assert!(msg.contains("expected 9"));
    }

    #[test]
    fn test_validation_error_wraps() {
        let err: RorutaError = ValidationError::DirectionCountMismatch {
            expected: 8,
            found: 7,
        }
        .into();
        assert!(err.to_string().contains("validation error"));
        assert!(err.to_string().contains("expected 8"));
    }
}
