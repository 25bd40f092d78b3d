use std::io;
use thiserror::Error;

/// Error type for dataset reading and writing.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Format tag other than libsvm, csv or weka.
    #[error("Unsupported format `{0}`: only libsvm, csv and weka are supported")]
    UnsupportedFormat(String),

    /// Feature type keyword that maps to none of the known types.
    #[error("Invalid feature type `{keyword}` for feature `{feature}`")]
    InvalidFeatureType { feature: String, keyword: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured class label column does not exist in a data row.
    #[error("Line {line}: class label column {column} is beyond the row width {width}")]
    LabelColumnOutOfRange {
        line: usize,
        column: usize,
        width: usize,
    },

    /// A line holds an odd number of quote characters.
    #[error("Line {line}: unbalanced quote characters")]
    UnbalancedQuotes { line: usize },

    /// Input that does not follow the grammar of its format.
    #[error("Line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// A required ARFF header section never appeared.
    #[error("Missing {0} section")]
    MissingSection(&'static str),

    /// A value the target format has no way to encode.
    #[error("Cannot encode: {0}")]
    Unrepresentable(String),

    /// Failure fetching a remote dataset.
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] crate::http::HttpError),
}

impl DatasetError {
    /// Shorthand for a [`DatasetError::Malformed`] at `line`.
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        DatasetError::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the caller's configuration rather
    /// than by the input text.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            DatasetError::UnsupportedFormat(_)
                | DatasetError::InvalidFeatureType { .. }
                | DatasetError::InvalidConfig(_)
                | DatasetError::LabelColumnOutOfRange { .. }
                | DatasetError::Unrepresentable(_)
        )
    }

    /// Returns true for errors caused by input that breaks its format's grammar.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DatasetError::UnbalancedQuotes { .. }
                | DatasetError::Malformed { .. }
                | DatasetError::MissingSection(_)
                | DatasetError::Csv(_)
        )
    }
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(DatasetError::UnsupportedFormat("json".into()).is_config());
        assert!(
            DatasetError::LabelColumnOutOfRange {
                line: 3,
                column: 9,
                width: 2
            }
            .is_config()
        );
        assert!(DatasetError::UnbalancedQuotes { line: 1 }.is_malformed());
        assert!(DatasetError::MissingSection("@DATA").is_malformed());
        assert!(!DatasetError::MissingSection("@DATA").is_config());
    }

    #[test]
    fn test_error_display() {
        let err = DatasetError::malformed(7, "bad pair `x`");
        assert_eq!(err.to_string(), "Line 7: bad pair `x`");
    }
}
