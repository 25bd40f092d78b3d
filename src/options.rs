//! Format selection and per-format reader/writer configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::{DatasetError, Result};
use crate::field_type::FeatureType;

/// Supported textual encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `<label> <index>:<value> ...` lines.
    LibSvm,
    /// Comma-separated values with name and type header rows.
    Csv,
    /// WEKA Attribute-Relation File Format.
    Weka,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::LibSvm => write!(f, "libsvm"),
            Format::Csv => write!(f, "csv"),
            Format::Weka => write!(f, "weka"),
        }
    }
}

impl FromStr for Format {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "libsvm" => Ok(Format::LibSvm),
            "csv" => Ok(Format::Csv),
            "weka" | "arff" => Ok(Format::Weka),
            _ => Err(DatasetError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Quote character configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    /// No quoting.
    None,
    /// Quote with the specified character.
    Some(u8),
}

impl Default for Quote {
    fn default() -> Self {
        Quote::Some(b'"')
    }
}

impl Quote {
    /// Returns the quote character if set.
    pub fn char(&self) -> Option<u8> {
        match self {
            Quote::None => None,
            Quote::Some(c) => Some(*c),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quote::None => write!(f, "none"),
            Quote::Some(c) => write!(f, "{}", *c as char),
        }
    }
}

/// CSV reader and writer configuration.
///
/// # Example
///
/// ```
/// use featio::{CsvOptions, FeatureType};
///
/// let mut options = CsvOptions::new();
/// options
///     .class_label_column(3)
///     .feature_types([("age", FeatureType::Integer), ("city", FeatureType::String)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    /// 1-indexed line holding feature names.
    pub(crate) feature_name_row: Option<usize>,
    /// 1-indexed line holding feature types.
    pub(crate) feature_type_row: Option<usize>,
    /// Explicit feature order and types; overrides the header rows.
    pub(crate) feature_types: Vec<(String, FeatureType)>,
    /// 1-indexed column holding the class label.
    pub(crate) class_label_column: usize,
    /// Field delimiter.
    pub(crate) delimiter: u8,
    /// Quote character.
    pub(crate) quote: Quote,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvOptions {
    /// Names on line 1, types on line 2, class label in column 1.
    pub fn new() -> Self {
        Self {
            feature_name_row: Some(1),
            feature_type_row: Some(2),
            feature_types: Vec::new(),
            class_label_column: 1,
            delimiter: b',',
            quote: Quote::Some(b'"'),
        }
    }

    /// Line holding feature names, or `None` if there is none.
    pub fn feature_name_row(&mut self, row: Option<usize>) -> &mut Self {
        self.feature_name_row = row;
        self
    }

    /// Line holding feature types, or `None` if there is none.
    pub fn feature_type_row(&mut self, row: Option<usize>) -> &mut Self {
        self.feature_type_row = row;
        self
    }

    /// Supply feature names and types explicitly, in column order.
    ///
    /// The configured header rows are then skipped instead of parsed.
    pub fn feature_types<I, S>(&mut self, features: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, FeatureType)>,
        S: Into<String>,
    {
        self.feature_types = features
            .into_iter()
            .map(|(name, ty)| (name.into(), ty))
            .collect();
        self
    }

    /// Column holding the class label (1-indexed).
    pub fn class_label_column(&mut self, column: usize) -> &mut Self {
        self.class_label_column = column;
        self
    }

    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(&mut self, quote: Quote) -> &mut Self {
        self.quote = quote;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.class_label_column == 0 {
            return Err(DatasetError::InvalidConfig(
                "class label column is 1-indexed, got 0".to_string(),
            ));
        }
        if self.feature_name_row == Some(0) || self.feature_type_row == Some(0) {
            return Err(DatasetError::InvalidConfig(
                "header rows are 1-indexed, got 0".to_string(),
            ));
        }
        if self.feature_name_row.is_some() && self.feature_name_row == self.feature_type_row {
            return Err(DatasetError::InvalidConfig(
                "feature name and type rows must differ".to_string(),
            ));
        }
        if self.feature_types.is_empty() && self.feature_name_row.is_none() {
            return Err(DatasetError::InvalidConfig(
                "either a feature name row or explicit feature types are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// WEKA ARFF configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArffOptions {
    pub(crate) quote: char,
}

impl Default for ArffOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ArffOptions {
    /// Double-quote quoting.
    pub fn new() -> Self {
        Self { quote: '"' }
    }

    /// Quote character protecting delimiters inside tokens.
    pub fn quote(&mut self, quote: char) -> &mut Self {
        self.quote = quote;
        self
    }
}

/// ARFF data row encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArffMode {
    /// `{index value, ..., N class}`; zero and missing values are omitted.
    Sparse,
    /// Every feature positionally, `?` for missing, class last.
    #[default]
    Dense,
}

/// Options for [`read`](crate::read).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOptions {
    pub csv: CsvOptions,
    pub arff: ArffOptions,
}

/// Options for [`write`](crate::write).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteOptions {
    pub csv: CsvOptions,
    pub arff: ArffOptions,
    pub arff_mode: ArffMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("LibSVM".parse::<Format>().unwrap(), Format::LibSvm);
        assert_eq!("csv".parse::<Format>().unwrap(), Format::Csv);
        assert_eq!("arff".parse::<Format>().unwrap(), Format::Weka);
        let err = "json".parse::<Format>().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_csv_options_builder() {
        let mut options = CsvOptions::new();
        options
            .feature_name_row(Some(2))
            .feature_type_row(None)
            .class_label_column(4)
            .delimiter(b';')
            .quote(Quote::None);

        assert_eq!(options.feature_name_row, Some(2));
        assert_eq!(options.feature_type_row, None);
        assert_eq!(options.class_label_column, 4);
        assert_eq!(options.delimiter, b';');
        assert_eq!(options.quote.char(), None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_csv_options_validation() {
        let mut options = CsvOptions::new();
        options.class_label_column(0);
        assert!(options.validate().unwrap_err().is_config());

        let mut options = CsvOptions::new();
        options.feature_type_row(Some(1));
        assert!(options.validate().is_err());

        let mut options = CsvOptions::new();
        options.feature_name_row(None).feature_type_row(None);
        assert!(options.validate().is_err());
        options.feature_types([("f1", FeatureType::Integer)]);
        assert!(options.validate().is_ok());
    }
}
