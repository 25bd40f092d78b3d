use std::fmt;
use std::str::FromStr;

use crate::error::DatasetError;
use crate::value::FeatureValue;

/// Declared type of a feature, applied uniformly to every value under that
/// feature name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeatureType {
    /// Whole number.
    Integer,
    /// Floating point number.
    Real,
    /// Categorical value drawn from a finite set.
    Nominal,
    /// Free text (fallback type).
    #[default]
    String,
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for FeatureType {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| DatasetError::InvalidFeatureType {
            feature: String::new(),
            keyword: s.to_string(),
        })
    }
}

impl FeatureType {
    /// Canonical lower-case keyword written by the CSV and ARFF writers.
    pub const fn keyword(&self) -> &'static str {
        match self {
            FeatureType::Integer => "integer",
            FeatureType::Real => "real",
            FeatureType::Nominal => "nominal",
            FeatureType::String => "string",
        }
    }

    /// Resolve a type keyword, case-insensitively.
    ///
    /// `numeric` and `continuous` collapse to [`FeatureType::Real`],
    /// `categorical` to [`FeatureType::Nominal`].
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "integer" => Some(FeatureType::Integer),
            "real" | "numeric" | "continuous" => Some(FeatureType::Real),
            "nominal" | "categorical" => Some(FeatureType::Nominal),
            "string" => Some(FeatureType::String),
            _ => None,
        }
    }

    /// Returns true if values of this type are numbers.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, FeatureType::Integer | FeatureType::Real)
    }

    /// Parse a raw cell into a value of this type.
    ///
    /// Returns `None` when the text is not a valid number for a numeric type.
    pub fn parse_value(&self, raw: &str) -> Option<FeatureValue> {
        match self {
            FeatureType::Integer => raw.trim().parse::<i64>().ok().map(FeatureValue::Integer),
            FeatureType::Real => raw.trim().parse::<f64>().ok().map(FeatureValue::Real),
            FeatureType::Nominal | FeatureType::String => Some(FeatureValue::Text(raw.to_string())),
        }
    }

    /// Returns true if `value` reads as zero under this type.
    ///
    /// Numbers are zero when they equal 0. Under `nominal` and `string` the
    /// text `"0"` written for an omitted sparse entry is zero too, so it
    /// counts as absent like a numeric zero does.
    pub fn is_zero(&self, value: &FeatureValue) -> bool {
        if value.is_zero() {
            return true;
        }
        !self.is_numeric() && value.as_str() == Some("0")
    }

    /// The zero value of this type, used to fill omitted sparse entries.
    pub fn zero(&self) -> FeatureValue {
        match self {
            FeatureType::Integer => FeatureValue::Integer(0),
            FeatureType::Real => FeatureValue::Real(0.0),
            FeatureType::Nominal | FeatureType::String => FeatureValue::Text("0".to_string()),
        }
    }
}
