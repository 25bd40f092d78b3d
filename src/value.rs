use std::fmt;

/// A single feature value.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Real(f64),
    /// Nominal or free-text value.
    Text(String),
}

impl FeatureValue {
    /// Returns true for numeric zero. Text values are never zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.as_f64() == Some(0.0)
    }

    /// Returns true if this value is a number.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FeatureValue::Text(_))
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(v) => Some(*v as f64),
            FeatureValue::Real(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Integer(v) => write!(f, "{v}"),
            // Debug keeps the decimal point on whole reals (1.0, not 1)
            FeatureValue::Real(v) => write!(f, "{v:?}"),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Integer(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Real(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}
