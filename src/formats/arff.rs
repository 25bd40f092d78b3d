//! WEKA Attribute-Relation File Format (ARFF), dense and sparse.
//!
//! ```text
//! % comment
//! @RELATION weather
//!
//! @ATTRIBUTE outlook {sunny,rainy}
//! @ATTRIBUTE temperature real
//! @ATTRIBUTE class {yes,no}
//!
//! @DATA
//! sunny,21.5,yes
//! ?,18.0,no
//! {1 12.5,2 yes}
//! ```
//!
//! Missing values differ between the two row forms: a dense `?` leaves the
//! feature missing, while an index left out of a sparse row is filled with
//! the zero of the feature's type.

use std::io::{BufWriter, Write};
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use regex::Regex;

use crate::dataset::{Dataset, DatasetBuilder, FeatureName, Sample};
use crate::error::{DatasetError, Result};
use crate::field_type::FeatureType;
use crate::options::{ArffMode, ArffOptions};
use crate::tokenize::{UnbalancedQuotes, quote_if_needed, split_quoted, split_quoted_raw, strip_quotes};
use crate::value::FeatureValue;

/// Relation name written when the dataset carries none.
pub const DEFAULT_RELATION: &str = "data_gen_by_featio";

/// Marker for a missing value.
const MISSING: &str = "?";

static RELATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@relation\b").expect("Invalid relation pattern"));

static ATTRIBUTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@attribute\s+(.+)$").expect("Invalid attribute pattern"));

static DATA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@data\b").expect("Invalid data pattern"));

static SPARSE_ROW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{(.*)\}$").expect("Invalid sparse row pattern"));

static COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*").expect("Invalid comma pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace pattern"));

/// How values of a declared attribute are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeKind {
    Value(FeatureType),
    /// Stored as whole days since 1970-01-01 under an `integer` feature.
    Date,
}

impl AttributeKind {
    fn zero(&self) -> FeatureValue {
        match self {
            AttributeKind::Value(ty) => ty.zero(),
            AttributeKind::Date => FeatureValue::Integer(0),
        }
    }

    fn coerce(&self, raw: &str) -> Option<FeatureValue> {
        match self {
            AttributeKind::Value(ty) => ty.parse_value(raw),
            AttributeKind::Date => days_since_epoch(raw).map(FeatureValue::Integer),
        }
    }
}

/// Line-by-line ARFF parser state.
struct ArffParser {
    quote: char,
    builder: DatasetBuilder,
    attributes: Vec<(FeatureName, AttributeKind)>,
    has_class: bool,
    has_data: bool,
}

/// Parse ARFF text.
pub fn read_arff(text: &str, options: &ArffOptions) -> Result<Dataset> {
    let mut parser = ArffParser {
        quote: options.quote,
        builder: Dataset::builder(),
        attributes: Vec::new(),
        has_class: false,
        has_data: false,
    };

    for (idx, raw) in text.lines().enumerate() {
        parser.parse_line(raw, idx + 1)?;
    }

    if !parser.has_class {
        return Err(DatasetError::MissingSection("@ATTRIBUTE class"));
    }
    if !parser.has_data {
        return Err(DatasetError::MissingSection("@DATA"));
    }

    let dataset = parser.builder.build();
    debug!(
        "read arff: {} classes, {} features, {} samples",
        dataset.classes().len(),
        dataset.features().len(),
        dataset.num_samples()
    );
    Ok(dataset)
}

impl ArffParser {
    fn parse_line(&mut self, raw: &str, line_no: usize) -> Result<()> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }
        if line.starts_with('%') {
            self.builder.comment(raw.trim_end());
            return Ok(());
        }

        if self.has_data {
            // rows are only meaningful once the class list is known
            if self.has_class {
                self.parse_row(line, line_no)?;
            }
            return Ok(());
        }

        if RELATION_PATTERN.is_match(line) {
            let tokens = self.split(line, &WHITESPACE, line_no)?;
            let Some(name) = tokens.get(1).filter(|name| !name.is_empty()) else {
                return Err(DatasetError::malformed(line_no, "@RELATION without a name"));
            };
            self.builder.relation(name.as_str());
        } else if let Some(caps) = ATTRIBUTE_PATTERN.captures(line) {
            self.parse_attribute(caps[1].trim(), line_no)?;
        } else if DATA_PATTERN.is_match(line) {
            self.has_data = true;
        } else {
            return Err(DatasetError::malformed(
                line_no,
                format!("unexpected line in ARFF header: `{line}`"),
            ));
        }
        Ok(())
    }

    fn parse_attribute(&mut self, rest: &str, line_no: usize) -> Result<()> {
        let (name, declaration) = split_attribute_name(rest, self.quote)
            .ok_or_else(|| DatasetError::malformed(line_no, "unterminated attribute name"))?;
        if declaration.is_empty() {
            return Err(DatasetError::malformed(
                line_no,
                format!("attribute `{name}` has no type"),
            ));
        }

        if let Some(values) = declaration.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            let values = self.split(values.trim(), &COMMA, line_no)?;
            if name.eq_ignore_ascii_case("class") {
                for label in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
                    self.builder.add_class(label);
                }
                self.has_class = true;
            } else {
                // the enumerated values are advisory, the writer re-derives them
                let feature = self.builder.add_feature(&name, FeatureType::Nominal);
                self.attributes
                    .push((feature, AttributeKind::Value(FeatureType::Nominal)));
            }
            return Ok(());
        }

        let keyword = declaration.split_whitespace().next().unwrap_or_default();
        let kind = if keyword.eq_ignore_ascii_case("date") {
            AttributeKind::Date
        } else {
            let ty = FeatureType::from_keyword(keyword).ok_or_else(|| {
                DatasetError::InvalidFeatureType {
                    feature: name.clone(),
                    keyword: keyword.to_string(),
                }
            })?;
            AttributeKind::Value(ty)
        };
        let registered = match kind {
            AttributeKind::Value(ty) => ty,
            AttributeKind::Date => FeatureType::Integer,
        };
        let feature = self.builder.add_feature(&name, registered);
        self.attributes.push((feature, kind));
        Ok(())
    }

    fn parse_row(&mut self, line: &str, line_no: usize) -> Result<()> {
        let (label, sample) = match SPARSE_ROW_PATTERN.captures(line) {
            Some(caps) => self.parse_sparse_row(caps[1].trim(), line_no)?,
            None => self.parse_dense_row(line, line_no)?,
        };
        if !self.builder.has_class(&label) {
            return Err(DatasetError::malformed(
                line_no,
                format!("class `{label}` is not declared"),
            ));
        }
        self.builder.push_sample(&label, sample);
        Ok(())
    }

    /// `{index value, ..., index class}`. Unlisted indices get zero.
    fn parse_sparse_row(&self, inner: &str, line_no: usize) -> Result<(String, Sample)> {
        let mut pairs = split_quoted_raw(inner, &COMMA, self.quote)
            .map_err(|_| DatasetError::UnbalancedQuotes { line: line_no })?;

        let class_pair = pairs.pop().unwrap_or_default();
        let Some((_, label)) = split_pair(class_pair) else {
            return Err(DatasetError::malformed(line_no, "sparse row has no class entry"));
        };
        let label = strip_quotes(label, self.quote);

        let mut listed = vec![false; self.attributes.len()];
        let mut sample = Sample::new();
        for pair in pairs {
            let Some((index, raw_value)) = split_pair(pair) else {
                return Err(DatasetError::malformed(
                    line_no,
                    format!("expected `index value`, found `{pair}`"),
                ));
            };
            let index: usize = index.parse().map_err(|_| {
                DatasetError::malformed(line_no, format!("invalid sparse index `{index}`"))
            })?;
            let Some((feature, kind)) = self.attributes.get(index) else {
                return Err(DatasetError::malformed(
                    line_no,
                    format!(
                        "sparse index {index} out of range for {} features",
                        self.attributes.len()
                    ),
                ));
            };
            listed[index] = true;

            let raw_value = strip_quotes(raw_value, self.quote);
            if raw_value == MISSING {
                continue;
            }
            let value = coerce(kind, feature, &raw_value, line_no)?;
            sample.insert(Arc::clone(feature), value);
        }

        for ((feature, kind), _) in self
            .attributes
            .iter()
            .zip(&listed)
            .filter(|&(_, listed)| !listed)
        {
            sample.insert(Arc::clone(feature), kind.zero());
        }

        Ok((label, sample))
    }

    /// `value, value, ..., class`. `?` leaves the feature missing.
    fn parse_dense_row(&self, line: &str, line_no: usize) -> Result<(String, Sample)> {
        let mut cells = self.split(line, &COMMA, line_no)?;
        let label = cells.pop().unwrap_or_default();
        if cells.len() != self.attributes.len() {
            return Err(DatasetError::malformed(
                line_no,
                format!(
                    "{} values for {} features",
                    cells.len(),
                    self.attributes.len()
                ),
            ));
        }

        let mut sample = Sample::new();
        for ((feature, kind), cell) in self.attributes.iter().zip(&cells) {
            if cell == MISSING {
                continue;
            }
            let value = coerce(kind, feature, cell, line_no)?;
            sample.insert(Arc::clone(feature), value);
        }

        Ok((label, sample))
    }

    fn split(&self, line: &str, delimiter: &Regex, line_no: usize) -> Result<Vec<String>> {
        split_quoted(line, delimiter, self.quote).map_err(|UnbalancedQuotes| {
            DatasetError::UnbalancedQuotes { line: line_no }
        })
    }
}

fn coerce(kind: &AttributeKind, feature: &str, raw: &str, line_no: usize) -> Result<FeatureValue> {
    kind.coerce(raw).ok_or_else(|| {
        DatasetError::malformed(
            line_no,
            format!("invalid value `{raw}` for feature `{feature}`"),
        )
    })
}

/// Split `name rest` where the name may be quoted.
fn split_attribute_name(rest: &str, quote: char) -> Option<(String, &str)> {
    if let Some(quoted) = rest.strip_prefix(quote) {
        let end = quoted.find(quote)?;
        return Some((quoted[..end].to_string(), quoted[end + quote.len_utf8()..].trim()));
    }
    match rest.split_once(char::is_whitespace) {
        Some((name, declaration)) => Some((name.to_string(), declaration.trim())),
        None => Some((rest.to_string(), "")),
    }
}

/// Split a sparse `index value` pair on its first run of whitespace.
fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (index, value) = pair.trim().split_once(char::is_whitespace)?;
    Some((index, value.trim()))
}

/// Whole days from 1970-01-01 to `raw`, truncated toward zero.
fn days_since_epoch(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .ok()?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?.and_time(NaiveTime::MIN);
    Some((parsed - epoch).num_days())
}

/// Write ARFF.
///
/// Nominal attributes list the sorted distinct values observed in the data;
/// features without a registered type are declared `string`.
pub fn write_arff<W: Write>(
    dataset: &Dataset,
    writer: W,
    mode: ArffMode,
    options: &ArffOptions,
) -> Result<()> {
    let quote = options.quote;
    let mut out = BufWriter::new(writer);

    if !dataset.comments().is_empty() {
        for comment in dataset.comments() {
            writeln!(out, "{comment}")?;
        }
        writeln!(out)?;
    }

    let relation = dataset.relation().unwrap_or(DEFAULT_RELATION);
    writeln!(out, "@RELATION {}", quote_if_needed(relation, quote))?;
    writeln!(out)?;

    let features = dataset.features();
    for feature in features {
        write!(out, "@ATTRIBUTE {} ", quote_if_needed(feature, quote))?;
        match dataset.feature_type(feature).unwrap_or_default() {
            FeatureType::Nominal => {
                let mut values: Vec<String> = dataset
                    .feature_values(feature)
                    .into_iter()
                    .map(ToString::to_string)
                    .collect();
                values.sort();
                values.dedup();
                writeln!(out, "{{{}}}", join_quoted(&values, quote))?;
            }
            ty => writeln!(out, "{}", ty.keyword())?,
        }
    }
    writeln!(out, "@ATTRIBUTE class {{{}}}", join_quoted(dataset.classes(), quote))?;
    writeln!(out)?;

    writeln!(out, "@DATA")?;
    let types: Vec<FeatureType> = features
        .iter()
        .map(|f| dataset.feature_type(f).unwrap_or_default())
        .collect();
    for (class, sample) in dataset.iter() {
        match mode {
            ArffMode::Sparse => {
                write!(out, "{{")?;
                for (i, (feature, ty)) in features.iter().zip(&types).enumerate() {
                    // zero and missing are both left out
                    if let Some(value) = sample.get(feature)
                        && !ty.is_zero(value)
                    {
                        write!(out, "{i} {},", quote_if_needed(&value.to_string(), quote))?;
                    }
                }
                writeln!(out, "{} {}}}", features.len(), quote_if_needed(class, quote))?;
            }
            ArffMode::Dense => {
                for feature in features {
                    match sample.get(feature) {
                        Some(value) => write!(out, "{},", quote_if_needed(&value.to_string(), quote))?,
                        None => write!(out, "{MISSING},")?,
                    }
                }
                writeln!(out, "{}", quote_if_needed(class, quote))?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn join_quoted<S: AsRef<str>>(values: &[S], quote: char) -> String {
    values
        .iter()
        .map(|v| quote_if_needed(v.as_ref(), quote))
        .collect::<Vec<_>>()
        .join(",")
}
