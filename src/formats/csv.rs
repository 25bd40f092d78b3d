//! CSV format with a feature-name header row and a feature-type header row.
//!
//! ```text
//! f1,f2,f3
//! integer,real,string
//! c1,1,0.5,red
//! c2,,2.5,
//! ```
//!
//! Data rows carry the class label in a configurable column. An empty cell
//! is a missing value.

use std::io::Write;
use std::sync::Arc;

use log::{debug, warn};

use crate::dataset::{Dataset, DatasetBuilder, FeatureName, Sample};
use crate::error::{DatasetError, Result};
use crate::field_type::FeatureType;
use crate::options::{CsvOptions, Quote};

/// Parse CSV text.
pub fn read_csv(text: &str, options: &CsvOptions) -> Result<Dataset> {
    options.validate()?;

    let mut reader_builder = csv::ReaderBuilder::new();
    reader_builder
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true);
    match options.quote {
        Quote::None => {
            reader_builder.quoting(false);
        }
        Quote::Some(q) => {
            reader_builder.quoting(true);
            reader_builder.quote(q);
        }
    }
    let mut reader = reader_builder.from_reader(text.as_bytes());

    let explicit = !options.feature_types.is_empty();
    let header_end = options
        .feature_name_row
        .into_iter()
        .chain(options.feature_type_row)
        .max()
        .unwrap_or(0);

    let mut header = Header::default();
    let mut builder = Dataset::builder();
    let mut columns: Option<Vec<(FeatureName, FeatureType)>> = None;
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line() as usize);
        if is_blank(&record) {
            continue;
        }

        if Some(line) == options.feature_name_row {
            if !explicit {
                header.names = Some(record.iter().map(|s| s.trim().to_string()).collect());
            }
            continue;
        }
        if Some(line) == options.feature_type_row {
            if !explicit {
                header.types = Some((line, record.iter().map(str::to_string).collect()));
            }
            continue;
        }
        if line < header_end {
            warn!("skipping line {line} above the CSV header rows");
            continue;
        }

        if columns.is_none() {
            columns = Some(declare_features(&mut builder, &header, options)?);
        }
        let columns = columns.as_deref().unwrap_or_default();
        let (label, sample) = parse_row(&record, line, columns, options.class_label_column)?;
        builder.push_sample(label, sample);
    }

    if columns.is_none() {
        declare_features(&mut builder, &header, options)?;
    }

    let dataset = builder.build();
    debug!(
        "read csv: {} classes, {} features, {} samples",
        dataset.classes().len(),
        dataset.features().len(),
        dataset.num_samples()
    );
    Ok(dataset)
}

/// Header rows collected before the first data row.
#[derive(Debug, Default)]
struct Header {
    names: Option<Vec<String>>,
    /// Line number and raw keywords of the type row.
    types: Option<(usize, Vec<String>)>,
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|cell| cell.trim().is_empty())
}

/// Fix the feature order and type registry, from the explicit mapping when
/// one was supplied and from the header rows otherwise.
fn declare_features(
    builder: &mut DatasetBuilder,
    header: &Header,
    options: &CsvOptions,
) -> Result<Vec<(FeatureName, FeatureType)>> {
    if !options.feature_types.is_empty() {
        return Ok(options
            .feature_types
            .iter()
            .map(|(name, ty)| (builder.add_feature(name, *ty), *ty))
            .collect());
    }

    let Some(names) = &header.names else {
        return Err(DatasetError::MissingSection("CSV feature name row"));
    };

    let types = match (&header.types, options.feature_type_row) {
        (Some((line, keywords)), _) => {
            if keywords.len() != names.len() {
                return Err(DatasetError::malformed(
                    *line,
                    format!(
                        "{} feature types for {} feature names",
                        keywords.len(),
                        names.len()
                    ),
                ));
            }
            names
                .iter()
                .zip(keywords)
                .map(|(name, keyword)| {
                    FeatureType::from_keyword(keyword).ok_or_else(|| {
                        DatasetError::InvalidFeatureType {
                            feature: name.clone(),
                            keyword: keyword.clone(),
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?
        }
        (None, Some(_)) => return Err(DatasetError::MissingSection("CSV feature type row")),
        (None, None) => {
            warn!("no CSV feature type row, treating every feature as string");
            vec![FeatureType::String; names.len()]
        }
    };

    Ok(names
        .iter()
        .zip(types)
        .map(|(name, ty)| (builder.add_feature(name, ty), ty))
        .collect())
}

/// Split a data row into its class label and sample.
fn parse_row<'r>(
    record: &'r csv::StringRecord,
    line: usize,
    columns: &[(FeatureName, FeatureType)],
    class_label_column: usize,
) -> Result<(&'r str, Sample)> {
    let width = record.len();
    let label_idx = class_label_column - 1;
    let Some(label) = record.get(label_idx) else {
        return Err(DatasetError::LabelColumnOutOfRange {
            line,
            column: class_label_column,
            width,
        });
    };

    // a trailing empty cell still counts, a truncated row does not
    if width - 1 != columns.len() {
        return Err(DatasetError::malformed(
            line,
            format!("{} feature cells for {} features", width - 1, columns.len()),
        ));
    }

    let cells = record
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != label_idx)
        .map(|(_, cell)| cell);

    let mut sample = Sample::new();
    for ((name, ty), cell) in columns.iter().zip(cells) {
        if cell.is_empty() {
            continue;
        }
        let value = ty.parse_value(cell).ok_or_else(|| {
            DatasetError::malformed(
                line,
                format!("invalid {ty} value `{cell}` for feature `{name}`"),
            )
        })?;
        sample.insert(Arc::clone(name), value);
    }

    Ok((label, sample))
}

/// Write CSV: feature names, feature types (`string` when unregistered),
/// then one row per sample with the class label first and an empty cell for
/// each missing feature.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W, options: &CsvOptions) -> Result<()> {
    let mut writer_builder = csv::WriterBuilder::new();
    writer_builder.delimiter(options.delimiter).flexible(true);
    match options.quote {
        Quote::None => {
            writer_builder.quote_style(csv::QuoteStyle::Never);
        }
        Quote::Some(q) => {
            writer_builder.quote(q);
        }
    }
    let mut out = writer_builder.from_writer(writer);

    let features = dataset.features();
    out.write_record(features.iter().map(|f| f.as_bytes()))?;
    out.write_record(
        features
            .iter()
            .map(|f| dataset.feature_type(f).unwrap_or_default().keyword()),
    )?;

    let mut row: Vec<String> = Vec::with_capacity(features.len() + 1);
    for (class, sample) in dataset.iter() {
        row.clear();
        row.push(class.to_string());
        for feature in features {
            row.push(sample.get(feature).map(ToString::to_string).unwrap_or_default());
        }
        out.write_record(&row)?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FeatureValue;

    #[test]
    fn test_read_csv_with_header_rows() {
        let data = "f1,f2,f3\nINTEGER,numeric,string\nc1,1,0.5,red\n\nc2,2,,blue\n";
        let ds = read_csv(data, &CsvOptions::new()).unwrap();

        let features: Vec<&str> = ds.features().iter().map(|f| &**f).collect();
        assert_eq!(features, vec!["f1", "f2", "f3"]);
        assert_eq!(ds.feature_type("f1"), Some(FeatureType::Integer));
        assert_eq!(ds.feature_type("f2"), Some(FeatureType::Real));
        assert_eq!(ds.feature_type("f3"), Some(FeatureType::String));
        assert_eq!(ds.num_samples(), 2);

        let s = &ds.samples("c2")[0];
        assert_eq!(s.get("f1"), Some(&FeatureValue::Integer(2)));
        assert!(s.get("f2").is_none());
        assert_eq!(s.get("f3"), Some(&FeatureValue::Text("blue".into())));
    }

    #[test]
    fn test_read_csv_missing_trailing_cell() {
        let data = "f1,f2\ninteger,integer\nc1,1,\n";
        let ds = read_csv(data, &CsvOptions::new()).unwrap();

        let s = &ds.samples("c1")[0];
        assert_eq!(s.get("f1"), Some(&FeatureValue::Integer(1)));
        assert!(!s.contains("f2"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_read_csv_label_column() {
        let data = "f1,f2\nreal,real\n1.5,c1,2.5\n";
        let mut options = CsvOptions::new();
        options.class_label_column(2);
        let ds = read_csv(data, &options).unwrap();

        let s = &ds.samples("c1")[0];
        assert_eq!(s.get("f1"), Some(&FeatureValue::Real(1.5)));
        assert_eq!(s.get("f2"), Some(&FeatureValue::Real(2.5)));
    }

    #[test]
    fn test_read_csv_label_column_out_of_range() {
        let data = "f1\ninteger\nc1,1\n";
        let mut options = CsvOptions::new();
        options.class_label_column(5);
        let err = read_csv(data, &options).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::LabelColumnOutOfRange {
                line: 3,
                column: 5,
                width: 2
            }
        ));
    }

    #[test]
    fn test_read_csv_invalid_type_keyword() {
        let data = "f1,f2\ninteger,blob\nc1,1,2\n";
        let err = read_csv(data, &CsvOptions::new()).unwrap_err();
        assert!(err.is_config());
        assert!(matches!(err, DatasetError::InvalidFeatureType { ref feature, .. } if feature == "f2"));
    }

    #[test]
    fn test_read_csv_too_many_cells() {
        let data = "f1\ninteger\nc1,1,2\n";
        let err = read_csv(data, &CsvOptions::new()).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { line: 3, .. }));
    }

    #[test]
    fn test_read_csv_short_row() {
        let data = "f1,f2,f3\ninteger,integer,integer\nc1,1\n";
        let err = read_csv(data, &CsvOptions::new()).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { line: 3, .. }));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_read_csv_bad_integer() {
        let data = "f1\ninteger\nc1,abc\n";
        assert!(read_csv(data, &CsvOptions::new()).unwrap_err().is_malformed());
    }

    #[test]
    fn test_read_csv_explicit_types_skip_header_rows() {
        let data = "ignored,names\nignored,types\nc1,3,x\n";
        let mut options = CsvOptions::new();
        options.feature_types([("n", FeatureType::Integer), ("s", FeatureType::Nominal)]);
        let ds = read_csv(data, &options).unwrap();

        let features: Vec<&str> = ds.features().iter().map(|f| &**f).collect();
        assert_eq!(features, vec!["n", "s"]);
        assert_eq!(ds.samples("c1")[0].get("n"), Some(&FeatureValue::Integer(3)));
    }

    #[test]
    fn test_read_csv_explicit_types_without_header() {
        let data = "c1,3\nc2,4\n";
        let mut options = CsvOptions::new();
        options
            .feature_name_row(None)
            .feature_type_row(None)
            .feature_types([("n", FeatureType::Integer)]);
        let ds = read_csv(data, &options).unwrap();
        assert_eq!(ds.num_samples(), 2);
    }

    #[test]
    fn test_read_csv_header_only() {
        let ds = read_csv("a,b\nreal,string\n", &CsvOptions::new()).unwrap();
        assert_eq!(ds.features().len(), 2);
        assert!(ds.is_empty());
    }

    #[test]
    fn test_read_csv_quoted_cell() {
        let data = "name\nstring\nc1,\"Smith, J.\"\n";
        let ds = read_csv(data, &CsvOptions::new()).unwrap();
        assert_eq!(
            ds.samples("c1")[0].get("name"),
            Some(&FeatureValue::Text("Smith, J.".into()))
        );
    }

    #[test]
    fn test_write_csv() {
        let mut builder = Dataset::builder();
        builder.add_feature("f1", FeatureType::Integer);
        builder.add_feature("f2", FeatureType::Real);
        builder.push_sample(
            "c1",
            [("f1", FeatureValue::Integer(1)), ("f2", FeatureValue::Real(0.5))]
                .into_iter()
                .collect(),
        );
        builder.push_sample("c2", [("f2", 2.0)].into_iter().collect());
        builder.push_sample("c2", [("f3", "x")].into_iter().collect());
        let ds = builder.build();

        let mut out = Vec::new();
        write_csv(&ds, &mut out, &CsvOptions::new()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "f1,f2,f3\ninteger,real,string\nc1,1,0.5,\nc2,,2.0,\nc2,,,x\n"
        );
    }
}
