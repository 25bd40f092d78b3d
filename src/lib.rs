//! featio: read and write labelled feature datasets in LibSVM, CSV and WEKA ARFF
//!
//! Every format is parsed into one in-memory [`Dataset`]: samples grouped by
//! class label, each sample a sparse map from feature name to a typed value.
//! Any dataset can be written back out in any of the three formats, and
//! [`contingency`] derives the per-feature, per-class 2x2 presence counts
//! that feature-selection scores are built on.
//!
//! # Quick Start
//!
//! ```
//! use featio::{parse_text, write_to, Format, ReadOptions, WriteOptions};
//!
//! let text = "\
//! @RELATION toy
//! @ATTRIBUTE size real
//! @ATTRIBUTE class {small,big}
//! @DATA
//! 1.5,small
//! {0 9.0,1 big}
//! ";
//! let dataset = parse_text(text, Format::Weka, &ReadOptions::default()).unwrap();
//! assert_eq!(dataset.class_size("small"), 1);
//!
//! let mut out = Vec::new();
//! write_to(&dataset, &mut out, Format::LibSvm, &WriteOptions::default()).unwrap();
//! assert_eq!(out, b"1 1:1.5\n2 1:9.0\n");
//! ```
//!
//! # Missing values and zeros
//!
//! The formats disagree on what an absent feature means. A dense ARFF `?`
//! and an empty CSV cell leave the feature missing; an index left out of a
//! sparse ARFF row is filled with zero. LibSVM cannot tell the two apart:
//! its writer drops both, and its reader never materializes zeros.

pub mod contingency;
mod dataset;
mod encoding;
mod error;
mod field_type;
pub mod formats;
#[cfg(feature = "http")]
pub mod http;
mod options;
mod source;
mod tokenize;
mod value;

pub use contingency::{ContingencyCounts, ContingencyTable, contingency};
pub use dataset::{ClassLabel, Dataset, DatasetBuilder, FeatureName, Sample};
pub use error::{DatasetError, Result};
pub use field_type::FeatureType;
pub use options::{ArffMode, ArffOptions, CsvOptions, Format, Quote, ReadOptions, WriteOptions};
pub use source::{Destination, Source, parse_text, read, write, write_to};
pub use tokenize::{UnbalancedQuotes, quote_if_needed, split_quoted};
pub use value::FeatureValue;

// Re-export for advanced usage
pub use encoding::{decode_text, is_utf8};

#[cfg(feature = "http")]
pub use http::{HttpError, read_url};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api() {
        // Verify all public types are accessible
        let _options = ReadOptions::default();
        let _write = WriteOptions {
            arff_mode: ArffMode::Sparse,
            ..WriteOptions::default()
        };
        let _quote = Quote::Some(b'"');
        let _type = FeatureType::Nominal;
        let _value = FeatureValue::from(1.5);
    }

    #[test]
    fn test_format_names() {
        assert_eq!("arff".parse::<Format>().unwrap(), Format::Weka);
        assert_eq!("LibSVM".parse::<Format>().unwrap(), Format::LibSvm);
        assert!("json".parse::<Format>().unwrap_err().is_config());
    }

    #[test]
    fn test_builder_pattern() {
        let mut options = CsvOptions::new();
        options
            .feature_name_row(Some(2))
            .feature_type_row(Some(3))
            .class_label_column(4)
            .delimiter(b';')
            .quote(Quote::None);

        // Verify builder returns &mut Self for chaining
    }

    #[test]
    fn test_csv_to_arff() {
        let csv = "x,y\ninteger,real\npos,1,2.5\nneg,,0.0\n";
        let ds = parse_text(csv, Format::Csv, &ReadOptions::default()).unwrap();

        let mut out = Vec::new();
        write_to(&ds, &mut out, Format::Weka, &WriteOptions::default()).unwrap();
        let back = parse_text(
            std::str::from_utf8(&out).unwrap(),
            Format::Weka,
            &ReadOptions::default(),
        )
        .unwrap();

        assert_eq!(back.classes(), ds.classes());
        assert_eq!(back.samples("pos"), ds.samples("pos"));
        assert_eq!(back.samples("neg"), ds.samples("neg"));
    }
}
