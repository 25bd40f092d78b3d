//! LibSVM format: `<label> <index>:<value> <index>:<value> ...`
//!
//! An unlisted index means zero. The reader never materializes those zeros
//! and the writer omits both zero and missing values, so the two collapse
//! after a round trip.

use std::io::{BufWriter, Write};

use foldhash::{HashMap, HashMapExt};
use log::debug;

use crate::dataset::{Dataset, Sample};
use crate::error::{DatasetError, Result};
use crate::field_type::FeatureType;

/// Parse LibSVM text. Every feature is registered as `real`.
pub fn read_libsvm(text: &str) -> Result<Dataset> {
    let mut builder = Dataset::builder();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(label) = tokens.next() else {
            continue;
        };

        let mut sample = Sample::new();
        for token in tokens {
            let Some((name, value)) = token.split_once(':') else {
                return Err(DatasetError::malformed(
                    line_no,
                    format!("expected `index:value`, found `{token}`"),
                ));
            };
            if name.is_empty() {
                return Err(DatasetError::malformed(
                    line_no,
                    format!("empty feature index in `{token}`"),
                ));
            }
            let value: f64 = value.parse().map_err(|_| {
                DatasetError::malformed(line_no, format!("invalid feature value in `{token}`"))
            })?;

            if builder.feature_type(name).is_none() {
                builder.set_feature_type(name, FeatureType::Real);
            }
            sample.insert(builder.intern(name), value);
        }

        builder.push_sample(label, sample);
    }

    let dataset = builder.build();
    debug!(
        "read libsvm: {} classes, {} features, {} samples",
        dataset.classes().len(),
        dataset.features().len(),
        dataset.num_samples()
    );
    Ok(dataset)
}

/// Write LibSVM text.
///
/// Classes are renumbered `1..=N` and features `1..=M` following the
/// dataset's class and feature order. A feature is written only when it is
/// present and non-zero.
pub fn write_libsvm<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut out = BufWriter::new(writer);

    let mut class_index: HashMap<&str, usize> = HashMap::with_capacity(dataset.classes().len());
    for (i, class) in dataset.classes().iter().enumerate() {
        class_index.insert(&**class, i + 1);
    }

    for (class, sample) in dataset.iter() {
        write!(out, "{}", class_index[&**class])?;
        for (i, feature) in dataset.features().iter().enumerate() {
            let Some(value) = sample.get(feature) else {
                continue;
            };
            if !value.is_numeric() {
                return Err(DatasetError::Unrepresentable(format!(
                    "feature `{feature}` holds text `{value}`, LibSVM values are numeric"
                )));
            }
            if !value.is_zero() {
                write!(out, " {}:{}", i + 1, value)?;
            }
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}
