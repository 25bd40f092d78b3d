//! Per-feature, per-class 2x2 presence counts.
//!
//! |               | in class | not in class |
//! |---------------|----------|--------------|
//! | present       | A        | B            |
//! | absent / zero | C        | D            |

use foldhash::{HashMap, HashMapExt};
use rayon::prelude::*;

use crate::dataset::{ClassLabel, Dataset, FeatureName, Sample};
use crate::field_type::FeatureType;

/// The four counts for one (feature, class) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContingencyCounts {
    /// In class, feature present.
    pub a: usize,
    /// Not in class, feature present.
    pub b: usize,
    /// In class, feature absent or zero.
    pub c: usize,
    /// Not in class, feature absent or zero.
    pub d: usize,
}

impl ContingencyCounts {
    /// Samples in the target class (`A + C`).
    #[inline]
    pub fn class_size(&self) -> usize {
        self.a + self.c
    }

    /// Samples outside the target class (`B + D`).
    #[inline]
    pub fn rest_size(&self) -> usize {
        self.b + self.d
    }

    /// All samples.
    #[inline]
    pub fn total(&self) -> usize {
        self.a + self.b + self.c + self.d
    }

    /// Counts as an `(A, B, C, D)` tuple.
    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.a, self.b, self.c, self.d)
    }
}

/// A sample has a feature when the feature is present and not the zero of
/// its type. Negative values count as present.
#[inline]
fn has_feature(sample: &Sample, feature: &str, ty: FeatureType) -> bool {
    sample.get(feature).is_some_and(|value| !ty.is_zero(value))
}

/// Count A, B, C and D for `feature` against `class` in one pass.
pub fn contingency(dataset: &Dataset, feature: &str, class: &str) -> ContingencyCounts {
    let ty = dataset.feature_type(feature).unwrap_or_default();
    let mut counts = ContingencyCounts::default();
    for (label, sample) in dataset.iter() {
        let present = has_feature(sample, feature, ty);
        match (&**label == class, present) {
            (true, true) => counts.a += 1,
            (false, true) => counts.b += 1,
            (true, false) => counts.c += 1,
            (false, false) => counts.d += 1,
        }
    }
    counts
}

/// Counts for every (feature, class) pair of a dataset.
#[derive(Debug, Clone, Default)]
pub struct ContingencyTable {
    counts: HashMap<FeatureName, HashMap<ClassLabel, ContingencyCounts>>,
}

impl ContingencyTable {
    /// Compute all pairs, one feature per rayon task.
    pub fn compute(dataset: &Dataset) -> Self {
        let per_feature: Vec<(FeatureName, HashMap<ClassLabel, ContingencyCounts>)> = dataset
            .features()
            .par_iter()
            .map(|feature| {
                let mut by_class = HashMap::with_capacity(dataset.classes().len());
                for class in dataset.classes() {
                    by_class.insert(
                        ClassLabel::clone(class),
                        contingency(dataset, feature, class),
                    );
                }
                (FeatureName::clone(feature), by_class)
            })
            .collect();

        Self {
            counts: per_feature.into_iter().collect(),
        }
    }

    /// Counts for one pair, if both the feature and the class are known.
    pub fn get(&self, feature: &str, class: &str) -> Option<ContingencyCounts> {
        self.counts.get(feature)?.get(class).copied()
    }

    /// Number of (feature, class) pairs.
    pub fn len(&self) -> usize {
        self.counts.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::arff::read_arff;
    use crate::options::ArffOptions;
    use crate::value::FeatureValue;

    fn dataset() -> Dataset {
        let mut builder = Dataset::builder();
        builder.add_feature("f1", FeatureType::Real);
        builder.add_feature("f2", FeatureType::Real);
        builder.add_feature("f3", FeatureType::String);
        builder.push_sample("c1", [("f1", 1.0), ("f2", 0.0)].into_iter().collect());
        builder.push_sample("c1", [("f1", -2.0)].into_iter().collect());
        builder.push_sample("c2", [("f2", 3.0)].into_iter().collect());
        builder.push_sample(
            "c2",
            [("f1", FeatureValue::Real(0.0)), ("f3", FeatureValue::from("x"))]
                .into_iter()
                .collect(),
        );
        builder.push_sample("c2", Sample::new());
        builder.build()
    }

    #[test]
    fn test_contingency_counts() {
        let ds = dataset();

        // negative counts as present, explicit zero as absent
        assert_eq!(contingency(&ds, "f1", "c1").as_tuple(), (2, 0, 0, 3));
        assert_eq!(contingency(&ds, "f2", "c1").as_tuple(), (0, 1, 2, 2));
        assert_eq!(contingency(&ds, "f3", "c2").as_tuple(), (1, 0, 2, 2));
    }

    #[test]
    fn test_sparse_nominal_zero_is_absent() {
        let text = "@attribute color {red}\n@attribute size integer\n@attribute class {a,b}\n\
                    @data\n{1 3,2 a}\n{0 red,1 0,2 b}\n";
        let ds = read_arff(text, &ArffOptions::new()).unwrap();

        assert_eq!(contingency(&ds, "color", "a").as_tuple(), (0, 1, 1, 0));
        assert_eq!(contingency(&ds, "size", "a").as_tuple(), (1, 0, 0, 1));
    }

    #[test]
    fn test_contingency_invariant() {
        let ds = dataset();
        let total = ds.num_samples();
        for feature in ds.features() {
            for class in ds.classes() {
                let counts = contingency(&ds, feature, class);
                assert_eq!(counts.class_size(), ds.class_size(class));
                assert_eq!(counts.rest_size(), total - ds.class_size(class));
            }
        }
    }

    #[test]
    fn test_unknown_feature_and_class() {
        let ds = dataset();
        assert_eq!(contingency(&ds, "nope", "c1").as_tuple(), (0, 0, 2, 3));
        assert_eq!(contingency(&ds, "f1", "nope").as_tuple(), (0, 2, 0, 3));
    }

    #[test]
    fn test_table_matches_single_queries() {
        let ds = dataset();
        let table = ContingencyTable::compute(&ds);

        assert_eq!(table.len(), 6);
        for feature in ds.features() {
            for class in ds.classes() {
                assert_eq!(
                    table.get(feature, class),
                    Some(contingency(&ds, feature, class))
                );
            }
        }
        assert_eq!(table.get("f1", "c3"), None);
    }
}
