//! Canonical in-memory dataset model shared by every reader, writer and the
//! contingency counter.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::Arc;

use foldhash::{HashMap, HashSet, HashSetExt};

use crate::field_type::FeatureType;
use crate::value::FeatureValue;

/// Interned class label.
pub type ClassLabel = Arc<str>;

/// Interned feature name.
pub type FeatureName = Arc<str>;

/// One labeled observation: feature name to value.
///
/// A feature absent from the map is missing, which is not the same as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    values: BTreeMap<FeatureName, FeatureValue>,
}

impl Sample {
    /// Create an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature value, replacing any previous value.
    pub fn insert(&mut self, feature: impl Into<FeatureName>, value: impl Into<FeatureValue>) {
        self.values.insert(feature.into(), value.into());
    }

    /// Value of `feature`, or `None` when it is missing.
    #[inline]
    pub fn get(&self, feature: &str) -> Option<&FeatureValue> {
        self.values.get(feature)
    }

    /// Returns true if the sample carries a value for `feature`.
    #[inline]
    pub fn contains(&self, feature: &str) -> bool {
        self.values.contains_key(feature)
    }

    /// Number of features present.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no feature is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Present features in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, FeatureName, FeatureValue> {
        self.values.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Sample
where
    K: Into<FeatureName>,
    V: Into<FeatureValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A labeled dataset: samples grouped by class, plus the feature order and
/// the feature type registry.
///
/// Built once by a reader (or a [`DatasetBuilder`]) and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    classes: Vec<ClassLabel>,
    samples: HashMap<ClassLabel, Vec<Sample>>,
    features: Vec<FeatureName>,
    feature_types: HashMap<FeatureName, FeatureType>,
    relation: Option<String>,
    comments: Vec<String>,
}

impl Dataset {
    /// Start building a dataset.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    /// Known class labels, in the order they were first seen or declared.
    #[inline]
    pub fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    /// Samples of one class. Unknown classes have no samples.
    pub fn samples(&self, class: &str) -> &[Sample] {
        self.samples.get(class).map_or(&[], Vec::as_slice)
    }

    /// Every sample with its class, class by class.
    pub fn iter(&self) -> impl Iterator<Item = (&ClassLabel, &Sample)> {
        self.classes.iter().flat_map(move |class| {
            self.samples(class).iter().map(move |sample| (class, sample))
        })
    }

    /// Feature order used by writers and by contingency enumeration.
    #[inline]
    pub fn features(&self) -> &[FeatureName] {
        &self.features
    }

    /// Registered type of `feature`, if any.
    pub fn feature_type(&self, feature: &str) -> Option<FeatureType> {
        self.feature_types.get(feature).copied()
    }

    /// Every present value of `feature` across all samples.
    pub fn feature_values(&self, feature: &str) -> Vec<&FeatureValue> {
        self.iter()
            .filter_map(|(_, sample)| sample.get(feature))
            .collect()
    }

    /// ARFF relation name, if one was read.
    pub fn relation(&self) -> Option<&str> {
        self.relation.as_deref()
    }

    /// Comment lines collected from an ARFF header.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Number of samples in `class`.
    pub fn class_size(&self, class: &str) -> usize {
        self.samples(class).len()
    }

    /// Total number of samples.
    pub fn num_samples(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }

    /// Returns true if the dataset holds no samples.
    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }
}

/// Incremental constructor for [`Dataset`], used by the format readers.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    interner: HashSet<Arc<str>>,
    classes: Vec<ClassLabel>,
    samples: HashMap<ClassLabel, Vec<Sample>>,
    features: Vec<FeatureName>,
    declared: HashSet<FeatureName>,
    feature_types: HashMap<FeatureName, FeatureType>,
    relation: Option<String>,
    comments: Vec<String>,
}

impl DatasetBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for `name`, allocated once per distinct string.
    pub fn intern(&mut self, name: &str) -> Arc<str> {
        if let Some(existing) = self.interner.get(name) {
            return Arc::clone(existing);
        }
        let interned: Arc<str> = Arc::from(name);
        self.interner.insert(Arc::clone(&interned));
        interned
    }

    /// Register a class with no samples yet. Idempotent.
    pub fn add_class(&mut self, label: &str) -> ClassLabel {
        let label = self.intern(label);
        if !self.samples.contains_key(&label) {
            self.classes.push(Arc::clone(&label));
            self.samples.insert(Arc::clone(&label), Vec::new());
        }
        label
    }

    /// Returns true if `label` has been registered.
    pub fn has_class(&self, label: &str) -> bool {
        self.samples.contains_key(label)
    }

    /// Append a sample to `label`, registering the class if needed.
    pub fn push_sample(&mut self, label: &str, sample: Sample) -> &mut Self {
        let label = self.add_class(label);
        self.samples.entry(label).or_default().push(sample);
        self
    }

    /// Declare the next feature in column order with its type.
    ///
    /// Declaring a feature twice keeps its first position and updates its type.
    pub fn add_feature(&mut self, name: &str, feature_type: FeatureType) -> FeatureName {
        let name = self.intern(name);
        if self.declared.insert(Arc::clone(&name)) {
            self.features.push(Arc::clone(&name));
        }
        self.feature_types.insert(Arc::clone(&name), feature_type);
        name
    }

    /// Register a type without fixing the feature's position.
    pub fn set_feature_type(&mut self, name: &str, feature_type: FeatureType) -> &mut Self {
        let name = self.intern(name);
        self.feature_types.insert(name, feature_type);
        self
    }

    /// Registered type of `feature`, if any.
    pub fn feature_type(&self, feature: &str) -> Option<FeatureType> {
        self.feature_types.get(feature).copied()
    }

    pub fn relation(&mut self, relation: impl Into<String>) -> &mut Self {
        self.relation = Some(relation.into());
        self
    }

    pub fn comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comments.push(comment.into());
        self
    }

    /// Finish the dataset.
    ///
    /// Features present in samples but never declared are appended after the
    /// declared ones, ordered numerically when their names are numbers.
    pub fn build(self) -> Dataset {
        let mut features = self.features;

        let discovered = {
            let declared = &self.declared;
            let mut seen: HashSet<&str> = HashSet::new();
            let mut discovered: Vec<FeatureName> = Vec::new();
            for sample in self.samples.values().flatten() {
                for name in sample.values.keys() {
                    if !declared.contains(&**name) && seen.insert(&**name) {
                        discovered.push(Arc::clone(name));
                    }
                }
            }
            discovered.sort_by(|a, b| compare_feature_names(a, b));
            discovered
        };
        features.extend(discovered);

        Dataset {
            classes: self.classes,
            samples: self.samples,
            features,
            feature_types: self.feature_types,
            relation: self.relation,
            comments: self.comments,
        }
    }
}

/// Numeric names sort as numbers and before any other name.
fn compare_feature_names(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
