use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use std::collections::HashSet;
use std::fmt;

/// A case-normalized text token describing visual content.
///
/// Labels can only be built through [`normalize`](crate::normalize), so two
/// labels compare equal exactly when their lower-cased text is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub(crate) fn from_normalized(text: String) -> Self {
        Label(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Unordered set of labels. Duplicates collapse on insert.
///
/// Used both for the labels detected on an uploaded image and for the labels
/// a catalog product is tagged with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: HashSet<Label>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and insert a raw label. Returns `false` if it was already present.
    pub fn insert_raw(&mut self, raw: &str) -> bool {
        self.labels.insert(crate::normalize(raw))
    }

    pub fn insert(&mut self, label: Label) -> bool {
        self.labels.insert(label)
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    /// Number of labels present in both sets.
    pub fn overlap(&self, other: &LabelSet) -> usize {
        // Walk the smaller set, probe the larger one.
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.labels.iter().filter(|l| large.labels.contains(*l)).count()
    }

    /// Sorted label text, handy for logs and deterministic output.
    pub fn to_sorted_vec(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.labels.iter().map(Label::as_str).collect();
        out.sort_unstable();
        out
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for raw in iter {
            set.insert_raw(raw.as_ref());
        }
        set
    }
}

/// A catalog entry: the verbatim JSON record plus its normalized label set.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    payload: JsonValue,
    labels: LabelSet,
}

impl Product {
    pub fn new(payload: JsonValue, labels: LabelSet) -> Self {
        Self { payload, labels }
    }

    /// The opaque record as it appeared in the catalog source.
    pub fn payload(&self) -> &JsonValue {
        &self.payload
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Convenience accessor for the record's `id` field, if any.
    pub fn id(&self) -> Option<&JsonValue> {
        self.payload.get("id")
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

/// One product paired with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub product: &'a Product,
    #[serde(rename = "similarity_score")]
    pub score: f64,
}

/// Match results ordered by descending score, ties in catalog order.
pub type RankedResults<'a> = Vec<MatchResult<'a>>;
