use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered filter document.
///
/// Keys keep their insertion order, both in memory and when serialized,
/// since document-store drivers treat filter key order as significant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document(Vec<(String, FilterValue)>);

impl Document {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a key; an existing key with the same name is kept as well.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FilterValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Document {
    type Item = (String, FilterValue);
    type IntoIter = std::vec::IntoIter<(String, FilterValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A value stored in a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Document(Document),
    Array(Vec<Document>),
    String(String),
    Int(i64),
    Bool(bool),
    DateTime(DateTime<Utc>),
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterValue::Document(document) => document.serialize(serializer),
            FilterValue::Array(documents) => documents.serialize(serializer),
            FilterValue::String(value) => serializer.serialize_str(value),
            FilterValue::Int(value) => serializer.serialize_i64(*value),
            FilterValue::Bool(value) => serializer.serialize_bool(*value),
            // Extended JSON form understood by document-store tooling.
            FilterValue::DateTime(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$date", &value.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
                map.end()
            }
        }
    }
}

impl From<Document> for FilterValue {
    fn from(value: Document) -> Self {
        FilterValue::Document(value)
    }
}

impl From<Vec<Document>> for FilterValue {
    fn from(value: Vec<Document>) -> Self {
        FilterValue::Array(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        FilterValue::DateTime(value)
    }
}

/// Builds a [`Document`] from `key => value` pairs, keeping their order.
///
/// ```
/// use filter_query::doc;
///
/// let filter = doc! { "$and" => vec![doc! { "a" => "x" }, doc! { "b" => 1i64 }] };
/// assert_eq!(filter.keys().collect::<Vec<_>>(), vec!["$and"]);
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::compiler::Document::new()
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut document = $crate::compiler::Document::new();
        $( document.insert($key, $value); )+
        document
    }};
}
