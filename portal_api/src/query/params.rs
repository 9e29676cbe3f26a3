//! Request parameter values and the ordered parameter map sent with each request.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde_json::{Map, Value};
use url::Url;

/// A single parameter value.
///
/// Structured values are only valid before they pass through
/// [`Endpoint::format_params`](crate::Endpoint::format_params), which turns
/// them into JSON text.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A plain string value.
    Scalar(String),
    /// An ordered list, sent as one query pair per element.
    List(Vec<String>),
    /// A JSON object, e.g. the `filters` of a datastore search.
    Structured(Map<String, Value>),
}

impl ParamValue {
    /// Serializes structured values to JSON text; other values are returned unchanged.
    pub fn serialized(self) -> ParamValue {
        match self {
            ParamValue::Structured(map) => ParamValue::Scalar(Value::Object(map).to_string()),
            other => other,
        }
    }

    /// Converts the value to JSON: a string, an array of strings, or an object.
    pub fn into_json(self) -> Value {
        match self {
            ParamValue::Scalar(s) => Value::String(s),
            ParamValue::List(items) => Value::Array(items.into_iter().map(Value::String).collect()),
            ParamValue::Structured(map) => Value::Object(map),
        }
    }

    /// Returns the scalar string, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    fn push_pairs(&self, key: &str, pairs: &mut Vec<(String, String)>) {
        match self {
            ParamValue::Scalar(s) => pairs.push((key.to_string(), s.clone())),
            ParamValue::List(items) => {
                for item in items {
                    pairs.push((key.to_string(), item.clone()));
                }
            }
            ParamValue::Structured(map) => {
                pairs.push((key.to_string(), Value::Object(map.clone()).to_string()))
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl From<&[&str]> for ParamValue {
    fn from(value: &[&str]) -> Self {
        ParamValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Map<String, Value>> for ParamValue {
    fn from(value: Map<String, Value>) -> Self {
        ParamValue::Structured(value)
    }
}

/// Named request parameters, kept in key order so requests are reproducible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    /// Flattens the parameters into `(key, value)` query pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in self.0.iter() {
            value.push_pairs(key, &mut pairs);
        }
        pairs
    }

    /// Appends these parameters to the given URL, returning the modified URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let pairs = self.to_query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
