use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::asset_url;

/// A single datastore record: field name to JSON value.
pub type Record = Map<String, Value>;

/// The envelope every CKAN action wraps its result in.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// The `result` of a `datastore_search` call.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SearchResult {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub records: Option<Vec<Record>>,
}

/// One page of records together with the total size of the result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    pub records: Vec<Record>,
    pub total: u64,
}

/// The media attached to one record, paired with the record's id.
///
/// `asset` is the decoded `associatedMedia` value: usually an array of media
/// entries, sometimes a single entry object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AssetTuple {
    pub record_id: String,
    pub asset: Value,
}

impl AssetTuple {
    /// The individual media entries, whether `asset` is an array or a single object.
    pub fn media_items(&self) -> Vec<&Value> {
        match &self.asset {
            Value::Array(items) => items.iter().filter(|item| !item.is_null()).collect(),
            Value::Null => Vec::new(),
            single => vec![single],
        }
    }

    /// Media-store ids of the entries that carry one, in order.
    pub fn asset_ids(&self) -> Vec<String> {
        self.media_items().into_iter().filter_map(media_id).collect()
    }

    /// Preview URLs for every entry with a known id.
    pub fn preview_urls(&self) -> Vec<String> {
        self.asset_ids().iter().map(|id| asset_url(id)).collect()
    }
}

/// The media-store id of one media entry (`assetID`, falling back to `_id`).
pub fn media_id(entry: &Value) -> Option<String> {
    ["assetID", "_id"]
        .iter()
        .find_map(|key| entry.get(key))
        .and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
