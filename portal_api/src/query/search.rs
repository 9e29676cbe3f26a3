use serde_json::{Map, Value};

use crate::Error;

use super::{
    common::{QueryCommon, SortDirection},
    ParamValue, Params, Query,
};

/// A datastore search over one resource.
///
/// Every key of the resulting `filters` object is a record attribute; values
/// are matched exactly by the portal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchQuery {
    pub common: QueryCommon,
    pub resource_id: Option<String>,
    pub query: Option<String>,
    pub sort: Vec<String>,
    pub fields: Vec<String>,
    pub filters: Map<String, Value>,
}

impl Query for SearchQuery {
    fn common(&self) -> &QueryCommon {
        &self.common
    }
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(resource_id) = &self.resource_id {
            params.insert("resource_id", resource_id.as_str());
        }
        if let Some(query) = &self.query {
            params.insert("q", query.as_str());
        }
        if !self.filters.is_empty() {
            params.insert("filters", self.filters.clone());
        }
        if !self.sort.is_empty() {
            params.insert("sort", self.sort.clone());
        }
        if !self.fields.is_empty() {
            params.insert("fields", self.fields.clone());
        }
        params
    }
}

impl SearchQuery {
    /// Creates a query over the given resource.
    pub fn new(resource_id: &str) -> Self {
        Self::default().with_resource_id(resource_id)
    }

    pub fn with_resource_id(mut self, resource_id: &str) -> Self {
        self.resource_id = Some(resource_id.to_string());
        self
    }

    /// Free text search across all fields.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    /// Adds a raw sort clause such as `"genus desc"`.
    pub fn with_sort(mut self, clause: &str) -> Self {
        self.sort.push(clause.to_string());
        self
    }
    pub fn with_sorts(mut self, clauses: &[String]) -> Self {
        self.sort.extend_from_slice(clauses);
        self
    }
    pub fn with_sort_field(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort.push(format!("{} {}", field, direction));
        self
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.fields.push(field.to_string());
        self
    }
    pub fn with_fields(mut self, fields: &[String]) -> Self {
        self.fields.extend_from_slice(fields);
        self
    }

    /// Filters records on an exact attribute value.
    pub fn with_filter(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(key.to_string(), value.into());
        self
    }
}

/// Builds a query from keyword parameters such as those produced by
/// [`extract`](crate::url_params::extract). `resource_id`, `query`, `sort`,
/// `fields`, `offset` and `limit` are recognised; every other key is a filter.
impl TryFrom<Params> for SearchQuery {
    type Error = Error;

    fn try_from(params: Params) -> Result<Self, Self::Error> {
        let mut query = SearchQuery::default();
        for (key, value) in params {
            match key.as_str() {
                "resource_id" => query.resource_id = Some(expect_scalar(&key, value)?),
                "query" | "q" => query.query = Some(expect_scalar(&key, value)?),
                "sort" => query.sort.extend(into_list(&key, value)?),
                "fields" => query.fields.extend(into_list(&key, value)?),
                "offset" => query.common.offset = parse_count(&key, value)?,
                "limit" => query.common.limit = parse_count(&key, value)?,
                _ => {
                    query.filters.insert(key, value.into_json());
                }
            }
        }
        Ok(query)
    }
}

fn expect_scalar(key: &str, value: ParamValue) -> Result<String, Error> {
    match value {
        ParamValue::Scalar(s) => Ok(s),
        _ => Err(Error::InvalidParameter {
            name: key.to_string(),
            reason: "expected a single value".to_string(),
        }),
    }
}

fn into_list(key: &str, value: ParamValue) -> Result<Vec<String>, Error> {
    match value {
        ParamValue::Scalar(s) => Ok(vec![s]),
        ParamValue::List(items) => Ok(items),
        ParamValue::Structured(_) => Err(Error::InvalidParameter {
            name: key.to_string(),
            reason: "expected a list of values".to_string(),
        }),
    }
}

fn parse_count(key: &str, value: ParamValue) -> Result<u64, Error> {
    let text = expect_scalar(key, value)?;
    text.trim().parse::<u64>().map_err(|_| Error::InvalidParameter {
        name: key.to_string(),
        reason: format!("\"{}\" is not a non-negative integer", text),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::query::{ParamValue, Params, Query, SearchQuery, SortDirection};
    use crate::Error;

    #[test]
    fn test_search_query_params() {
        let query = SearchQuery::new("abc")
            .with_query("banana")
            .with_sort_field("genus", SortDirection::Desc)
            .with_field("genus")
            .with_fields(&["family".to_string()])
            .with_filter("country", "australia")
            .with_offset(10)
            .with_limit(5);

        let params = query.to_params();
        assert_eq!(params.get("resource_id"), Some(&ParamValue::from("abc")));
        assert_eq!(params.get("q"), Some(&ParamValue::from("banana")));
        assert_eq!(
            params.get("sort").and_then(|v| v.as_list()),
            Some(&["genus desc".to_string()][..])
        );
        assert_eq!(
            params.get("fields").and_then(|v| v.as_list()),
            Some(&["genus".to_string(), "family".to_string()][..])
        );
        match params.get("filters") {
            Some(ParamValue::Structured(map)) => assert_eq!(map["country"], json!("australia")),
            other => panic!("unexpected filters: {:?}", other),
        }
        // paging is owned by the iterator, not the endpoint parameters
        assert!(!params.contains_key("offset"));
        assert_eq!(query.common().offset, 10);
        assert_eq!(query.common().limit, 5);
    }

    #[test]
    fn empty_query_has_no_params() {
        assert!(SearchQuery::default().to_params().is_empty());
    }

    #[test]
    fn try_from_params_splits_filters_from_reserved_keys() {
        let params = Params::new()
            .with("resource_id", "abc")
            .with("query", "banana")
            .with("sort", vec!["genus desc".to_string()])
            .with("fields", "genus")
            .with("limit", "25")
            .with("collectionCode", "bot");

        let query = SearchQuery::try_from(params).unwrap();
        assert_eq!(query.resource_id.as_deref(), Some("abc"));
        assert_eq!(query.query.as_deref(), Some("banana"));
        assert_eq!(query.sort, vec!["genus desc".to_string()]);
        assert_eq!(query.fields, vec!["genus".to_string()]);
        assert_eq!(query.common.limit, 25);
        assert_eq!(query.filters.get("collectionCode"), Some(&json!("bot")));
    }

    #[test]
    fn try_from_params_rejects_bad_offset() {
        let params = Params::new().with("offset", "-3");
        match SearchQuery::try_from(params) {
            Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, "offset"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }
}
