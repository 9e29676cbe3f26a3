#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;

use portal_api::{Error, Params, Transport};
use serde_json::{json, Value};

/// In-memory datastore that answers offset/limit searches over a fixed record list.
pub struct FakePortal {
    records: Vec<Value>,
    /// Request indexes (0-based) that fail with HTTP 500.
    failing: HashSet<usize>,
    pub requests: RefCell<Vec<(Option<String>, Params)>>,
}

impl FakePortal {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            failing: HashSet::new(),
            requests: RefCell::default(),
        }
    }

    /// `n` records with ids `1..=n` and no media.
    pub fn numbered(n: u64) -> Self {
        Self::new((1..=n).map(|id| json!({ "_id": id, "genus": "Musa" })).collect())
    }

    pub fn failing_on(mut self, request_index: usize) -> Self {
        self.failing.insert(request_index);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn param(&self, request_index: usize, key: &str) -> Option<String> {
        self.requests.borrow()[request_index]
            .1
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    pub fn credential(&self, request_index: usize) -> Option<String> {
        self.requests.borrow()[request_index].0.clone()
    }
}

impl Transport for FakePortal {
    fn get(&self, _url: &str, credential: Option<&str>, params: &Params) -> Result<Value, Error> {
        let index = self.request_count();
        self.requests
            .borrow_mut()
            .push((credential.map(str::to_string), params.clone()));
        if self.failing.contains(&index) {
            return Err(Error::HttpStatus {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }

        let number = |key: &str, default: usize| {
            params
                .get(key)
                .and_then(|v| v.as_str())
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(default)
        };
        let offset = number("offset", 0);
        let limit = number("limit", 100);
        let page: Vec<Value> = self
            .records
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(json!({
            "help": "https://data.nhm.ac.uk/api/3/action/help_show?name=datastore_search",
            "success": true,
            "result": {
                "total": self.records.len(),
                "records": page,
            }
        }))
    }
}

pub fn ids(records: &[serde_json::Map<String, Value>]) -> Vec<u64> {
    records.iter().filter_map(|r| r["_id"].as_u64()).collect()
}
