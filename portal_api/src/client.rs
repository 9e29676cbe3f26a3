//! Entry point for searching the portal.

use serde_json::Value;

use crate::{
    config::Config,
    endpoints::{Endpoint, DATASTORE_SEARCH},
    iterators::{AssetIterator, ResultsIterator},
    query::{Query, SearchQuery},
    transport::{HttpTransport, Transport},
    url_params, Error,
};

/// Fields requested by [`Api::assets`]: the record id and its media.
pub const ASSET_FIELDS: &[&str] = &["_id", "associatedMedia"];

/// Search client for the data portal.
///
/// Binds an optional API key and a transport; every search returns a fresh
/// iterator that owns its own paging state.
#[derive(Clone, Debug)]
pub struct Api<T = HttpTransport> {
    key: Option<String>,
    base_url: String,
    transport: T,
}

impl Api<HttpTransport> {
    /// Creates a client for the production portal.
    pub fn new(api_key: Option<String>) -> Result<Self, Error> {
        let config = Config {
            api_key,
            ..Config::default()
        };
        Self::from_config(&config)
    }

    /// Creates a client from an explicit configuration.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            transport: HttpTransport::new(config)?,
        })
    }

    /// Extracts search parameters from a portal search-page URL.
    pub fn from_url(url: &str) -> Result<SearchQuery, Error> {
        SearchQuery::try_from(url_params::extract(url)?)
    }
}

impl<T: Transport + Clone> Api<T> {
    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(api_key: Option<String>, transport: T) -> Self {
        Self {
            key: api_key,
            base_url: crate::constants::BASE_URL.to_string(),
            transport,
        }
    }

    /// Points the client at another API base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// The API key sent with every request, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Searches for records in a resource.
    pub fn records(&self, query: &SearchQuery) -> Result<ResultsIterator<T>, Error> {
        self.result_iterator(&DATASTORE_SEARCH, query)
    }

    /// Searches for the media attached to records in a resource. Only records
    /// with images are requested, and only their id and media fields.
    pub fn assets(&self, query: &SearchQuery) -> Result<AssetIterator<T>, Error> {
        let mut query = query.clone();
        query
            .filters
            .insert("_has_image".to_string(), Value::Bool(true));
        query.fields = ASSET_FIELDS.iter().map(|f| f.to_string()).collect();
        let records = self.result_iterator(&DATASTORE_SEARCH, &query)?;
        Ok(AssetIterator::new(records))
    }

    fn result_iterator(
        &self,
        endpoint: &Endpoint,
        query: &impl Query,
    ) -> Result<ResultsIterator<T>, Error> {
        if endpoint.requires_auth && self.key.is_none() {
            return Err(Error::MissingParameter("api_key".to_string()));
        }
        let mut params = endpoint.format_params(&query.to_params())?;
        let common = query.common();
        params.insert("limit", common.limit);
        Ok(ResultsIterator::new(
            self.transport.clone(),
            endpoint.url(&self.base_url),
            self.key.clone(),
            common.offset,
            params,
        )
        .with_records(endpoint.has_records))
    }
}
