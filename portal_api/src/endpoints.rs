//! Registry of portal API actions and their parameter contracts.

use crate::{query::Params, Error};

/// One CKAN action exposed by the portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// The action name, i.e. the last path segment of the action URL.
    pub action: &'static str,
    /// Whether the action needs an API key.
    pub requires_auth: bool,
    /// Whether the result carries an iterable `records` list.
    pub has_records: bool,
    /// Parameters that must be present in every request.
    pub required_params: &'static [&'static str],
    /// Parameters that may be present.
    pub optional_params: &'static [&'static str],
}

/// Searches the records of a datastore resource.
pub const DATASTORE_SEARCH: Endpoint = Endpoint {
    action: "datastore_search",
    requires_auth: false,
    has_records: true,
    required_params: &["resource_id"],
    optional_params: &["q", "filters", "sort", "fields"],
};

impl Endpoint {
    /// Returns the action URL under the given API base URL.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/action/{}", base_url.trim_end_matches('/'), self.action)
    }

    /// Checks the supplied parameters against this endpoint's contract.
    ///
    /// Required parameters must all be present; the first missing one is
    /// reported. Optional parameters are copied when supplied and skipped
    /// otherwise. Undeclared keys are dropped and structured values are
    /// serialized to JSON text.
    pub fn format_params(&self, params: &Params) -> Result<Params, Error> {
        let mut formatted = Params::new();
        for name in self.required_params {
            match params.get(name) {
                Some(value) => formatted.insert(*name, value.clone().serialized()),
                None => return Err(Error::MissingParameter(name.to_string())),
            }
        }
        for name in self.optional_params {
            match params.get(name) {
                Some(value) => formatted.insert(*name, value.clone().serialized()),
                None => tracing::debug!("Optional parameter \"{}\" not found.", name),
            }
        }
        Ok(formatted)
    }
}
