//! HTTP transport for the portal's CKAN action API.

use serde_json::Value;
use url::Url;

use crate::{config::Config, query::Params, Error};

/// Sends one GET request and returns the decoded JSON body.
///
/// Implementations return [`Error::HttpStatus`] for non-success statuses and
/// [`Error::RequestFailed`] for network failures or undecodable bodies.
pub trait Transport {
    fn get(&self, url: &str, credential: Option<&str>, params: &Params) -> Result<Value, Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, credential: Option<&str>, params: &Params) -> Result<Value, Error> {
        (**self).get(url, credential, params)
    }
}

/// Blocking HTTP transport backed by `reqwest`.
///
/// The underlying client is built once and shared by clones, so iterators
/// created from the same [`Api`](crate::Api) reuse its connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a transport with the timeout and user agent from `config`.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self { client })
    }

    fn get_url(url: &str, params: &Params) -> Result<Url, Error> {
        let url = Url::parse(url).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(params.add_to_url(&url))
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, credential: Option<&str>, params: &Params) -> Result<Value, Error> {
        let url = Self::get_url(url, params)?;
        let mut request = self
            .client
            .get(url.clone())
            .header("accept", "application/json");
        if let Some(credential) = credential {
            request = request.header("authorization", credential);
        }
        let resp = request.send().map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!(
                "HTTP request failed ({}) for {}: {}",
                status,
                url.path(),
                snippet
            );
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<Value>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_body;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_bodies_are_cut_on_a_char_boundary() {
        let body = "é".repeat(1500);
        let snippet = truncate_body(&body);
        assert!(snippet.ends_with("...[truncated]"));
        assert!(snippet.len() <= 2000 + "...[truncated]".len());
    }
}
