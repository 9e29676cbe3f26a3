//! Extraction of search parameters from shareable portal search URLs.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::{constants::PORTAL_HOST, query::Params, Error};

const RESOURCE_MARKER: &str = "/resource/";
const FILTER_SEPARATOR: char = '|';
const LIST_SEPARATOR: char = ',';

/// Turns a portal search-page URL into keyword parameters for a search.
///
/// The whole URL is percent-decoded before parsing, so a query string the
/// portal encoded as a single value (`sort=genus%20desc%26fields%3D...`)
/// yields separate parameters. The returned keys are `resource_id`, `query`,
/// `sort`, `fields`, plus one key per `filters` entry. Only the first
/// occurrence of each query parameter counts and blank values are ignored.
pub fn extract(url: &str) -> Result<Params, Error> {
    let decoded = percent_decode_str(url).decode_utf8_lossy();
    let parsed = Url::parse(&decoded)
        .map_err(|e| Error::InvalidUrl(format!("\"{}\" could not be parsed: {}", url, e)))?;

    match parsed.host_str() {
        Some(host) if host == PORTAL_HOST => {}
        other => {
            return Err(Error::InvalidUrl(format!(
                "Host must be \"{}\", not \"{}\".",
                PORTAL_HOST,
                other.unwrap_or_default()
            )))
        }
    }

    let path = parsed.path();
    let resource_id = match path.rsplit_once(RESOURCE_MARKER) {
        Some((_, id)) if !id.trim_end_matches('/').is_empty() => id.trim_end_matches('/'),
        _ => {
            return Err(Error::InvalidUrl(format!(
                "\"{}\" is not a resource URL.",
                path
            )))
        }
    };

    let mut extracted = Params::new();
    extracted.insert("resource_id", resource_id);

    if let Some(filters) = first_value(&parsed, "filters") {
        for pair in filters.split(FILTER_SEPARATOR).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once(':').ok_or_else(|| {
                Error::InvalidUrl(format!("filter \"{}\" is not a key:value pair.", pair))
            })?;
            extracted.insert(key, value);
        }
    }
    if let Some(q) = first_value(&parsed, "q") {
        extracted.insert("query", q);
    }
    if let Some(sort) = first_value(&parsed, "sort") {
        extracted.insert("sort", split_list(&sort));
    }
    if let Some(fields) = first_value(&parsed, "fields") {
        extracted.insert("fields", split_list(&fields));
    }

    Ok(extracted)
}

fn first_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

fn split_list(value: &str) -> Vec<String> {
    value.split(LIST_SEPARATOR).map(str::to_string).collect()
}
