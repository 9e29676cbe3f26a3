//! Client for the Natural History Museum data portal's datastore search API.
//!
//! Build a [`SearchQuery`] (by hand or from a portal URL with
//! [`Api::from_url`]), then page through the results with the iterator
//! returned by [`Api::records`] or [`Api::assets`].

mod client;
pub mod config;
pub mod constants;
mod endpoints;
mod errors;
pub mod iterators;
mod query;
mod transport;
pub mod types;
pub mod url_params;
pub use self::client::{Api, ASSET_FIELDS};
pub use self::config::Config;
pub use self::constants::{asset_url, resources};
pub use self::endpoints::{Endpoint, DATASTORE_SEARCH};
pub use self::errors::Error;
pub use self::iterators::{AssetIterator, PagerState, ResultsIterator};
pub use self::query::{
    ParamValue, Params, Query, QueryCommon, SearchQuery, SortDirection, DEFAULT_LIMIT,
};
pub use self::transport::{HttpTransport, Transport};
