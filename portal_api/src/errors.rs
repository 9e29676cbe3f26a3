//! Error types for the portal client.

/// Errors that can occur when building or making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required parameter for an endpoint was not supplied.
    #[error("\"{0}\" is a required parameter")]
    MissingParameter(String),
    /// A parameter was supplied with a value of the wrong shape.
    #[error("Invalid value for \"{name}\": {reason}")]
    InvalidParameter { name: String, reason: String },
    /// A portal URL could not be turned into search parameters.
    #[error("Invalid portal URL: {0}")]
    InvalidUrl(String),
    /// The operation has no meaning for this kind of iterator.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
    /// The search returned no records where at least one was expected.
    #[error("No results")]
    NoResults,
    /// An HTTP request failed (network error, timeout, or undecodable body).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
