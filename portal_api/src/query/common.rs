//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] paging
//! fields, and [`SortDirection`].

use std::str::FromStr;

use super::Params;

/// Records per page when the caller does not choose a limit.
pub const DEFAULT_LIMIT: u64 = 100;

/// Trait implemented by all query builders. Provides conversion into endpoint
/// parameters and shared builder methods for paging.
pub trait Query {
    /// Returns the endpoint parameters (everything except paging) for this query.
    fn to_params(&self) -> Params;

    /// Returns the common paging fields.
    fn common(&self) -> &QueryCommon;

    /// Returns a mutable reference to the common paging fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Skips the first `offset` records.
    fn with_offset(mut self, offset: u64) -> Self
    where
        Self: Sized,
    {
        self.get_common().offset = offset;
        self
    }

    /// Sets the number of records per page.
    fn with_limit(mut self, limit: u64) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = limit;
        self
    }
}

/// Sort order for a sort clause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order. This is the default.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            }
        )
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

/// Paging fields shared by all query types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryCommon {
    /// Records to skip before the first page. Defaults to 0.
    pub offset: u64,
    /// Records per page. Defaults to [`DEFAULT_LIMIT`].
    pub limit: u64,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}
