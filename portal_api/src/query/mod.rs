mod common;
pub use self::common::{Query, QueryCommon, SortDirection, DEFAULT_LIMIT};

mod params;
pub use self::params::{ParamValue, Params};

mod search;
pub use self::search::SearchQuery;
