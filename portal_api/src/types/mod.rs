mod search;
pub use self::search::{media_id, AssetTuple, Record, ResultPage, SearchResponse, SearchResult};
