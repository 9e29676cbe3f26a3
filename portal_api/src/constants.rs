//! Well-known portal URLs and resource identifiers.

/// Base URL of the portal's CKAN action API.
pub const BASE_URL: &str = "https://data.nhm.ac.uk/api/3";

/// Host that shareable portal search URLs must point at.
pub const PORTAL_HOST: &str = "data.nhm.ac.uk";

/// Preview URL template for media-store assets; `{id}` is replaced by the asset id.
pub const ASSET_URL_TEMPLATE: &str =
    "https://www.nhm.ac.uk/services/media-store/asset/{id}/contents/preview";

/// IDs for commonly searched resources.
pub mod resources {
    /// The specimen collection records.
    pub const SPECIMENS: &str = "05ff2255-c38a-40c9-b657-4ccb55ab2feb";
    /// The index lot records.
    pub const INDEX_LOTS: &str = "bb909597-dedf-427d-8c04-4c02b3a24db3";

    /// All named resources as `(name, id)` pairs.
    pub const ALL: &[(&str, &str)] = &[("specimens", SPECIMENS), ("indexlots", INDEX_LOTS)];

    /// Looks up a resource id by its short name (case-insensitive, `-`/`_` ignored).
    pub fn lookup(name: &str) -> Option<&'static str> {
        let wanted: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        ALL.iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, id)| *id)
    }
}

/// Builds the preview URL for a media-store asset.
pub fn asset_url(asset_id: &str) -> String {
    ASSET_URL_TEMPLATE.replace("{id}", asset_id)
}
