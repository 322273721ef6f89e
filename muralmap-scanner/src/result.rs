use crate::detail::EnrichSettings;

/// One mural decoded from a geometry segment of the listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub detail_link: String,
}

/// What a detail page says about its mural.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailInfo {
    pub image_url: String,
    pub image_info_url: String,
    pub artist_name: Option<String>,
    pub artist_link: Option<String>,
    pub is_hidden: bool,
}

impl DetailInfo {
    /// Used when the detail page could not be fetched or parsed.
    pub fn fallback(settings: &EnrichSettings) -> Self {
        Self {
            image_url: settings.fallback_image_url.clone(),
            image_info_url: settings.fallback_info_url.clone(),
            artist_name: None,
            artist_link: None,
            is_hidden: false,
        }
    }
}
