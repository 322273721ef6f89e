use muralmap_scanner::fetcher::{DEFAULT_REQUEST_DELAY, DEFAULT_TIMEOUT};
use muralmap_scanner::{EnrichSettings, ListingSyntax};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LISTING_URL: &str = "https://localwiki.org/oakland/Murals";
pub const DEFAULT_SUPPLEMENTARY_PATH: &str = "extra_murals.csv";
pub const CREDIT_HELP_URL: &str =
    "https://andrewguenthner.com/help-oakland-art-murmur-identify-mural-artists/";

/// Field values shared by every scraped record.
#[derive(Debug, Clone)]
pub struct RecordDefaults {
    /// Something harmless for geocoders; the wiki has no street addresses.
    pub address: String,
    pub zoom: u32,
    pub icon: String,
    pub link: String,
    pub blank: u32,
    /// Popup for murals whose detail page was never fetched.
    pub unenriched_popup: String,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            address: "Oakland, CA".to_string(),
            zoom: 13,
            icon: "art_black_t.png".to_string(),
            link: String::new(),
            blank: 1,
            unenriched_popup: "not collected".to_string(),
        }
    }
}

/// The filler records that keep the marker ID range a fixed size.
#[derive(Debug, Clone)]
pub struct PlaceholderDefaults {
    pub name: String,
    pub popup: String,
    pub icon: String,
    /// Out in the bay, away from any real mural.
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for PlaceholderDefaults {
    fn default() -> Self {
        Self {
            name: "reserved".to_string(),
            popup: "reserved".to_string(),
            icon: "art_blank_t.png".to_string(),
            latitude: 37.8,
            longitude: -122.4,
        }
    }
}

/// Everything one pipeline run needs. Built fresh per request.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub listing_url: String,
    pub syntax: ListingSyntax,
    pub enrich: EnrichSettings,
    pub credit_help_url: String,

    /// First marker ID handed out. IDs below it belong to other map layers.
    pub id_offset: u32,
    /// Total records in every response, placeholders included.
    pub capacity: usize,
    pub primary_bucket: u32,
    pub secondary_bucket: u32,
    pub defaults: RecordDefaults,
    pub placeholder: PlaceholderDefaults,

    pub request_delay: Duration,
    pub fetch_timeout: Duration,
    /// Only the first N murals get their detail page fetched.
    pub max_enrichments: Option<usize>,
    pub supplementary_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            syntax: ListingSyntax::default(),
            enrich: EnrichSettings::default(),
            credit_help_url: CREDIT_HELP_URL.to_string(),
            id_offset: 707,
            capacity: 894,
            primary_bucket: 17,
            secondary_bucket: 21,
            defaults: RecordDefaults::default(),
            placeholder: PlaceholderDefaults::default(),
            request_delay: DEFAULT_REQUEST_DELAY,
            fetch_timeout: DEFAULT_TIMEOUT,
            max_enrichments: None,
            supplementary_path: Some(PathBuf::from(DEFAULT_SUPPLEMENTARY_PATH)),
        }
    }
}

impl PipelineConfig {
    /// Point the scrape at another wiki host. Detail links, image links, tag
    /// links and the fallback info page all follow the listing URL.
    pub fn with_listing_url(mut self, listing_url: &str) -> Self {
        self.listing_url = listing_url.to_string();
        self.enrich.fallback_info_url = listing_url.to_string();
        if let Ok(url) = url::Url::parse(listing_url) {
            let origin = url.origin().ascii_serialization();
            self.syntax.base_url = format!("{}{}", origin, self.syntax.path_marker);
            self.enrich.tag_namespace_url = format!("{}{}tags/", origin, self.syntax.path_marker);
            self.enrich.site_url = origin;
        }
        self
    }

    /// Capped so the ID band never runs past `u32::MAX`.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.min(self.id_space());
        self
    }

    pub fn with_id_offset(mut self, id_offset: u32) -> Self {
        self.id_offset = id_offset;
        self.capacity = self.capacity.min(self.id_space());
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_max_enrichments(mut self, limit: Option<usize>) -> Self {
        self.max_enrichments = limit;
        self
    }

    pub fn with_supplementary_path(mut self, path: Option<PathBuf>) -> Self {
        self.supplementary_path = path;
        self
    }

    /// Bucket for a mural: hidden ones go on the reserve map.
    pub fn map_bucket(&self, hidden: bool) -> u32 {
        if hidden {
            self.secondary_bucket
        } else {
            self.primary_bucket
        }
    }

    /// Last ID of the reserved range; `None` for zero capacity or a band
    /// that does not fit in `u32`.
    pub fn last_id(&self) -> Option<u32> {
        let span = u32::try_from(self.capacity.checked_sub(1)?).ok()?;
        self.id_offset.checked_add(span)
    }

    /// Number of IDs from `id_offset` up to `u32::MAX`.
    fn id_space(&self) -> usize {
        usize::try_from(u64::from(u32::MAX - self.id_offset) + 1).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_id_range() {
        let config = PipelineConfig::default();
        assert_eq!(config.id_offset, 707);
        assert_eq!(config.last_id(), Some(1600));
    }

    #[test]
    fn test_id_band_is_capped_at_u32_max() {
        let config = PipelineConfig::default()
            .with_id_offset(u32::MAX - 9)
            .with_capacity(usize::MAX);
        assert_eq!(config.capacity, 10);
        assert_eq!(config.last_id(), Some(u32::MAX));

        let shifted = PipelineConfig::default()
            .with_capacity(1000)
            .with_id_offset(u32::MAX - 1);
        assert_eq!(shifted.capacity, 2);
        assert_eq!(shifted.last_id(), Some(u32::MAX));
    }

    #[test]
    fn test_last_id_for_zero_capacity() {
        assert_eq!(PipelineConfig::default().with_capacity(0).last_id(), None);
    }

    #[test]
    fn test_map_bucket() {
        let config = PipelineConfig::default();
        assert_eq!(config.map_bucket(false), 17);
        assert_eq!(config.map_bucket(true), 21);
    }

    #[test]
    fn test_with_listing_url_rebases_links() {
        let config = PipelineConfig::default().with_listing_url("http://127.0.0.1:4000/oakland/Murals");

        assert_eq!(config.listing_url, "http://127.0.0.1:4000/oakland/Murals");
        assert_eq!(config.syntax.base_url, "http://127.0.0.1:4000/oakland/");
        assert_eq!(config.enrich.site_url, "http://127.0.0.1:4000");
        assert_eq!(
            config.enrich.tag_namespace_url,
            "http://127.0.0.1:4000/oakland/tags/"
        );
        assert_eq!(
            config.enrich.fallback_info_url,
            "http://127.0.0.1:4000/oakland/Murals"
        );
    }
}
