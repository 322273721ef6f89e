use crate::assemble::{EnrichedEntry, assemble};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::geojson::{FeatureCollection, to_feature_collection};
use crate::model::{DEFAULT_PROPERTIES, MuralRecord, RecordOrigin};
use crate::supplement::load_optional;
use indicatif::{ProgressBar, ProgressStyle};
use muralmap_scanner::{DetailInfo, Fetcher, Throttle, detail, extract_entries};
use std::sync::Arc;
use tracing::{info, warn};

/// Options for one scrape run
pub struct ScrapeOptions {
    pub config: PipelineConfig,
    pub show_progress_bars: bool,
}

/// Callback for reporting scrape progress
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeStats {
    pub segments_rejected: usize,
    pub scraped: usize,
    pub enriched: usize,
    pub enrichment_fallbacks: usize,
    pub unenriched: usize,
    pub hidden: usize,
    pub supplementary: usize,
    pub placeholders: usize,
    pub total: usize,
}

pub struct ScrapeOutcome {
    pub records: Vec<MuralRecord>,
    pub collection: FeatureCollection,
    pub stats: ScrapeStats,
}

/// Listing fetch, sequential throttled detail fetches, assembly, projection.
///
/// Only a failed listing fetch is an error. Bad segments, failed detail pages
/// and a missing supplementary file are absorbed and counted.
pub async fn execute_scrape(
    options: ScrapeOptions,
    progress_callback: Option<ScrapeProgressCallback>,
) -> Result<ScrapeOutcome> {
    let ScrapeOptions {
        config,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Fetching mural listing...");
        Some(pb)
    } else {
        None
    };
    let report = |msg: String| {
        if let Some(ref pb) = progress_bar {
            pb.set_message(msg.clone());
            pb.tick();
        }
        if let Some(ref callback) = progress_callback {
            callback(msg);
        }
    };

    let fetcher = Fetcher::with_timeout(config.fetch_timeout).map_err(PipelineError::Client)?;
    let mut throttle = Throttle::new(config.request_delay);

    info!("Fetching listing {}", config.listing_url);
    throttle.wait().await;
    let body = match fetcher.fetch_text(&config.listing_url).await {
        Ok(body) => body,
        Err(e) => {
            if let Some(ref pb) = progress_bar {
                pb.abandon_with_message("Listing page unavailable");
            }
            return Err(PipelineError::Upstream(e));
        }
    };

    let scan = extract_entries(&body, &config.syntax);
    let mut stats = ScrapeStats {
        segments_rejected: scan.malformed().count(),
        scraped: scan.entries.len(),
        ..ScrapeStats::default()
    };

    let limit = config.max_enrichments.unwrap_or(usize::MAX);
    let total = scan.entries.len();
    let mut items = Vec::with_capacity(total);
    for (idx, entry) in scan.entries.into_iter().enumerate() {
        if idx >= limit {
            stats.unenriched += 1;
            items.push(EnrichedEntry::new(entry, None));
            continue;
        }

        throttle.wait().await;
        report(format!("Enriching {}/{}: {}", idx + 1, total, entry.name));

        let info = match detail::enrich(&fetcher, &entry.detail_link, &config.enrich).await {
            Ok(info) => {
                stats.enriched += 1;
                info
            }
            Err(e) => {
                warn!("Falling back for {} ({}): {}", entry.name, entry.detail_link, e);
                stats.enrichment_fallbacks += 1;
                DetailInfo::fallback(&config.enrich)
            }
        };
        if info.is_hidden {
            stats.hidden += 1;
        }
        items.push(EnrichedEntry::new(entry, Some(info)));
    }

    let supplementary = load_optional(config.supplementary_path.as_deref());
    stats.supplementary = supplementary.len();

    let records = assemble(&config, items, supplementary);
    stats.placeholders = records
        .iter()
        .filter(|r| r.origin == RecordOrigin::Reserved)
        .count();
    stats.total = records.len();

    let collection = to_feature_collection(&records, &DEFAULT_PROPERTIES)?;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Scrape complete! {} murals, {} features",
            stats.scraped, stats.total
        ));
    }
    info!(
        "Scrape complete: {} scraped, {} supplementary, {} reserved",
        stats.scraped, stats.supplementary, stats.placeholders
    );

    Ok(ScrapeOutcome {
        records,
        collection,
        stats,
    })
}

/// Run the pipeline without progress output and return only the GeoJSON.
pub async fn scrape_feature_collection(config: PipelineConfig) -> Result<FeatureCollection> {
    let options = ScrapeOptions {
        config,
        show_progress_bars: false,
    };
    execute_scrape(options, None)
        .await
        .map(|outcome| outcome.collection)
}

/// Generate a plain-text summary of a run
pub fn generate_scrape_summary(stats: &ScrapeStats) -> String {
    let mut summary = String::new();
    summary.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    summary.push_str("# Summary:\n");
    summary.push_str(&format!("  Murals scraped: {}\n", stats.scraped));
    summary.push_str(&format!("  Detail pages enriched: {}\n", stats.enriched));
    summary.push_str(&format!(
        "  Detail pages failed (fallback used): {}\n",
        stats.enrichment_fallbacks
    ));
    if stats.unenriched > 0 {
        summary.push_str(&format!("  Not enriched (limit): {}\n", stats.unenriched));
    }
    summary.push_str(&format!("  Not currently visible: {}\n", stats.hidden));
    summary.push_str(&format!("  Malformed segments skipped: {}\n", stats.segments_rejected));
    summary.push_str(&format!("  Supplementary murals: {}\n", stats.supplementary));
    summary.push_str(&format!("  Reserved placeholders: {}\n", stats.placeholders));
    summary.push_str(&format!("  Total features: {}\n", stats.total));
    summary.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    summary
}
