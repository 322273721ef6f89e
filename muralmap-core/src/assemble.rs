// Turns scraped entries into map records, appends the curated extras and pads
// the set with reserved placeholders up to the configured capacity.

use crate::config::PipelineConfig;
use crate::model::{MuralRecord, RecordOrigin};
use crate::popup::render_popup;
use crate::supplement::SupplementaryRecord;
use muralmap_scanner::{DetailInfo, ListingEntry};
use tracing::{debug, warn};

/// A listing entry and, if its page was fetched, what the page said.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEntry {
    pub entry: ListingEntry,
    pub detail: Option<DetailInfo>,
}

impl EnrichedEntry {
    pub fn new(entry: ListingEntry, detail: Option<DetailInfo>) -> Self {
        Self { entry, detail }
    }
}

/// Hands out marker IDs in order. The only source of IDs during assembly.
/// `None` once `u32::MAX` has been handed out.
#[derive(Debug)]
struct IdAllocator {
    next: Option<u32>,
}

impl IdAllocator {
    fn starting_at(first: u32) -> Self {
        Self { next: Some(first) }
    }

    fn next_id(&mut self) -> Option<u32> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }
}

pub struct RecordAssembler<'a> {
    config: &'a PipelineConfig,
    ids: IdAllocator,
    records: Vec<MuralRecord>,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            ids: IdAllocator::starting_at(config.id_offset),
            records: Vec::new(),
        }
    }

    pub fn push_scraped(&mut self, item: EnrichedEntry) {
        let EnrichedEntry { entry, detail } = item;
        let Some(id) = self.ids.next_id() else {
            warn!("Marker IDs exhausted; dropping {}", entry.name);
            return;
        };
        let defaults = &self.config.defaults;

        let (popup, hidden) = match &detail {
            Some(detail) => (
                render_popup(
                    &entry.detail_link,
                    &entry.name,
                    detail,
                    &self.config.credit_help_url,
                ),
                detail.is_hidden,
            ),
            None => (defaults.unenriched_popup.clone(), false),
        };

        let record = MuralRecord {
            id,
            name: entry.name,
            latitude: entry.latitude,
            longitude: entry.longitude,
            detail_link: entry.detail_link,
            address: defaults.address.clone(),
            zoom: defaults.zoom,
            icon: defaults.icon.clone(),
            popup,
            link: defaults.link.clone(),
            blank: defaults.blank,
            maps: self.config.map_bucket(hidden),
            origin: RecordOrigin::Scraped,
        };
        self.records.push(record);
    }

    pub fn push_supplementary(&mut self, row: SupplementaryRecord) {
        let defaults = &self.config.defaults;
        let Some(id) = self.ids.next_id() else {
            warn!("Marker IDs exhausted; dropping {}", row.name);
            return;
        };
        if let Some(given) = row.id
            && given != id
        {
            debug!("Supplementary mural {} renumbered {} -> {}", row.name, given, id);
        }

        self.records.push(MuralRecord {
            id,
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            detail_link: String::new(),
            address: row.address.unwrap_or_else(|| defaults.address.clone()),
            zoom: row.zoom.unwrap_or(defaults.zoom),
            icon: row.icon.unwrap_or_else(|| defaults.icon.clone()),
            popup: row.popup.unwrap_or_default(),
            link: row.link.unwrap_or_else(|| defaults.link.clone()),
            blank: row.blank.unwrap_or(defaults.blank),
            maps: row.maps.unwrap_or(self.config.primary_bucket),
            origin: RecordOrigin::Supplementary,
        });
    }

    fn push_placeholder(&mut self) -> bool {
        let Some(id) = self.ids.next_id() else {
            return false;
        };
        let placeholder = &self.config.placeholder;
        let record = MuralRecord {
            id,
            name: placeholder.name.clone(),
            latitude: placeholder.latitude,
            longitude: placeholder.longitude,
            detail_link: String::new(),
            address: self.config.defaults.address.clone(),
            zoom: self.config.defaults.zoom,
            icon: placeholder.icon.clone(),
            popup: placeholder.popup.clone(),
            link: self.config.listing_url.clone(),
            blank: self.config.defaults.blank,
            maps: self.config.secondary_bucket,
            origin: RecordOrigin::Reserved,
        };
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pad with placeholders up to capacity and hand back the records.
    pub fn finish(mut self) -> Vec<MuralRecord> {
        let capacity = self.config.capacity;
        if self.records.len() > capacity {
            warn!(
                "{} murals exceed the reserved capacity of {}; no placeholders added",
                self.records.len(),
                capacity
            );
        }
        while self.records.len() < capacity {
            if !self.push_placeholder() {
                warn!("Marker IDs exhausted after {} records", self.records.len());
                break;
            }
        }
        self.records
    }
}

/// Scraped entries first, then supplementary rows, then placeholders.
pub fn assemble(
    config: &PipelineConfig,
    items: Vec<EnrichedEntry>,
    supplementary: Vec<SupplementaryRecord>,
) -> Vec<MuralRecord> {
    let mut assembler = RecordAssembler::new(config);
    for item in items {
        assembler.push_scraped(item);
    }
    for row in supplementary {
        assembler.push_supplementary(row);
    }
    assembler.finish()
}
