// Hand-curated murals that are not on the wiki listing, read from a CSV file
// with the same columns as the GeoJSON properties plus latitude/longitude.

use crate::error::SupplementError;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplementaryRecord {
    /// Ignored when assembling; supplementary records are numbered after the
    /// scraped ones.
    #[serde(default)]
    pub id: Option<u32>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub zoom: Option<u32>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub popup: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub blank: Option<u32>,
    #[serde(default)]
    pub maps: Option<u32>,
}

pub fn read_supplementary<R: Read>(reader: R) -> Result<Vec<SupplementaryRecord>, SupplementError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.headers()?;

    let mut records = Vec::new();
    for (row, result) in csv_reader.deserialize::<SupplementaryRecord>().enumerate() {
        match result {
            Ok(record) if record.latitude.is_finite() && record.longitude.is_finite() => {
                records.push(record)
            }
            Ok(record) => warn!(
                "Skipping supplementary row {} ({}): non-finite coordinates",
                row + 1,
                record.name
            ),
            Err(e) => warn!("Skipping supplementary row {}: {}", row + 1, e),
        }
    }
    Ok(records)
}

pub fn load_supplementary(path: &Path) -> Result<Vec<SupplementaryRecord>, SupplementError> {
    let file = File::open(path)?;
    read_supplementary(file)
}

/// Supplementary records if the file is there and readable, nothing otherwise.
pub fn load_optional(path: Option<&Path>) -> Vec<SupplementaryRecord> {
    let Some(path) = path else {
        return Vec::new();
    };

    match load_supplementary(path) {
        Ok(records) => {
            info!(
                "Loaded {} supplementary murals from {}",
                records.len(),
                path.display()
            );
            records
        }
        Err(e) => {
            debug!("No supplementary murals from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
