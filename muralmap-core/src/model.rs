use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property columns the map software expects, in order.
pub const DEFAULT_PROPERTIES: [&str; 9] = [
    "id", "name", "address", "zoom", "icon", "popup", "link", "blank", "maps",
];

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOrigin {
    Scraped,
    Supplementary,
    Reserved,
}

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuralRecord {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Wiki page the record was scraped from; empty for other origins.
    pub detail_link: String,
    pub address: String,
    pub zoom: u32,
    pub icon: String,
    pub popup: String,
    pub link: String,
    pub blank: u32,
    pub maps: u32,
    pub origin: RecordOrigin,
}

impl MuralRecord {
    /// Value of a named column, using the map software's column names.
    pub fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => Value::from(self.id),
            "name" => Value::from(self.name.as_str()),
            "latitude" => Value::from(self.latitude),
            "longitude" => Value::from(self.longitude),
            "detail_link" => Value::from(self.detail_link.as_str()),
            "address" => Value::from(self.address.as_str()),
            "zoom" => Value::from(self.zoom),
            "icon" => Value::from(self.icon.as_str()),
            "popup" => Value::from(self.popup.as_str()),
            "link" => Value::from(self.link.as_str()),
            "blank" => Value::from(self.blank),
            "maps" => Value::from(self.maps),
            _ => return None,
        };
        Some(value)
    }

    pub fn is_reserved(&self) -> bool {
        self.origin == RecordOrigin::Reserved
    }
}
