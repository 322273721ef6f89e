// Tests for GeoJSON projection

use muralmap_core::assemble::{EnrichedEntry, assemble};
use muralmap_core::config::PipelineConfig;
use muralmap_core::error::ProjectionError;
use muralmap_core::geojson::{FeatureCollection, Tabular, to_feature_collection};
use muralmap_core::model::DEFAULT_PROPERTIES;
use muralmap_scanner::ListingEntry;
use serde_json::{Value, json};

struct Row {
    lon: f64,
    lat: f64,
    label: &'static str,
}

impl Tabular for Row {
    fn coordinates(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "label" => Some(json!(self.label)),
            "lat" => Some(json!(self.lat)),
            _ => None,
        }
    }
}

#[test]
fn test_coordinates_are_longitude_first() {
    let rows = [Row {
        lon: -122.27,
        lat: 37.8,
        label: "a",
    }];

    let collection = to_feature_collection(&rows, &["label"]).unwrap();

    assert_eq!(collection.features[0].geometry.coordinates, [-122.27, 37.8]);
    assert_eq!(collection.features[0].geometry.kind, "Point");
}

#[test]
fn test_properties_in_requested_order_only() {
    let rows = [Row {
        lon: -1.0,
        lat: 2.0,
        label: "x",
    }];

    let collection = to_feature_collection(&rows, &["lat", "label"]).unwrap();
    let keys: Vec<&String> = collection.features[0].properties.keys().collect();

    assert_eq!(keys, vec!["lat", "label"]);
}

#[test]
fn test_unknown_field_is_error() {
    let rows = [Row {
        lon: -1.0,
        lat: 2.0,
        label: "x",
    }];

    let result = to_feature_collection(&rows, &["label", "colour"]);

    assert_eq!(
        result.unwrap_err(),
        ProjectionError::UnknownField("colour".to_string())
    );
}

#[test]
fn test_empty_input_gives_empty_collection() {
    let rows: [Row; 0] = [];
    let collection = to_feature_collection(&rows, &["label"]).unwrap();
    assert_eq!(collection, FeatureCollection::empty());
}

#[test]
fn test_serialized_shape() {
    let config = PipelineConfig::default().with_capacity(2);
    let records = assemble(
        &config,
        vec![EnrichedEntry::new(
            ListingEntry {
                name: "Mural A".to_string(),
                latitude: 37.8,
                longitude: -122.27,
                detail_link: "https://localwiki.org/oakland/MuralA".to_string(),
            },
            None,
        )],
        vec![],
    );

    let collection = to_feature_collection(&records, &DEFAULT_PROPERTIES).unwrap();
    let text = serde_json::to_string(&collection).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"].as_array().unwrap().len(), 2);
    assert_eq!(value["features"][0]["type"], "Feature");
    assert_eq!(
        value["features"][0]["geometry"],
        json!({"type": "Point", "coordinates": [-122.27, 37.8]})
    );
    assert_eq!(
        value["features"][0]["properties"],
        json!({
            "id": 707,
            "name": "Mural A",
            "address": "Oakland, CA",
            "zoom": 13,
            "icon": "art_black_t.png",
            "popup": "not collected",
            "link": "",
            "blank": 1,
            "maps": 17
        })
    );
    assert_eq!(value["features"][1]["properties"]["name"], "reserved");

    let property_order: Vec<&str> = collection.features[0]
        .properties
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(property_order, DEFAULT_PROPERTIES.to_vec());
}

#[test]
fn test_collection_round_trips_through_serde() {
    let config = PipelineConfig::default().with_capacity(3);
    let records = assemble(&config, vec![], vec![]);
    let collection = to_feature_collection(&records, &DEFAULT_PROPERTIES).unwrap();

    let text = serde_json::to_string(&collection).unwrap();
    let parsed: FeatureCollection = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed, collection);
}
