use crate::error::ProjectionError;
use crate::model::MuralRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A row that can be placed on the map.
pub trait Tabular {
    /// `(longitude, latitude)`
    fn coordinates(&self) -> (f64, f64);
    fn field(&self, name: &str) -> Option<Value>;
}

impl Tabular for MuralRecord {
    fn coordinates(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }

    fn field(&self, name: &str) -> Option<Value> {
        MuralRecord::field(self, name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn empty() -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::empty()
    }
}

/// One Point feature per row, in input order. `properties` holds exactly the
/// named fields, in the given order. Coordinates pass through untouched.
pub fn to_feature_collection<R: Tabular>(
    rows: &[R],
    properties: &[&str],
) -> Result<FeatureCollection, ProjectionError> {
    let mut collection = FeatureCollection::empty();
    collection.features.reserve(rows.len());

    for row in rows {
        let mut props = Map::with_capacity(properties.len());
        for name in properties {
            let value = row
                .field(name)
                .ok_or_else(|| ProjectionError::UnknownField(name.to_string()))?;
            props.insert(name.to_string(), value);
        }

        let (longitude, latitude) = row.coordinates();
        collection.features.push(Feature {
            kind: "Feature".to_string(),
            properties: props,
            geometry: Geometry {
                kind: "Point".to_string(),
                coordinates: [longitude, latitude],
            },
        });
    }

    Ok(collection)
}
