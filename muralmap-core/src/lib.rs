pub mod assemble;
pub mod config;
pub mod error;
pub mod geojson;
pub mod model;
pub mod popup;
pub mod scrape;
pub mod supplement;

pub use config::PipelineConfig;
pub use error::{PipelineError, ProjectionError, SupplementError};
pub use geojson::{Feature, FeatureCollection, Tabular, to_feature_collection};
pub use model::{DEFAULT_PROPERTIES, MuralRecord, RecordOrigin};
pub use scrape::{ScrapeOptions, ScrapeOutcome, ScrapeStats, execute_scrape, scrape_feature_collection};
