use muralmap_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The listing page could not be fetched; nothing can be built.
    #[error("Listing page unavailable: {0}")]
    Upstream(#[source] ScanError),

    #[error("HTTP client setup failed: {0}")]
    Client(#[source] ScanError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

#[derive(Error, Debug)]
pub enum SupplementError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum ProjectionError {
    #[error("Unknown property field '{0}'")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
