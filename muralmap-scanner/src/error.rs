use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Why a single geometry segment of the listing page was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    #[error("no anchor boundary ('>') in segment")]
    MissingAnchorBoundary,

    #[error("label does not end with the anchor closure '</a'")]
    MissingLabelClosure,

    #[error("label is empty")]
    EmptyName,

    #[error("no longitude sign character")]
    MissingSign,

    #[error("missing {0} token")]
    MissingToken(&'static str),

    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("no detail link marker '{0}'")]
    MissingLinkMarker(String),

    #[error("empty detail link fragment")]
    EmptyLink,
}
