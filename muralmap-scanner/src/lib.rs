pub mod detail;
pub mod error;
pub mod fetcher;
pub mod listing;
pub mod result;

pub use detail::{DetailPage, EnrichSettings, enrich};
pub use error::{ScanError, SegmentError};
pub use fetcher::{Fetcher, Throttle};
pub use listing::{ListingScan, ListingSyntax, extract_entries};
pub use result::{DetailInfo, ListingEntry};
