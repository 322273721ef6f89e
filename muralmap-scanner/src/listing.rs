// Coordinate extraction from the raw LocalWiki listing page.
//
// The map widget on the listing page embeds each mural as a JSON-ish pair:
//
//   ["SRID=4326;GEOMETRYCOLLECTION (POINT (-122.27 37.8)), "<a href=\"/oakland/MuralA\">Mural A</a>"]
//
// Segments are decoded positionally, one at a time, and each one either yields a
// complete ListingEntry or is rejected as a whole.

use crate::error::SegmentError;
use crate::result::ListingEntry;
use tracing::{debug, info, warn};

pub const GEOMETRY_MARKER: &str = "[\"SRID=4326;GEOMETRYCOLLECTION (";
pub const ANCHOR_CLOSURE: &str = "</a";
pub const DEFAULT_PATH_MARKER: &str = "/oakland/";
pub const DEFAULT_BASE_URL: &str = "https://localwiki.org/oakland/";

const LATITUDE_TRAILERS: &[char] = &[')', '"', ','];
const LINK_TRAILERS: &[char] = &['\\', '"'];

/// Markers used to cut the listing page into segments.
#[derive(Debug, Clone)]
pub struct ListingSyntax {
    pub geometry_marker: String,
    pub path_marker: String,
    pub base_url: String,
}

impl Default for ListingSyntax {
    fn default() -> Self {
        Self {
            geometry_marker: GEOMETRY_MARKER.to_string(),
            path_marker: DEFAULT_PATH_MARKER.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedSegment {
    /// Position among the segments that follow a geometry marker.
    pub index: usize,
    /// Final segment with no anchor or wiki link in it: page noise rather
    /// than a mural.
    pub trailing: bool,
    pub error: SegmentError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingScan {
    pub entries: Vec<ListingEntry>,
    pub rejected: Vec<RejectedSegment>,
}

impl ListingScan {
    /// Rejections of segments that carried a mural.
    pub fn malformed(&self) -> impl Iterator<Item = &RejectedSegment> {
        self.rejected.iter().filter(|r| !r.trailing)
    }
}

/// Decode every geometry segment in `body`, in page order.
pub fn extract_entries(body: &str, syntax: &ListingSyntax) -> ListingScan {
    let segments: Vec<&str> = body
        .split(syntax.geometry_marker.as_str())
        .skip(1)
        .collect();
    let last = segments.len().saturating_sub(1);

    let mut scan = ListingScan::default();
    for (index, segment) in segments.iter().enumerate() {
        match parse_segment(segment, syntax) {
            Ok(entry) => {
                debug!(
                    "Segment {}: {} ({}, {})",
                    index, entry.name, entry.longitude, entry.latitude
                );
                scan.entries.push(entry);
            }
            Err(error) => {
                let trailing = index == last && !carries_record(segment, syntax);
                if trailing {
                    debug!("Ignoring trailing segment {}: {}", index, error);
                } else {
                    warn!("Skipping malformed segment {}: {}", index, error);
                }
                scan.rejected.push(RejectedSegment {
                    index,
                    trailing,
                    error,
                });
            }
        }
    }

    info!(
        "Extracted {} murals from {} geometry segments",
        scan.entries.len(),
        segments.len()
    );
    scan
}

/// An anchor boundary with a wiki link before it marks a mural record, even
/// when its coordinates or label are broken.
fn carries_record(segment: &str, syntax: &ListingSyntax) -> bool {
    segment
        .split_once('>')
        .is_some_and(|(region, _)| region.contains(syntax.path_marker.as_str()))
}

/// Decode the text that follows one geometry marker.
pub fn parse_segment(segment: &str, syntax: &ListingSyntax) -> Result<ListingEntry, SegmentError> {
    let (region, rest) = segment
        .split_once('>')
        .ok_or(SegmentError::MissingAnchorBoundary)?;
    let label = rest.split_once('>').map_or(rest, |(label, _)| label);

    let name = label
        .strip_suffix(ANCHOR_CLOSURE)
        .ok_or(SegmentError::MissingLabelClosure)?
        .trim();
    if name.is_empty() {
        return Err(SegmentError::EmptyName);
    }

    let (longitude, latitude) = parse_coordinates(region)?;
    let detail_link = parse_detail_link(region, syntax)?;

    Ok(ListingEntry {
        name: name.to_string(),
        latitude,
        longitude,
        detail_link,
    })
}

/// Returns `(longitude, latitude)`. The longitude sign is the split point, so
/// only western-hemisphere points are accepted.
fn parse_coordinates(region: &str) -> Result<(f64, f64), SegmentError> {
    let (_, payload) = region.split_once('-').ok_or(SegmentError::MissingSign)?;
    let mut tokens = payload.split_whitespace();

    let lon_token = tokens
        .next()
        .ok_or(SegmentError::MissingToken("longitude"))?;
    let lat_token = tokens
        .next()
        .ok_or(SegmentError::MissingToken("latitude"))?;

    let magnitude = parse_number("longitude", lon_token)?;
    if magnitude.is_sign_negative() {
        return Err(SegmentError::InvalidNumber {
            field: "longitude",
            value: lon_token.to_string(),
        });
    }
    let latitude = parse_number("latitude", lat_token.trim_end_matches(LATITUDE_TRAILERS))?;

    Ok((-magnitude, latitude))
}

fn parse_number(field: &'static str, token: &str) -> Result<f64, SegmentError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SegmentError::InvalidNumber {
            field,
            value: token.to_string(),
        })
}

fn parse_detail_link(region: &str, syntax: &ListingSyntax) -> Result<String, SegmentError> {
    let (_, fragment) = region
        .split_once(syntax.path_marker.as_str())
        .ok_or_else(|| SegmentError::MissingLinkMarker(syntax.path_marker.clone()))?;
    let fragment = fragment.trim_end_matches(LINK_TRAILERS);
    if fragment.is_empty() {
        return Err(SegmentError::EmptyLink);
    }
    Ok(format!("{}{}", syntax.base_url, fragment))
}

/// Inverse of [`parse_segment`]: renders one mural the way the listing page
/// embeds it, marker included.
pub fn encode_marker(
    syntax: &ListingSyntax,
    name: &str,
    fragment: &str,
    longitude: f64,
    latitude: f64,
) -> String {
    format!(
        r#"{}POINT ({} {})), "<a href=\"{}{}\">{}</a>"]"#,
        syntax.geometry_marker, longitude, latitude, syntax.path_marker, fragment, name
    )
}
