// Detail-page enrichment: favored image, artist credit and visibility, read from
// the LocalWiki tag list and image frames of a single mural page.

use crate::error::{Result, ScanError};
use crate::fetcher::Fetcher;
use crate::result::DetailInfo;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

pub const FAVORED_IMAGE_PREFIX: &str = "oam_uses_";
pub const HIDDEN_PREFIX: &str = "not currently visible";
pub const ARTIST_PREFIX: &str = "artist";

pub const DEFAULT_SITE_URL: &str = "https://localwiki.org";
pub const DEFAULT_TAG_NAMESPACE_URL: &str = "https://localwiki.org/oakland/tags/";
pub const DEFAULT_FALLBACK_IMAGE_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/a/ac/No_image_available.svg";
pub const DEFAULT_FALLBACK_INFO_URL: &str = "https://localwiki.org/oakland/Murals";

const TAG_SELECTOR: &str = "li.tag";
const IMAGE_FRAME_SELECTOR: &str = "span.image_frame";

#[derive(Debug, Clone)]
pub struct EnrichSettings {
    /// Image `src` and `href` attributes are relative to this.
    pub site_url: String,
    pub tag_namespace_url: String,
    pub fallback_image_url: String,
    pub fallback_info_url: String,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            tag_namespace_url: DEFAULT_TAG_NAMESPACE_URL.to_string(),
            fallback_image_url: DEFAULT_FALLBACK_IMAGE_URL.to_string(),
            fallback_info_url: DEFAULT_FALLBACK_INFO_URL.to_string(),
        }
    }
}

/// First anchor of a `span.image_frame` and the image inside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFrame {
    pub href: Option<String>,
    pub src: Option<String>,
}

/// The parts of a detail page the enrichment rules look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPage {
    pub tags: Vec<String>,
    pub images: Vec<ImageFrame>,
}

impl DetailPage {
    pub fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let tag_selector = selector(TAG_SELECTOR)?;
        let frame_selector = selector(IMAGE_FRAME_SELECTOR)?;
        let anchor_selector = selector("a")?;
        let img_selector = selector("img")?;

        let tags = document
            .select(&tag_selector)
            .map(|tag| element_text(&tag))
            .collect();

        let images = document
            .select(&frame_selector)
            .map(|frame| match frame.select(&anchor_selector).next() {
                Some(anchor) => ImageFrame {
                    href: anchor.value().attr("href").map(str::to_string),
                    src: anchor
                        .select(&img_selector)
                        .next()
                        .and_then(|img| img.value().attr("src"))
                        .map(str::to_string),
                },
                None => ImageFrame::default(),
            })
            .collect();

        Ok(Self { tags, images })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("selector {}: {}", css, e)))
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Everything the tag list says about a mural.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagFindings {
    pub favored_image: Option<String>,
    pub hidden: bool,
    pub artist_name: Option<String>,
    pub artist_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    /// `oam_uses_<image name>`, any case.
    FavoredImage,
    /// Exactly `not currently visible...`.
    Hidden,
    /// `artist: <name>`. The name's own tag gives the profile link.
    Artist,
}

/// Every tag is checked against every rule, in this order.
pub const TAG_RULES: [TagRule; 3] = [TagRule::FavoredImage, TagRule::Hidden, TagRule::Artist];

impl TagRule {
    fn matches(self, text: &str) -> bool {
        match self {
            TagRule::FavoredImage => text
                .get(..FAVORED_IMAGE_PREFIX.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(FAVORED_IMAGE_PREFIX)),
            TagRule::Hidden => text.starts_with(HIDDEN_PREFIX),
            TagRule::Artist => text.starts_with(ARTIST_PREFIX),
        }
    }

    fn apply(self, text: &str, tags: &[String], settings: &EnrichSettings, findings: &mut TagFindings) {
        match self {
            TagRule::FavoredImage => {
                let name = text[FAVORED_IMAGE_PREFIX.len()..].trim();
                if !name.is_empty() {
                    findings.favored_image = Some(name.to_string());
                }
            }
            TagRule::Hidden => findings.hidden = true,
            TagRule::Artist => {
                let name = text[ARTIST_PREFIX.len()..]
                    .trim_start()
                    .trim_start_matches(':')
                    .trim();
                if name.is_empty() {
                    return;
                }
                findings.artist_link = artist_link(name, tags, settings);
                findings.artist_name = Some(name.to_string());
            }
        }
    }
}

/// Profile link for `name`, taken from the tag whose text equals it. The last
/// such tag wins.
fn artist_link(name: &str, tags: &[String], settings: &EnrichSettings) -> Option<String> {
    let wanted = name.to_lowercase();
    tags.iter()
        .rev()
        .find(|tag| tag.trim().to_lowercase() == wanted)
        .map(|tag| {
            format!(
                "{}{}",
                settings.tag_namespace_url,
                tag.trim().to_lowercase().replace(' ', "")
            )
        })
}

pub fn scan_tags(tags: &[String], settings: &EnrichSettings) -> TagFindings {
    let mut findings = TagFindings::default();
    for text in tags {
        for rule in TAG_RULES {
            if rule.matches(text) {
                rule.apply(text, tags, settings, &mut findings);
            }
        }
    }
    findings
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub image_url: String,
    pub info_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRule {
    /// The frame whose link matches the `oam_uses_` name.
    Favored,
    /// The page's first image frame.
    First,
    /// Static "no image" picture pointing back at the listing page.
    Fallback,
}

/// Evaluated in order, first hit wins.
pub const IMAGE_RULES: [ImageRule; 3] = [ImageRule::Favored, ImageRule::First, ImageRule::Fallback];

impl ImageRule {
    pub fn resolve(
        self,
        page: &DetailPage,
        findings: &TagFindings,
        settings: &EnrichSettings,
    ) -> Option<ResolvedImage> {
        match self {
            ImageRule::Favored => {
                let favored = findings.favored_image.as_deref()?;
                let pattern = favored_pattern(favored)?;
                page.images.iter().find_map(|frame| {
                    let href = frame.href.as_deref()?;
                    let src = frame.src.as_deref()?;
                    pattern
                        .is_match(href)
                        .then(|| frame_image(settings, href, src))
                })
            }
            ImageRule::First => {
                let frame = page.images.first()?;
                Some(frame_image(
                    settings,
                    frame.href.as_deref()?,
                    frame.src.as_deref()?,
                ))
            }
            ImageRule::Fallback => Some(ResolvedImage {
                image_url: settings.fallback_image_url.clone(),
                info_url: settings.fallback_info_url.clone(),
            }),
        }
    }
}

/// The favored name without its extension, as a pattern. Names that are not
/// valid patterns are matched literally.
fn favored_pattern(favored: &str) -> Option<Regex> {
    let stem = favored.split_once('.').map_or(favored, |(stem, _)| stem);
    if stem.is_empty() {
        return None;
    }
    Regex::new(stem)
        .or_else(|_| Regex::new(&regex::escape(stem)))
        .ok()
}

fn frame_image(settings: &EnrichSettings, href: &str, src: &str) -> ResolvedImage {
    ResolvedImage {
        image_url: site_link(&settings.site_url, src),
        info_url: site_link(&settings.site_url, href),
    }
}

fn site_link(site_url: &str, path: &str) -> String {
    Url::parse(site_url)
        .and_then(|base| base.join(path))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}{}", site_url, path))
}

pub fn resolve_image(page: &DetailPage, findings: &TagFindings, settings: &EnrichSettings) -> ResolvedImage {
    IMAGE_RULES
        .iter()
        .find_map(|rule| rule.resolve(page, findings, settings))
        .unwrap_or_else(|| ResolvedImage {
            image_url: settings.fallback_image_url.clone(),
            info_url: settings.fallback_info_url.clone(),
        })
}

/// Apply the tag and image rules to an already parsed page.
pub fn describe(page: &DetailPage, settings: &EnrichSettings) -> DetailInfo {
    let findings = scan_tags(&page.tags, settings);
    let image = resolve_image(page, &findings, settings);

    DetailInfo {
        image_url: image.image_url,
        image_info_url: image.info_url,
        artist_name: findings.artist_name,
        artist_link: findings.artist_link,
        is_hidden: findings.hidden,
    }
}

/// Fetch one detail page and apply the rules to it. Callers decide what a
/// failure means; the pipeline degrades to [`DetailInfo::fallback`].
pub async fn enrich(fetcher: &Fetcher, link: &str, settings: &EnrichSettings) -> Result<DetailInfo> {
    let html = fetcher.fetch_text(link).await?;
    let page = DetailPage::parse(&html)?;
    debug!(
        "{}: {} tags, {} image frames",
        link,
        page.tags.len(),
        page.images.len()
    );
    Ok(describe(&page, settings))
}
