//! Preview media resolution for normalized items.
//!
//! Precedence, first match wins:
//!
//! 1. items flagged `contentFormat = "iframe"` embed their `content` (or link)
//! 2. YouTube and Vimeo links become player embeds
//! 3. the best available image, ending in a per-source field
//! 4. nothing

use url::Url;

use crate::config::SiteConfig;
use crate::domain::{ItemKind, ItemMeta, NormalizedItem, PreviewDescriptor};

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";
const VIMEO_PLAYER_BASE: &str = "https://player.vimeo.com/video/";

#[derive(Clone)]
pub struct ContentResolver;

impl Default for ContentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve_preview(&self, item: &NormalizedItem) -> PreviewDescriptor {
        if let Some(url) = iframe_embed(item).or_else(|| video_embed(item)) {
            return PreviewDescriptor::Embed { url };
        }

        match self.preview_image(item) {
            Some(url) => PreviewDescriptor::Image {
                url: url.to_string(),
            },
            None => PreviewDescriptor::None,
        }
    }

    /// The image chain alone, skipping embeds.
    pub fn preview_image<'a>(&self, item: &'a NormalizedItem) -> Option<&'a str> {
        item.str_at("thumb")
            .or_else(|| item.str_at("thumbnails.high.url"))
            .or_else(|| item.str_at("thumbnails.medium.url"))
            .or_else(|| source_image(item))
    }

    pub fn item_meta(&self, item: &NormalizedItem, site: &SiteConfig) -> ItemMeta {
        ItemMeta {
            title: item.title().unwrap_or(&site.title).to_string(),
            description: item.description().unwrap_or(&site.description).to_string(),
            image: self.preview_image(item).map(String::from),
        }
    }
}

fn iframe_embed(item: &NormalizedItem) -> Option<String> {
    if item.content_format() != Some("iframe") {
        return None;
    }
    item.content().or_else(|| item.url()).map(String::from)
}

fn video_embed(item: &NormalizedItem) -> Option<String> {
    let link = item.url()?;

    if let Some(rest) = after(link, "youtube.com/watch?v=") {
        let video_id = match Url::parse(link) {
            Ok(parsed) => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
                .filter(|id| !id.is_empty())?,
            Err(_) => leading_id(rest, &['&', '#'])?,
        };
        return Some(format!("{}{}", YOUTUBE_EMBED_BASE, video_id));
    }

    if let Some(rest) = after(link, "youtu.be/") {
        let video_id = last_path_segment(link, rest)?;
        return Some(format!("{}{}", YOUTUBE_EMBED_BASE, video_id));
    }

    if let Some(rest) = after(link, "vimeo.com/") {
        let video_id = last_path_segment(link, rest)?;
        return Some(format!("{}{}", VIMEO_PLAYER_BASE, video_id));
    }

    None
}

fn after<'a>(link: &'a str, pattern: &str) -> Option<&'a str> {
    link.find(pattern).map(|at| &link[at + pattern.len()..])
}

/// Last path segment of `link`. Links without a scheme (`youtu.be/abc`,
/// `//vimeo.com/123`) don't parse as URLs; for those the id is whatever
/// follows the host, up to the next `?`, `#` or `/`.
fn last_path_segment(link: &str, rest: &str) -> Option<String> {
    match Url::parse(link) {
        Ok(parsed) => parsed
            .path_segments()?
            .next_back()
            .filter(|segment| !segment.is_empty())
            .map(String::from),
        Err(_) => leading_id(rest, &['?', '#', '/']),
    }
}

fn leading_id(rest: &str, stops: &[char]) -> Option<String> {
    rest.split(stops)
        .next()
        .filter(|id| !id.is_empty())
        .map(String::from)
}

fn source_image(item: &NormalizedItem) -> Option<&str> {
    match item.kind() {
        ItemKind::Pocket => item.str_at("images.0"),
        ItemKind::Vimeo => item.str_at("thumbnails.sizes.2.link"),
        ItemKind::Tumblr => item.str_at("img"),
        ItemKind::Rss => item.str_at("thumbnail"),
        ItemKind::Youtube | ItemKind::Unknown(_) => None,
    }
}
