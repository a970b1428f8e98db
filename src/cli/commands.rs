use serde_json::json;

use crate::app::{AppContext, FlatfeedError, Result};
use crate::config::{Config, SiteConfig};
use crate::domain::{FeedState, PreviewDescriptor, RawItem};
use crate::normalizer::Normalizer;
use crate::resolver::ContentResolver;

pub async fn list_items(
    ctx: &AppContext,
    page_size: u32,
    query: Option<&str>,
    pages: u32,
    as_json: bool,
) -> Result<()> {
    let paginator = ctx.paginator();
    let mut state = paginator.initialize(page_size, query).await;

    let mut loaded = 1;
    while loaded < pages && state.has_more && state.error().is_none() {
        state = paginator.load_more().await;
        loaded += 1;
    }

    if state.items.is_empty() {
        if let Some(message) = state.error() {
            return Err(FlatfeedError::Other(format!("Cannot load items: {}", message)));
        }
        println!("No items");
        return Ok(());
    }

    for item in &state.items {
        if as_json {
            println!("{}", item_json(&ctx.normalizer, &ctx.resolver, &ctx.config.site, item)?);
        } else {
            println!("{}", item_line(&ctx.normalizer, &ctx.resolver, item));
        }
    }

    print_footer(&state);
    Ok(())
}

pub fn config_path() -> Result<()> {
    let path = Config::default_config_path().map_err(|e| FlatfeedError::Config(e.to_string()))?;
    println!("{}", path.display());
    Ok(())
}

fn print_footer(state: &FeedState) {
    if let Some(message) = state.error() {
        eprintln!("Stopped early: {}", message);
    }
    println!(
        "\n{} items{}",
        state.items.len(),
        if state.has_more { " (more available)" } else { "" }
    );
}

/// One display line per item: source, date, title, then the preview if any.
fn item_line(normalizer: &Normalizer, resolver: &ContentResolver, item: &RawItem) -> String {
    let normalized = normalizer.normalize(item);
    let date = item
        .published_at()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "          ".to_string());

    let mut line = format!(
        "{:<8} {} {}",
        normalized.kind(),
        date,
        normalized.display_title()
    );
    match resolver.resolve_preview(&normalized) {
        PreviewDescriptor::Embed { url } => line.push_str(&format!("\n         embed {}", url)),
        PreviewDescriptor::Image { url } => line.push_str(&format!("\n         image {}", url)),
        PreviewDescriptor::None => {}
    }
    line
}

fn item_json(
    normalizer: &Normalizer,
    resolver: &ContentResolver,
    site: &SiteConfig,
    item: &RawItem,
) -> Result<String> {
    let normalized = normalizer.normalize(item);
    let preview = resolver.resolve_preview(&normalized);
    let meta = resolver.item_meta(&normalized, site);
    Ok(serde_json::to_string(&json!({
        "item": normalized,
        "preview": preview,
        "meta": meta,
    }))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemKind;

    fn youtube_item() -> RawItem {
        let mut item = RawItem::new("y1", ItemKind::Youtube, "https://youtu.be/abc123");
        item.title = Some("A talk".into());
        item.timestamp = "2019-05-04T12:00:00".into();
        item
    }

    #[test]
    fn test_item_line() {
        let line = item_line(&Normalizer::new(), &ContentResolver::new(), &youtube_item());
        assert_eq!(
            line,
            "Youtube  2019-05-04 A talk\n         embed https://www.youtube.com/embed/abc123"
        );
    }

    #[test]
    fn test_item_line_without_preview_or_date() {
        let item = RawItem::new("r1", ItemKind::Rss, "https://blog.example.com/post");
        let line = item_line(&Normalizer::new(), &ContentResolver::new(), &item);
        let expected = format!("{:<8} {} {}", "RSS", " ".repeat(10), "https://blog.example.com/post");
        assert_eq!(line, expected);
    }

    #[test]
    fn test_item_json() {
        let out = item_json(
            &Normalizer::new(),
            &ContentResolver::new(),
            &SiteConfig::default(),
            &youtube_item(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["item"]["title"], "A talk");
        assert_eq!(value["item"]["type"], "Youtube");
        assert_eq!(value["preview"]["kind"], "embed");
        assert_eq!(
            value["preview"]["url"],
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(value["meta"]["title"], "A talk");
        assert_eq!(value["meta"]["description"], SiteConfig::default().description);
    }
}
