use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Source of a collected item.
///
/// Parsed from the free-form `type` label and used to pick per-source
/// behaviour; the label itself stays on `RawItem`. Anything not recognised
/// lands in `Unknown` with the label kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Pocket,
    Youtube,
    Vimeo,
    Tumblr,
    Rss,
    Unknown(String),
}

impl ItemKind {
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Pocket" => ItemKind::Pocket,
            // older collectors tagged likes as "Youtube like"
            "Youtube" | "Youtube like" => ItemKind::Youtube,
            "Vimeo" => ItemKind::Vimeo,
            "Tumblr" => ItemKind::Tumblr,
            "RSS" => ItemKind::Rss,
            other => ItemKind::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ItemKind::Pocket => "Pocket",
            ItemKind::Youtube => "Youtube",
            ItemKind::Vimeo => "Vimeo",
            ItemKind::Tumblr => "Tumblr",
            ItemKind::Rss => "RSS",
            ItemKind::Unknown(label) => label,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// An item exactly as the query API delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub id: String,
    /// Source label as sent, e.g. `"Youtube like"`.
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    /// JSON-encoded mapping of source-specific attributes.
    #[serde(default)]
    pub extra: Option<String>,
}

impl RawItem {
    pub fn new(id: impl Into<String>, kind: ItemKind, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type: kind.label().to_string(),
            title: None,
            url: url.into(),
            timestamp: String::new(),
            extra: None,
        }
    }

    pub fn kind(&self) -> ItemKind {
        ItemKind::parse(&self.item_type)
    }

    /// Best-effort parse of the timestamp, for display only.
    ///
    /// The API emits both RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS` values;
    /// naive ones are taken as UTC.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The merged view model of one item: base fields plus the parsed `extra`
/// mapping, with `extra` taking precedence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedItem {
    #[serde(skip)]
    kind: ItemKind,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl NormalizedItem {
    pub(crate) fn from_parts(kind: ItemKind, fields: Map<String, Value>) -> Self {
        Self { kind, fields }
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a non-empty string along a dotted path.
    ///
    /// Segments index objects by key and arrays by position, so
    /// `thumbnails.sizes.2.link` walks into the third element of `sizes`.
    /// Empty strings are treated as absent.
    pub fn str_at(&self, path: &str) -> Option<&str> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(list) => list.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        current.as_str().filter(|s| !s.is_empty())
    }

    pub fn id(&self) -> &str {
        self.str_at("id").unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.str_at("title")
    }

    pub fn url(&self) -> Option<&str> {
        self.str_at("url")
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.str_at("timestamp")
    }

    pub fn content(&self) -> Option<&str> {
        self.str_at("content")
    }

    pub fn content_format(&self) -> Option<&str> {
        self.str_at("contentFormat")
    }

    /// Title when present, otherwise the link itself.
    pub fn display_title(&self) -> &str {
        self.title().or_else(|| self.url()).unwrap_or("(Untitled)")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_at("description").or_else(|| self.str_at("subtitle"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalized(fields: Value) -> NormalizedItem {
        let Value::Object(map) = fields else {
            panic!("fixture must be an object");
        };
        NormalizedItem::from_parts(ItemKind::Pocket, map)
    }

    #[test]
    fn test_kind_parse_known_labels() {
        assert_eq!(ItemKind::parse("Pocket"), ItemKind::Pocket);
        assert_eq!(ItemKind::parse("Youtube like"), ItemKind::Youtube);
        assert_eq!(ItemKind::parse("RSS"), ItemKind::Rss);
    }

    #[test]
    fn test_kind_unknown_keeps_label() {
        let kind = ItemKind::parse("Manual");
        assert_eq!(kind, ItemKind::Unknown("Manual".into()));
        assert_eq!(kind.label(), "Manual");
    }

    #[test]
    fn test_raw_item_deserializes_wire_shape() {
        let raw: RawItem = serde_json::from_value(json!({
            "id": "SXRlbTox",
            "type": "Vimeo",
            "title": null,
            "url": null,
            "timestamp": "2018-03-01T10:00:00",
            "extra": "{}"
        }))
        .unwrap();

        assert_eq!(raw.kind(), ItemKind::Vimeo);
        assert_eq!(raw.title, None);
        assert_eq!(raw.url, "");
        assert_eq!(raw.extra.as_deref(), Some("{}"));
    }

    #[test]
    fn test_raw_item_keeps_wire_label() {
        let raw: RawItem = serde_json::from_value(json!({
            "id": "SXRlbToy",
            "type": "Youtube like",
            "url": "https://youtu.be/abc123",
            "timestamp": "2018-03-01T10:00:00"
        }))
        .unwrap();

        assert_eq!(raw.kind(), ItemKind::Youtube);
        assert_eq!(serde_json::to_value(&raw).unwrap()["type"], "Youtube like");
    }

    #[test]
    fn test_published_at_naive_and_rfc3339() {
        let mut raw = RawItem::new("1", ItemKind::Rss, "https://example.com");
        raw.timestamp = "2018-03-01T10:00:00".into();
        assert!(raw.published_at().is_some());

        raw.timestamp = "2018-03-01T10:00:00+02:00".into();
        assert_eq!(
            raw.published_at().unwrap().format("%H").to_string(),
            "08"
        );

        raw.timestamp = "yesterday".into();
        assert!(raw.published_at().is_none());
    }

    #[test]
    fn test_str_at_walks_objects_and_arrays() {
        let item = normalized(json!({
            "thumbnails": {"sizes": [{"link": "a"}, {"link": "b"}, {"link": "c"}]}
        }));
        assert_eq!(item.str_at("thumbnails.sizes.2.link"), Some("c"));
        assert_eq!(item.str_at("thumbnails.sizes.5.link"), None);
        assert_eq!(item.str_at("thumbnails.sizes.x"), None);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let item = normalized(json!({"title": "", "url": "https://example.com/a"}));
        assert_eq!(item.title(), None);
        assert_eq!(item.display_title(), "https://example.com/a");
    }

    #[test]
    fn test_description_falls_back_to_subtitle() {
        let item = normalized(json!({"subtitle": "sub"}));
        assert_eq!(item.description(), Some("sub"));
    }
}
