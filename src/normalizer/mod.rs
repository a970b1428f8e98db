use serde_json::{Map, Value};

use crate::domain::{ItemKind, NormalizedItem, RawItem};

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Merge an item's base fields with its `extra` mapping.
    ///
    /// Keys from `extra` override base fields. A missing or unreadable
    /// `extra` contributes nothing; normalization itself never fails.
    pub fn normalize(&self, raw: &RawItem) -> NormalizedItem {
        let mut fields = Map::new();
        fields.insert("id".into(), Value::String(raw.id.clone()));
        fields.insert("type".into(), Value::String(raw.item_type.clone()));
        fields.insert(
            "title".into(),
            raw.title.clone().map(Value::String).unwrap_or(Value::Null),
        );
        fields.insert("url".into(), Value::String(raw.url.clone()));
        fields.insert("timestamp".into(), Value::String(raw.timestamp.clone()));

        fields.extend(parse_extra(&raw.id, raw.extra.as_deref()));

        let kind = match fields.get("type") {
            Some(Value::String(label)) => ItemKind::parse(label),
            _ => raw.kind(),
        };

        NormalizedItem::from_parts(kind, fields)
    }
}

fn parse_extra(item_id: &str, extra: Option<&str>) -> Map<String, Value> {
    let Some(extra) = extra.map(str::trim).filter(|s| !s.is_empty()) else {
        return Map::new();
    };

    match serde_json::from_str::<Value>(extra) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::debug!("Ignoring non-object extra on item {}: {}", item_id, other);
            Map::new()
        }
        Err(e) => {
            tracing::debug!("Cannot parse extra on item {}: {}", item_id, e);
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pocket(extra: Option<&str>) -> RawItem {
        let mut raw = RawItem::new("1", ItemKind::Pocket, "https://example.com/a");
        raw.title = Some("A".into());
        raw.timestamp = "2018-03-01T10:00:00".into();
        raw.extra = extra.map(String::from);
        raw
    }

    #[test]
    fn test_extra_overrides_base_fields() {
        let item = Normalizer::new().normalize(&pocket(Some(r#"{"title":"B"}"#)));
        assert_eq!(item.title(), Some("B"));
        assert_eq!(item.url(), Some("https://example.com/a"));
    }

    #[test]
    fn test_extra_fields_are_merged_in() {
        let item = Normalizer::new().normalize(&pocket(Some(
            r#"{"images":["https://img.example.com/1.jpg"],"excerpt":"hello"}"#,
        )));
        assert_eq!(item.str_at("images.0"), Some("https://img.example.com/1.jpg"));
        assert_eq!(item.get("excerpt"), Some(&json!("hello")));
        assert!(item.get("extra").is_none());
    }

    #[test]
    fn test_malformed_extra_yields_base_fields_only() {
        let item = Normalizer::new().normalize(&pocket(Some("not-json")));
        let keys: Vec<&str> = item.fields().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(item.title(), Some("A"));
        assert_eq!(item.id(), "1");
    }

    #[test]
    fn test_missing_empty_and_non_object_extra() {
        let normalizer = Normalizer::new();
        let base = normalizer.normalize(&pocket(None));
        assert_eq!(normalizer.normalize(&pocket(Some(""))), base);
        assert_eq!(normalizer.normalize(&pocket(Some("  "))), base);
        assert_eq!(normalizer.normalize(&pocket(Some("[1,2]"))), base);
        assert_eq!(normalizer.normalize(&pocket(Some("42"))), base);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = Normalizer::new();
        let raw = pocket(Some(r#"{"thumb":"x","nested":{"a":[1,2]}}"#));
        assert_eq!(normalizer.normalize(&raw), normalizer.normalize(&raw));
    }

    #[test]
    fn test_kind_follows_merged_type() {
        let item = Normalizer::new().normalize(&pocket(Some(r#"{"type":"Tumblr"}"#)));
        assert_eq!(item.kind(), &ItemKind::Tumblr);

        let item = Normalizer::new().normalize(&pocket(Some(r#"{"type":null}"#)));
        assert_eq!(item.kind(), &ItemKind::Pocket);
    }

    #[test]
    fn test_type_label_is_kept() {
        let mut raw = pocket(None);
        raw.item_type = "Youtube like".into();
        let item = Normalizer::new().normalize(&raw);

        assert_eq!(item.get("type"), Some(&json!("Youtube like")));
        assert_eq!(item.kind(), &ItemKind::Youtube);
    }

    #[test]
    fn test_missing_title_is_null() {
        let mut raw = pocket(None);
        raw.title = None;
        let item = Normalizer::new().normalize(&raw);
        assert_eq!(item.get("title"), Some(&Value::Null));
        assert_eq!(item.display_title(), "https://example.com/a");
    }
}
