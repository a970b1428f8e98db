use serde::Serialize;

/// Media used to preview an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PreviewDescriptor {
    /// Remote player loaded in an iframe.
    Embed { url: String },
    Image { url: String },
    None,
}

impl PreviewDescriptor {
    pub fn is_none(&self) -> bool {
        matches!(self, PreviewDescriptor::None)
    }
}

/// Share metadata for an item detail view (page title, description, image).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMeta {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}
