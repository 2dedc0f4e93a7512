//! Frontmatter schemas for the source (Zenn) and target (Qiita CLI) platforms.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

/// Keys the converter always produces itself. A source key with one of these
/// names is discarded instead of passed through.
pub const DERIVED_KEYS: &[&str] = &[
    "updated_at",
    "id",
    "organization_url_name",
    "slide",
    "private",
    "tags",
];

/// A Qiita item id. Qiita issues hex strings; numeric ids are kept as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Unsigned(u64),
    Text(String),
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Number(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

/// Frontmatter of a Zenn article.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ZennFrontmatter {
    /// Article emoji. Dropped on conversion.
    #[serde(default)]
    pub emoji: Option<Value>,

    /// Article type (`tech` or `idea`). Dropped on conversion.
    #[serde(default, rename = "type")]
    pub article_type: Option<Value>,

    #[serde(default)]
    pub published: Option<bool>,

    /// A `null` value is treated the same as a missing key.
    #[serde(default)]
    pub topics: Option<Vec<String>>,

    /// Every other key, `title` included, in source order.
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Frontmatter of a Qiita CLI article.
///
/// Field order here is the key order of the rendered YAML; pass-through keys
/// follow the derived ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QiitaFrontmatter {
    /// ISO-8601 timestamp with millisecond precision, e.g. `2023-01-01T00:00:00.000Z`.
    pub updated_at: String,
    pub id: Option<ItemId>,
    pub organization_url_name: Option<String>,
    pub slide: bool,
    pub private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl QiitaFrontmatter {
    /// The pass-through title, when it is a string.
    pub fn title(&self) -> Option<&str> {
        self.extra.get("title").and_then(Value::as_str)
    }
}

/// Metadata carried forward from a previously converted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PriorMetadata {
    #[serde(default)]
    pub id: Option<ItemId>,
    /// Any scalar is accepted and kept as text.
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub organization_url_name: Option<String>,
}

fn scalar_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {other:?}"
        ))),
    }
}

impl ZennFrontmatter {
    /// Map this frontmatter onto the Qiita schema.
    pub fn into_qiita(self, prior: PriorMetadata, updated_at: String) -> QiitaFrontmatter {
        let extra = self
            .extra
            .into_iter()
            .filter(|(key, _)| !key.as_str().is_some_and(|k| DERIVED_KEYS.contains(&k)))
            .collect();

        QiitaFrontmatter {
            updated_at,
            id: prior.id,
            organization_url_name: prior.organization_url_name,
            slide: false,
            private: !self.published.unwrap_or(false),
            tags: self.topics,
            extra,
        }
    }
}
