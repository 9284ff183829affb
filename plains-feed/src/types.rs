//! Wire models for the agronomy content API.
//!
//! The upstream content model is inconsistent: images, tags, and body text can
//! each arrive in several shapes, and any field may be missing, `null`, or of
//! the wrong JSON type. Every field is therefore decoded leniently (a mismatch
//! becomes "absent", never a decode failure of the record), and the two tag
//! shapes are resolved once, here, into [`TagSource`].
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

// ==============================
// Lenient field decoders
// ==============================

/// Any JSON shape that does not decode as `T` is treated as absent.
fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode only the first element of a JSON array.
fn lenient_first<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .and_then(|first| serde_json::from_value(first).ok()),
        _ => None,
    })
}

/// Decode every element of a JSON array; elements of the wrong shape become
/// `T::default()` so the sequence keeps its length.
fn lenient_seq<'de, D, T>(de: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// An id-keyed object, or a JSON array standing in for one (sequential or
/// empty maps serialized as lists). Array elements are keyed by their index.
/// Any other shape is absent.
fn lenient_entries<'de, D>(de: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Object(map) => Some(map),
        Value::Array(items) => Some(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
        ),
        _ => None,
    })
}

/// A scalar rendered as text: strings as is, numbers and booleans via
/// `to_string`. `null`, objects and arrays are absent.
fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

// ==============================
// Response envelope
// ==============================

/// `{ agronomy: map<id, RawArticle>, tags: map<id, RawTag> }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedResponse {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub agronomy: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub tags: Option<Map<String, Value>>,
}

impl FeedResponse {
    /// Flatten both maps into sequences, keeping document order.
    pub fn into_feed(self) -> Feed {
        let articles = self
            .agronomy
            .unwrap_or_default()
            .into_iter()
            .map(|(_, v)| RawArticle::from_value(v))
            .collect();
        let tags = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|(_, v)| serde_json::from_value(v).unwrap_or_default())
            .collect();
        Feed { articles, tags }
    }
}

/// The raw collection handed from the fetcher to the normalizer.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub articles: Vec<RawArticle>,
    /// Tag catalog published alongside the articles.
    pub tags: Vec<TagRef>,
}

// ==============================
// Articles
// ==============================

/// Identifier that may arrive as a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Text(s) => f.write_str(s),
            Identifier::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Where an article's tag labels come from. Exactly one shape applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TagSource {
    /// `categorization.tags.values`, non-empty.
    Structured(Vec<TagRef>),
    /// Legacy comma-separated `tags` string, not blank.
    Delimited(String),
    #[default]
    Absent,
}

impl TagSource {
    fn resolve(structured: Option<Vec<TagRef>>, delimited: Option<String>) -> Self {
        match (structured, delimited) {
            (Some(values), _) if !values.is_empty() => TagSource::Structured(values),
            (_, Some(s)) if !s.trim().is_empty() => TagSource::Delimited(s),
            _ => TagSource::Absent,
        }
    }
}

/// One article record as published by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "ArticleWire")]
pub struct RawArticle {
    pub nid: Option<Identifier>,
    pub id: Option<Identifier>,
    pub title: Option<String>,
    pub article_image: Option<ImageField>,
    pub feature_block_image: Option<ImageField>,
    pub body: Option<Body>,
    pub tag_source: TagSource,
}

impl RawArticle {
    /// Decode a record of any shape. Non-object values yield an empty article.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn body_value(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| b.value.as_deref())
    }

    pub fn body_summary(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| b.summary.as_deref())
    }
}

#[derive(Deserialize)]
struct ArticleWire {
    #[serde(default, deserialize_with = "lenient")]
    nid: Option<Identifier>,
    #[serde(default, deserialize_with = "lenient")]
    id: Option<Identifier>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    article_image: Option<ImageField>,
    #[serde(default, deserialize_with = "lenient")]
    feature_block_image: Option<ImageField>,
    #[serde(default, deserialize_with = "lenient")]
    body: Option<Body>,
    #[serde(default, deserialize_with = "lenient")]
    categorization: Option<Categorization>,
    #[serde(default, deserialize_with = "lenient")]
    tags: Option<String>,
}

impl From<ArticleWire> for RawArticle {
    fn from(w: ArticleWire) -> Self {
        let structured = w
            .categorization
            .and_then(|c| c.tags)
            .and_then(|group| group.values);
        Self {
            nid: w.nid,
            id: w.id,
            title: w.title,
            article_image: w.article_image,
            feature_block_image: w.feature_block_image,
            body: w.body,
            tag_source: TagSource::resolve(structured, w.tags),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Body {
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
}

// ==============================
// Images
// ==============================

/// `{ values: [ { alt?, images?: { <size_key>: url } } ] }`; only the first
/// entry of `values` is ever consulted, so only that one is kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageField {
    #[serde(rename = "values", default, deserialize_with = "lenient_first")]
    pub first: Option<ImageValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageValue {
    #[serde(default, deserialize_with = "lenient")]
    pub alt: Option<String>,
    /// Size-variant name to URL, in document order. A bare list of URLs is
    /// keyed by index.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub images: Option<Map<String, Value>>,
}

// ==============================
// Tags
// ==============================

#[derive(Debug, Clone, Default, Deserialize)]
struct Categorization {
    #[serde(default, deserialize_with = "lenient")]
    tags: Option<TagGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TagGroup {
    #[serde(default, deserialize_with = "lenient_seq")]
    values: Option<Vec<TagRef>>,
}

/// A tag object. Upstream content types disagree on which field carries the
/// display name. Scalar names are kept as text (`5` becomes `"5"`); object
/// or array values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TagRef {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub term_name: Option<String>,
}

impl TagRef {
    /// First present field in `name`, `label`, `title`, `term_name` order.
    /// A present-but-empty field wins over later ones.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.label.as_deref())
            .or(self.title.as_deref())
            .or(self.term_name.as_deref())
    }
}
