//! Raw record → renderable view model.
use crate::extract::{extract_tag_labels, pick_alt, pick_image};
use crate::text::{decode_entities, strip_tags_opt};
use crate::types::RawArticle;
use serde::Serialize;

/// What the presentation layer renders for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedArticle {
    /// `nid`, else `id`, else empty.
    pub id: String,
    /// As published; escaping is the renderer's concern.
    pub title: String,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub tag_labels: Vec<String>,
    /// Plain text, entities decoded.
    pub summary: String,
}

/// Build the view model for `raw`. Never fails: every missing or malformed
/// piece falls back to its default.
pub fn normalize(raw: &RawArticle) -> NormalizedArticle {
    let title = raw.title.clone().unwrap_or_default();

    let image_url = pick_image(raw.article_image.as_ref())
        .or_else(|| pick_image(raw.feature_block_image.as_ref()));

    let mut image_alt = pick_alt(raw.article_image.as_ref(), &title);
    if image_alt.is_empty() {
        image_alt = pick_alt(raw.feature_block_image.as_ref(), &title);
    }

    let summary = match raw.body_summary().filter(|s| !s.is_empty()) {
        Some(summary) => decode_entities(summary),
        None => decode_entities(&strip_tags_opt(raw.body_value())),
    };

    let id = raw
        .nid
        .as_ref()
        .or(raw.id.as_ref())
        .map(ToString::to_string)
        .unwrap_or_default();

    NormalizedArticle {
        id,
        title,
        image_url,
        image_alt,
        tag_labels: extract_tag_labels(raw),
        summary,
    }
}

/// A raw record paired with its normalized view, derived once per fetch.
///
/// The filter engine reads both halves: tags and title from the view, body
/// text from the raw record.
#[derive(Debug, Clone)]
pub struct Article {
    pub raw: RawArticle,
    pub view: NormalizedArticle,
}

impl Article {
    pub fn new(raw: RawArticle) -> Self {
        let view = normalize(&raw);
        Self { raw, view }
    }
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self::new(raw)
    }
}

/// Normalize a whole collection, keeping its order.
pub fn normalize_all(raws: Vec<RawArticle>) -> Vec<Article> {
    let articles: Vec<Article> = raws.into_iter().map(Article::new).collect();
    tracing::debug!(count = articles.len(), "feed.normalize.done");
    articles
}
