//! Field extractors: pick the best image, its alt text, and the tag labels
//! out of a raw article. Each one degrades to a default instead of failing.
use crate::types::{ImageField, RawArticle, TagRef, TagSource};

/// Size variants in the order we prefer them.
pub const IMAGE_SIZE_PRIORITY: [&str; 5] = [
    "500px_width_uri",
    "800px_width_uri",
    "1200px_width_uri",
    "thumbnail_uri",
    "1300px_width_uri",
];

/// URL of the preferred size variant in `values[0].images`.
///
/// When none of [`IMAGE_SIZE_PRIORITY`] is present, any available variant is
/// returned (the first non-empty one in document order; callers should not
/// rely on which). Empty or non-string URLs are skipped.
pub fn pick_image(field: Option<&ImageField>) -> Option<String> {
    let images = field?.first.as_ref()?.images.as_ref()?;

    let non_empty = |v: &serde_json::Value| {
        v.as_str()
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    };

    IMAGE_SIZE_PRIORITY
        .iter()
        .find_map(|key| images.get(*key).and_then(non_empty))
        .or_else(|| images.values().find_map(non_empty))
}

/// `values[0].alt` when present and non-empty, else `fallback_title`.
pub fn pick_alt(field: Option<&ImageField>, fallback_title: &str) -> String {
    field
        .and_then(|f| f.first.as_ref())
        .and_then(|v| v.alt.as_deref())
        .filter(|alt| !alt.is_empty())
        .unwrap_or(fallback_title)
        .to_string()
}

/// Display labels for an article's tags, in source order, duplicates kept.
pub fn extract_tag_labels(article: &RawArticle) -> Vec<String> {
    match &article.tag_source {
        TagSource::Structured(values) => labels_of(values),
        TagSource::Delimited(s) => s
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
        TagSource::Absent => Vec::new(),
    }
}

/// Labels of the feed-level tag catalog, same naming rules as article tags.
pub fn tag_catalog_labels(tags: &[TagRef]) -> Vec<String> {
    labels_of(tags)
}

fn labels_of(tags: &[TagRef]) -> Vec<String> {
    tags.iter()
        .filter_map(TagRef::display_name)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}
