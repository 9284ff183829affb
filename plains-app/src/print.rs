use anyhow::{Context, Result};
use plains_feed::{
    Article, FeedSource, FilterState, FilterSummary, LoadOutcome, filter, load_feed, normalize_all,
};
use std::fmt::Write as _;
use std::io::{self, Write};
use tokio_util::sync::CancellationToken;

/// One fetch, one filtered listing on stdout. A failed fetch is an error.
pub async fn run(
    source: &dyn FeedSource,
    state: &FilterState,
    json: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let feed = match load_feed(source, cancel).await {
        LoadOutcome::Loaded(feed) => feed,
        LoadOutcome::Failed(err) => return Err(err).context("loading articles"),
        LoadOutcome::Cancelled => {
            tracing::info!("print.cancelled");
            return Ok(());
        }
    };

    let articles = normalize_all(feed.articles);
    let shown = filter(&articles, state);

    let mut out = io::stdout().lock();
    if json {
        let views: Vec<_> = shown.iter().map(|a| &a.view).collect();
        serde_json::to_writer_pretty(&mut out, &views)?;
        writeln!(out)?;
    } else {
        out.write_all(render_listing(&shown, articles.len(), state).as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Plain-text rendering of the filtered list, headed by the active filters
/// and the count line.
pub fn render_listing(shown: &[&Article], total: usize, state: &FilterState) -> String {
    let mut s = String::new();
    if let Some(tag) = &state.selected_tag {
        let _ = writeln!(s, "Filtering by: {tag}");
    }
    let query = state.applied_query().trim();
    if !query.is_empty() {
        let _ = writeln!(s, "Search: \"{query}\"");
    }
    let summary = FilterSummary {
        shown: shown.len(),
        total,
    };
    let _ = writeln!(s, "{summary}");

    for article in shown {
        let view = &article.view;
        let _ = writeln!(s);
        let _ = writeln!(s, "{}", view.title);
        if !view.tag_labels.is_empty() {
            let _ = writeln!(s, "  Tags: {}", view.tag_labels.join(", "));
        }
        if !view.summary.is_empty() {
            let _ = writeln!(s, "  {}", view.summary);
        }
        if let Some(url) = &view.image_url {
            let _ = writeln!(s, "  Image: {url}");
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use plains_feed::RawArticle;
    use serde_json::json;

    #[test]
    fn listing_heads_with_filters_and_count() {
        let articles = normalize_all(vec![
            RawArticle::from_value(json!({
                "title": "Liming",
                "tags": "Soil",
                "body": { "summary": "Raise pH &amp; yield." }
            })),
            RawArticle::from_value(json!({ "title": "Corn", "tags": "Corn" })),
        ]);
        let state = FilterState::default()
            .select_tag("Soil")
            .commit_search_with(" pH ");
        let shown = filter(&articles, &state);
        assert_eq!(
            render_listing(&shown, articles.len(), &state),
            "Filtering by: Soil\nSearch: \"pH\"\nShowing 1 of 2\n\nLiming\n  Tags: Soil\n  Raise pH & yield.\n"
        );
    }

    #[test]
    fn empty_listing_is_just_the_count() {
        let state = FilterState::default();
        assert_eq!(render_listing(&[], 0, &state), "Showing 0 of 0\n");
    }
}
