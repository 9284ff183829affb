//! Tag and search filtering over normalized articles.
//!
//! [`FilterState`] is a plain value: every transition consumes the old state
//! and returns the new one, and [`filter`] is re-evaluated from scratch after
//! each transition.
use crate::normalize::Article;
use crate::text::strip_tags_opt;
use std::fmt;

/// Two-stage search text: what is being typed vs. what was committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub draft: String,
    pub applied: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub selected_tag: Option<String>,
    pub search: SearchQuery,
}

/// Every way the presentation layer may change a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SelectTag(String),
    ClearTag,
    EditSearch(String),
    CommitSearch,
    ResetSearch,
}

impl FilterState {
    /// Select `label`, replacing any current selection. Selecting the same
    /// label again keeps it selected.
    #[must_use]
    pub fn select_tag(self, label: impl Into<String>) -> Self {
        Self {
            selected_tag: Some(label.into()),
            ..self
        }
    }

    #[must_use]
    pub fn clear_tag(self) -> Self {
        Self {
            selected_tag: None,
            ..self
        }
    }

    /// Update the live search input; the filter does not see it yet.
    #[must_use]
    pub fn edit_search(mut self, draft: impl Into<String>) -> Self {
        self.search.draft = draft.into();
        self
    }

    /// Commit the current draft.
    #[must_use]
    pub fn commit_search(mut self) -> Self {
        self.search.applied = self.search.draft.clone();
        self
    }

    /// Set the draft to `text` and commit it in one step.
    #[must_use]
    pub fn commit_search_with(self, text: impl Into<String>) -> Self {
        self.edit_search(text).commit_search()
    }

    #[must_use]
    pub fn reset_search(mut self) -> Self {
        self.search = SearchQuery::default();
        self
    }

    #[must_use]
    pub fn apply(self, action: FilterAction) -> Self {
        match action {
            FilterAction::SelectTag(label) => self.select_tag(label),
            FilterAction::ClearTag => self.clear_tag(),
            FilterAction::EditSearch(text) => self.edit_search(text),
            FilterAction::CommitSearch => self.commit_search(),
            FilterAction::ResetSearch => self.reset_search(),
        }
    }

    /// Whether a reset would change anything.
    pub fn can_reset(&self) -> bool {
        !self.search.draft.is_empty() || !self.search.applied.is_empty()
    }

    pub fn applied_query(&self) -> &str {
        &self.search.applied
    }
}

/// Articles passing both the tag and the search predicate, in input order.
pub fn filter<'a>(articles: &'a [Article], state: &FilterState) -> Vec<&'a Article> {
    let tag = state.selected_tag.as_deref();
    let needle = search_needle(state.applied_query());

    let matches: Vec<&Article> = articles
        .iter()
        .filter(|a| matches_tag(a, tag))
        .filter(|a| needle.as_deref().is_none_or(|n| contains_needle(a, n)))
        .collect();

    tracing::debug!(
        total = articles.len(),
        shown = matches.len(),
        tag = ?tag,
        query = %state.applied_query(),
        "feed.filter"
    );
    matches
}

/// Exact, case-sensitive membership: selecting "Corn" does not match "corn".
pub fn matches_tag(article: &Article, selected: Option<&str>) -> bool {
    match selected {
        None => true,
        Some(tag) => article.view.tag_labels.iter().any(|label| label == tag),
    }
}

/// Case-insensitive substring match against the title, the stripped
/// `body.summary`, and the stripped `body.value`. A blank query matches all.
pub fn matches_search(article: &Article, query: &str) -> bool {
    match search_needle(query) {
        None => true,
        Some(needle) => contains_needle(article, &needle),
    }
}

fn search_needle(query: &str) -> Option<String> {
    let q = query.trim();
    (!q.is_empty()).then(|| q.to_lowercase())
}

fn contains_needle(article: &Article, needle: &str) -> bool {
    if article.view.title.to_lowercase().contains(needle) {
        return true;
    }
    if strip_tags_opt(article.raw.body_summary())
        .to_lowercase()
        .contains(needle)
    {
        return true;
    }
    strip_tags_opt(article.raw.body_value())
        .to_lowercase()
        .contains(needle)
}

/// "Showing N of M", the result count line under the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {}", self.shown, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawArticle;
    use serde_json::json;

    fn article(v: serde_json::Value) -> Article {
        Article::new(RawArticle::from_value(v))
    }

    #[test]
    fn select_tag_overwrites_instead_of_toggling() {
        let state = FilterState::default().select_tag("Corn").select_tag("Soil");
        assert_eq!(state.selected_tag.as_deref(), Some("Soil"));
        let state = state.select_tag("Soil");
        assert_eq!(state.selected_tag.as_deref(), Some("Soil"));
        assert_eq!(state.clear_tag().selected_tag, None);
    }

    #[test]
    fn editing_does_not_touch_applied() {
        let state = FilterState::default()
            .commit_search_with("wheat")
            .edit_search("corn");
        assert_eq!(state.search.applied, "wheat");
        assert_eq!(state.search.draft, "corn");
    }

    #[test]
    fn reset_clears_both_stages_but_not_tag() {
        let state = FilterState::default()
            .select_tag("Soil")
            .commit_search_with("wheat")
            .reset_search();
        assert_eq!(state.search, SearchQuery::default());
        assert_eq!(state.selected_tag.as_deref(), Some("Soil"));
        assert!(!state.can_reset());
    }

    #[test]
    fn apply_routes_each_action() {
        let state = [
            FilterAction::SelectTag("Corn".into()),
            FilterAction::EditSearch("yield".into()),
            FilterAction::CommitSearch,
        ]
        .into_iter()
        .fold(FilterState::default(), FilterState::apply);
        assert_eq!(state.selected_tag.as_deref(), Some("Corn"));
        assert_eq!(state.applied_query(), "yield");
        assert!(state.can_reset());

        let state = state
            .apply(FilterAction::ClearTag)
            .apply(FilterAction::ResetSearch);
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn tag_match_is_case_sensitive() {
        let a = article(json!({ "tags": "corn" }));
        assert!(!matches_tag(&a, Some("Corn")));
        assert!(matches_tag(&a, Some("corn")));
        assert!(matches_tag(&a, None));
    }

    #[test]
    fn search_covers_title_summary_and_body() {
        let a = article(json!({
            "title": "Soil pH",
            "body": { "summary": "short <em>note</em>", "value": "<p>nitrogen basics</p>" }
        }));
        assert!(matches_search(&a, "SOIL"));
        assert!(matches_search(&a, "short note"));
        assert!(matches_search(&a, "nitrogen"));
        assert!(!matches_search(&a, "potassium"));
    }

    #[test]
    fn blank_query_matches_everything() {
        let a = article(json!({}));
        assert!(matches_search(&a, ""));
        assert!(matches_search(&a, "   "));
    }

    #[test]
    fn query_is_trimmed_before_matching() {
        let a = article(json!({ "title": "Cover crops" }));
        assert!(matches_search(&a, "  cover "));
    }

    #[test]
    fn filter_preserves_order() {
        let articles = vec![
            article(json!({ "title": "b wheat" })),
            article(json!({ "title": "a wheat" })),
            article(json!({ "title": "corn" })),
        ];
        let state = FilterState::default().commit_search_with("wheat");
        let titles: Vec<_> = filter(&articles, &state)
            .into_iter()
            .map(|a| a.view.title.as_str())
            .collect();
        assert_eq!(titles, vec!["b wheat", "a wheat"]);
    }

    #[test]
    fn summary_line() {
        let s = FilterSummary { shown: 0, total: 0 };
        assert_eq!(s.to_string(), "Showing 0 of 0");
    }
}
