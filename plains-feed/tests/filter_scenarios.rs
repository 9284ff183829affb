use plains_feed::{Article, FilterState, FilterSummary, RawArticle, filter, normalize_all};
use serde_json::{Value, json};

fn articles(values: Vec<Value>) -> Vec<Article> {
    normalize_all(values.into_iter().map(RawArticle::from_value).collect())
}

fn ids(shown: &[&Article]) -> Vec<String> {
    shown.iter().map(|a| a.view.id.clone()).collect()
}

fn field_guide() -> Vec<Article> {
    articles(vec![
        json!({
            "nid": 1,
            "title": "Spring checklist",
            "categorization": { "tags": { "values": [ { "name": "Corn" }, { "name": "Soil" } ] } },
            "body": { "value": "<p>Boost <strong>yield</strong> with early scouting.</p>" }
        }),
        json!({
            "nid": 2,
            "title": "Liming acidic ground",
            "tags": "Soil",
            "body": { "summary": "Raise pH before planting." }
        }),
        json!({
            "nid": 3,
            "title": "Yield monitors explained",
            "body": { "value": "<p>Calibration tips.</p>" }
        }),
    ])
}

#[test]
fn tag_and_committed_query_narrow_to_one_article() {
    let all = field_guide();
    let state = FilterState::default()
        .select_tag("Soil")
        .commit_search_with("yield");
    assert_eq!(ids(&filter(&all, &state)), vec!["1"]);
}

#[test]
fn uncommitted_draft_does_not_filter() {
    let all = field_guide();
    let state = FilterState::default().edit_search("yield");
    assert_eq!(filter(&all, &state).len(), 3);
}

#[test]
fn reset_returns_the_tag_only_set() {
    let all = field_guide();
    let state = FilterState::default()
        .select_tag("Soil")
        .commit_search_with("wheat");
    assert!(filter(&all, &state).is_empty());

    let state = state.reset_search();
    assert_eq!(ids(&filter(&all, &state)), vec!["1", "2"]);

    let state = state.clear_tag();
    assert_eq!(filter(&all, &state).len(), all.len());
}

#[test]
fn search_reaches_stripped_body_text() {
    let all = articles(vec![json!({
        "title": "Soil pH",
        "body": { "summary": "short", "value": "<p>nitrogen basics</p>" }
    })]);
    let state = FilterState::default().commit_search_with("nitrogen");
    assert_eq!(filter(&all, &state).len(), 1);
    // normalized summary comes from body.summary and does not mention it
    assert_eq!(all[0].view.summary, "short");
}

#[test]
fn tag_selection_is_case_sensitive() {
    let all = articles(vec![json!({
        "categorization": { "tags": { "values": [ { "name": "corn" } ] } }
    })]);
    let state = FilterState::default().select_tag("Corn");
    assert!(filter(&all, &state).is_empty());
}

#[test]
fn count_line_tracks_the_filtered_set() {
    let all = field_guide();
    let state = FilterState::default().select_tag("Corn");
    let shown = filter(&all, &state);
    let summary = FilterSummary {
        shown: shown.len(),
        total: all.len(),
    };
    assert_eq!(summary.to_string(), "Showing 1 of 3");
}
