//! Everything the terminal shows, as plain state. Key handling and command
//! routing live here so they can be driven without a terminal.
use crate::command::{Command, parse_command};
use crate::input::LineEditor;
use crate::notice::Notice;
use crate::styles;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use plains_feed::extract::tag_catalog_labels;
use plains_feed::{
    Article, FilterAction, FilterState, FilterSummary, LoadOutcome, filter, normalize_all,
};
use std::mem;

const MAX_NOTICES: usize = 200;
const PAGE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// Fetch failed; the message is shown in place of the list.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Screen {
    load: LoadState,
    articles: Vec<Article>,
    catalog: Vec<String>,
    filter: FilterState,
    editor: LineEditor,
    notices: Vec<Notice>,
    scroll: usize,
    dirty: bool,
}

impl Screen {
    /// Screen waiting for the first load, starting from `filter`.
    pub fn new(filter: FilterState) -> Self {
        let editor = LineEditor::with_text(filter.search.draft.clone());
        Self {
            load: LoadState::Loading,
            articles: Vec::new(),
            catalog: Vec::new(),
            filter,
            editor,
            notices: vec![Notice::new(
                "Type to search, Enter to apply. `/help` lists commands.",
                styles::SYSTEM,
            )],
            scroll: 0,
            dirty: true,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Index of the first visible article.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn visible(&self) -> Vec<&Article> {
        filter(&self.articles, &self.filter)
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            shown: self.visible().len(),
            total: self.articles.len(),
        }
    }

    /// Status bar text: loading, the fetch error, or the result count.
    pub fn status_line(&self) -> String {
        match &self.load {
            LoadState::Loading => "Loading articles…".to_string(),
            LoadState::Failed(message) => message.clone(),
            LoadState::Loaded => self.summary().to_string(),
        }
    }

    /// Catalog labels first, then any article label the catalog lacks.
    pub fn tag_labels(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let from_articles = self.articles.iter().flat_map(|a| a.view.tag_labels.iter());
        for label in self.catalog.iter().chain(from_articles) {
            if !out.contains(label) {
                out.push(label.clone());
            }
        }
        out
    }

    /// Whether the screen changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        mem::replace(&mut self.dirty, false)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded(feed) => {
                self.catalog = tag_catalog_labels(&feed.tags);
                self.articles = normalize_all(feed.articles);
                self.load = LoadState::Loaded;
                tracing::info!(
                    articles = self.articles.len(),
                    tags = self.catalog.len(),
                    "tui.feed.loaded"
                );
            }
            LoadOutcome::Failed(err) => {
                self.articles.clear();
                self.catalog.clear();
                self.load = LoadState::Failed(err.to_string());
                self.notice(format!("× Could not load articles: {err}"), styles::ERROR);
                tracing::warn!(error = %err, "tui.feed.failed");
            }
            LoadOutcome::Cancelled => return,
        }
        self.scroll = 0;
        self.dirty = true;
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.notice(format!("× Error: {}", message.into()), styles::ERROR);
    }

    fn notice(&mut self, text: impl Into<String>, style: ratatui::style::Style) {
        self.notices.push(Notice::new(text, style));
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
        self.dirty = true;
    }

    fn update(&mut self, action: FilterAction) {
        let refilters = !matches!(action, FilterAction::EditSearch(_));
        self.filter = mem::take(&mut self.filter).apply(action);
        if refilters {
            self.scroll = 0;
        }
        self.dirty = true;
    }

    /// Keep the draft in step with the input box, unless a command is being
    /// typed.
    fn sync_draft(&mut self) {
        if !self.editor.text().starts_with('/') {
            self.update(FilterAction::EditSearch(self.editor.text().to_string()));
        }
        self.dirty = true;
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.visible().len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
        self.dirty = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Flow::Quit,
            (KeyCode::Enter, _) => return self.submit(),
            (KeyCode::Up, _) => self.scroll_by(-1),
            (KeyCode::Down, _) => self.scroll_by(1),
            (KeyCode::PageUp, _) => self.scroll_by(-(PAGE as isize)),
            (KeyCode::PageDown, _) => self.scroll_by(PAGE as isize),
            (KeyCode::Left, _) => {
                self.editor.left();
                self.dirty = true;
            }
            (KeyCode::Right, _) => {
                self.editor.right();
                self.dirty = true;
            }
            (KeyCode::Home, _) => {
                self.editor.home();
                self.dirty = true;
            }
            (KeyCode::End, _) => {
                self.editor.end();
                self.dirty = true;
            }
            (KeyCode::Backspace, _) => {
                self.editor.backspace();
                self.sync_draft();
            }
            (KeyCode::Delete, _) => {
                self.editor.delete();
                self.sync_draft();
            }
            (KeyCode::Esc, _) => {
                self.editor.clear();
                self.sync_draft();
            }
            (KeyCode::Char(ch), _) => {
                self.editor.insert(ch);
                self.sync_draft();
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Enter: run a `/command`, or commit the input box as the search.
    pub fn submit(&mut self) -> Flow {
        let line = self.editor.text().trim().to_string();
        if line.starts_with('/') {
            self.editor.set(self.filter.search.draft.clone());
            self.dirty = true;
            return self.run_command(parse_command(&line));
        }
        self.update(FilterAction::EditSearch(self.editor.text().to_string()));
        self.update(FilterAction::CommitSearch);
        tracing::debug!(query = %self.filter.applied_query(), "tui.search.commit");
        Flow::Continue
    }

    pub fn run_command(&mut self, cmd: Command) -> Flow {
        match cmd {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                self.notice("Commands:", styles::LABEL);
                for line in [
                    "  <text> + Enter   search titles and article text",
                    "  /tag <label>     show only articles with this tag",
                    "  /tag             show the selected tag",
                    "  /clear           drop the tag filter",
                    "  /reset           clear the search",
                    "  /tags            list available tags",
                    "  /quit            exit",
                ] {
                    self.notice(line, styles::VALUE);
                }
            }
            Command::Tag(Some(label)) => {
                if !self.tag_labels().contains(&label) {
                    self.notice(format!("No article is tagged `{label}`."), styles::DIM);
                }
                self.notice(format!("Filtering by: {label}"), styles::SYSTEM);
                self.update(FilterAction::SelectTag(label));
            }
            Command::Tag(None) => match self.filter.selected_tag.clone() {
                Some(label) => self.notice(format!("Filtering by: {label}"), styles::SYSTEM),
                None => self.notice("No tag selected. Use `/tag <label>`.", styles::DIM),
            },
            Command::Clear => {
                if self.filter.selected_tag.is_some() {
                    self.update(FilterAction::ClearTag);
                    self.notice("✓ Cleared tag filter.", styles::SYSTEM);
                } else {
                    self.notice("No tag selected.", styles::DIM);
                }
            }
            Command::Reset => {
                if self.filter.can_reset() {
                    self.update(FilterAction::ResetSearch);
                    self.editor.clear();
                    self.notice("✓ Search reset.", styles::SYSTEM);
                } else {
                    self.notice("Nothing to reset.", styles::DIM);
                }
            }
            Command::Tags => {
                let labels = self.tag_labels();
                if labels.is_empty() {
                    self.notice("No tags available.", styles::DIM);
                } else {
                    self.notice("Tags:", styles::LABEL);
                    self.notice(format!("  {}", labels.join(", ")), styles::VALUE);
                }
            }
            Command::Unknown(s) => {
                self.notice(format!("× Unknown command: {s}"), styles::ERROR);
                self.notice("Try `/help`.", styles::DIM);
            }
        }
        Flow::Continue
    }
}
