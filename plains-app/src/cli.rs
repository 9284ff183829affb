use clap::Parser;
use plains_feed::FilterState;
use std::path::PathBuf;

/// Browse Great Plains agronomy articles by tag and keyword.
#[derive(Debug, Parser)]
#[command(name = "plains", version)]
pub struct Cli {
    /// YAML config file. Without it, `plains.yaml` is read if present.
    #[arg(long, env = "PLAINS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Feed URL, overriding `feed.endpoint`.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Start filtered to this tag (exact, case-sensitive).
    #[arg(long)]
    pub tag: Option<String>,

    /// Start with this search applied.
    #[arg(long)]
    pub search: Option<String>,

    /// Print the filtered list to stdout instead of opening the browser.
    #[arg(long)]
    pub print: bool,

    /// With --print, emit the normalized articles as JSON.
    #[arg(long, requires = "print")]
    pub json: bool,
}

impl Cli {
    /// Filter the session starts from: `--tag` selected, `--search` committed.
    pub fn initial_filter(&self) -> FilterState {
        let mut state = FilterState::default();
        if let Some(tag) = &self.tag {
            state = state.select_tag(tag.clone());
        }
        if let Some(query) = &self.search {
            state = state.commit_search_with(query.clone());
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_seed_the_filter() {
        let cli = Cli::try_parse_from(["plains", "--tag", "Soil", "--search", "lime"]).unwrap();
        let state = cli.initial_filter();
        assert_eq!(state.selected_tag.as_deref(), Some("Soil"));
        assert_eq!(state.search.draft, "lime");
        assert_eq!(state.applied_query(), "lime");
    }

    #[test]
    fn json_requires_print() {
        assert!(Cli::try_parse_from(["plains", "--json"]).is_err());
        let cli = Cli::try_parse_from(["plains", "--print", "--json"]).unwrap();
        assert!(cli.print && cli.json);
    }
}
