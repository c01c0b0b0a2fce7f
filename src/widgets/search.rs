//! Search dropdown view model

use crate::{constants::SEARCH_EMPTY_MESSAGE, loadable::Loadable, types::SearchResult};

/// What the search dropdown should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchStatus<'a> {
    /// Nothing typed; dropdown closed
    Idle,
    /// Query typed, results not in yet
    Loading,
    Results(&'a [SearchResult]),
    /// Query answered with no hits (or the search failed)
    NoMatches,
}

impl SearchStatus<'_> {
    /// Placeholder text, if the dropdown shows one instead of a list
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SearchStatus::Loading => Some("Searching..."),
            SearchStatus::NoMatches => Some(SEARCH_EMPTY_MESSAGE),
            SearchStatus::Idle | SearchStatus::Results(_) => None,
        }
    }
}

/// Derives the dropdown state from the typed query and the result slot
pub fn search_status<'a>(
    query: &str,
    results: &'a Loadable<Vec<SearchResult>>,
) -> SearchStatus<'a> {
    if query.trim().is_empty() {
        return SearchStatus::Idle;
    }
    match results.data() {
        Some(hits) if hits.is_empty() => SearchStatus::NoMatches,
        Some(hits) => SearchStatus::Results(hits),
        // typed but still debouncing or in flight
        None => SearchStatus::Loading,
    }
}

/// Rank badge, e.g. `#1`, or `#N/A` for unranked coins
pub fn rank_label(result: &SearchResult) -> String {
    match result.market_cap_rank {
        Some(rank) => format!("#{}", rank),
        None => "#N/A".to_string(),
    }
}
