//! Market state: the user-controlled parameters behind every fetch
//!
//! Setters return `true` when the value actually changed, which is what the
//! dashboard uses to decide whether a re-fetch is due.

use crate::{
    constants::{DEFAULT_PER_PAGE, TOTAL_ITEMS},
    gateway::MarketsQuery,
    pagination::Pagination,
    types::{Currency, DashboardMode, SortOrder, Theme},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    pub currency: Currency,
    pub sort_by: SortOrder,
    pub page: u32,
    pub per_page: u32,
    /// Assumed listing size; the API does not report one
    pub total_items: u64,
    /// Comma separated coin ids restricting the market list
    pub coin_filter: String,
    /// Text currently typed in the search box
    pub search_query: String,
    pub selected_coin: Option<String>,
    pub theme: Theme,
    pub mode: DashboardMode,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            sort_by: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            total_items: TOTAL_ITEMS,
            coin_filter: String::new(),
            search_query: String::new(),
            selected_coin: None,
            theme: Theme::default(),
            mode: DashboardMode::default(),
        }
    }
}

impl MarketState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.total_items, self.per_page, self.page)
    }

    pub fn set_currency(&mut self, currency: Currency) -> bool {
        replace(&mut self.currency, currency)
    }

    pub fn set_sort_by(&mut self, sort_by: SortOrder) -> bool {
        replace(&mut self.sort_by, sort_by)
    }

    /// Sets the page, clamped into the valid range
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = self.pagination().clamp(page);
        replace(&mut self.page, page)
    }

    /// Sets the page size (at least 1) and re-clamps the page
    pub fn set_per_page(&mut self, per_page: u32) -> bool {
        let changed = replace(&mut self.per_page, per_page.max(1));
        let page = self.pagination().clamp(self.page);
        replace(&mut self.page, page) || changed
    }

    /// Restricts the listing to the given ids, back to page 1
    pub fn set_coin_filter(&mut self, ids: &str) -> bool {
        let normalized = ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        let changed = replace(&mut self.coin_filter, normalized);
        if changed {
            self.page = 1;
        }
        changed
    }

    pub fn set_search_query(&mut self, query: &str) -> bool {
        replace(&mut self.search_query, query.to_string())
    }

    pub fn select_coin(&mut self, coin_id: &str) -> bool {
        replace(&mut self.selected_coin, Some(coin_id.to_string()))
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        replace(&mut self.theme, theme)
    }

    pub fn set_mode(&mut self, mode: DashboardMode) -> bool {
        replace(&mut self.mode, mode)
    }

    /// Page 1, no coin filter, no search text, default sort.
    /// Returns whether any fetch parameter changed.
    pub fn reset_filters(&mut self) -> bool {
        self.search_query.clear();
        let page = replace(&mut self.page, 1);
        let filter = replace(&mut self.coin_filter, String::new());
        let sort = replace(&mut self.sort_by, SortOrder::default());
        page || filter || sort
    }

    /// Parameters for the market listing request
    pub fn markets_query(&self) -> MarketsQuery {
        MarketsQuery {
            currency: self.currency,
            ids: self
                .coin_filter
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            order: self.sort_by,
            page: self.page,
            per_page: self.per_page,
            sparkline: false,
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
