//! Page count and page-number window for the pagination control

use crate::constants::MAX_VISIBLE_PAGES;
use serde::Serialize;
use std::fmt;

/// Number of pages needed for `total` items, `per_page` at a time.
/// A zero page size is treated as one.
pub fn page_count(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One slot of the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Pagination position over a fixed item count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total_items: u64,
    per_page: u32,
    current: u32,
}

impl Pagination {
    /// Creates a pagination, clamping `current` into `[1, max(1, page_count)]`
    pub fn new(total_items: u64, per_page: u32, current: u32) -> Self {
        let per_page = per_page.max(1);
        let mut pagination = Self {
            total_items,
            per_page,
            current: 1,
        };
        pagination.current = pagination.clamp(current);
        pagination
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total_items, self.per_page)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Clamps a requested page into the valid range
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.page_count().max(1))
    }

    /// The control is only shown with more than one page
    pub fn should_render(&self) -> bool {
        self.page_count() > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev().then(|| self.current - 1)
    }

    /// Target page if `page` is a valid jump, `None` otherwise
    pub fn go_to(&self, page: u32) -> Option<u32> {
        (1..=self.page_count()).contains(&page).then_some(page)
    }

    /// Page numbers to display, with ellipsis for elided runs
    ///
    /// Up to five pages are listed in full. Beyond that the first and last
    /// page are always shown, together with a window near the current page.
    pub fn items(&self) -> Vec<PageItem> {
        let total = self.page_count();
        if total <= 1 {
            return Vec::new();
        }

        if total <= MAX_VISIBLE_PAGES {
            return (1..=total).map(PageItem::Page).collect();
        }

        let current = self.current;
        let mut items = Vec::with_capacity(7);
        if current <= 3 {
            items.extend((1..=4).map(PageItem::Page));
            items.push(PageItem::Ellipsis);
            items.push(PageItem::Page(total));
        } else if current >= total - 2 {
            items.push(PageItem::Page(1));
            items.push(PageItem::Ellipsis);
            items.extend((total - 3..=total).map(PageItem::Page));
        } else {
            items.push(PageItem::Page(1));
            items.push(PageItem::Ellipsis);
            items.extend((current - 1..=current + 1).map(PageItem::Page));
            items.push(PageItem::Ellipsis);
            items.push(PageItem::Page(total));
        }
        items
    }

    /// "Page X of Y" caption
    pub fn caption(&self) -> String {
        format!("Page {} of {}", self.current, self.page_count().max(1))
    }
}
