//! Page windows over the dataset and global/page-local index mapping.
//! Everything here is a pure function of its arguments.

use std::ops::Range;

pub const PAGE_SIZE: usize = 10;
const MAX_PAGE_LINKS: usize = 5;

/// `max(1, ceil(len / PAGE_SIZE))`
pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE).max(1)
}

pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// Global index range covered by `page` (clamped) over `len` records.
pub fn window_range(len: usize, page: usize) -> Range<usize> {
    let page = clamp_page(page, page_count(len));
    let start = ((page - 1) * PAGE_SIZE).min(len);
    let end = (start + PAGE_SIZE).min(len);
    start..end
}

pub fn window<T>(items: &[T], page: usize) -> &[T] {
    &items[window_range(items.len(), page)]
}

pub fn global_index(page: usize, local_index: usize) -> usize {
    (page.max(1) - 1) * PAGE_SIZE + local_index
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePosition {
    pub page: usize,
    pub local_index: usize,
}

pub fn locate(global_index: usize) -> PagePosition {
    PagePosition {
        page: global_index / PAGE_SIZE + 1,
        local_index: global_index % PAGE_SIZE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub page: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub target: usize,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub previous: NavLink,
    pub pages: Vec<PageLink>,
    pub next: NavLink,
}

impl PageLinks {
    pub fn page_numbers(&self) -> Vec<usize> {
        self.pages.iter().map(|link| link.page).collect()
    }
}

/// At most five numbered links around `current`: anchored two pages before
/// it, shifted right past page 1, then shifted left to end at `page_count`.
pub fn page_links(current: usize, page_count: usize) -> PageLinks {
    let page_count = page_count.max(1);
    let current = clamp_page(current, page_count);

    let mut start = current.saturating_sub(2).max(1);
    let mut end = start + MAX_PAGE_LINKS - 1;
    if end > page_count {
        end = page_count;
        start = end.saturating_sub(MAX_PAGE_LINKS - 1).max(1);
    }

    PageLinks {
        previous: NavLink {
            target: current.saturating_sub(1).max(1),
            enabled: current > 1,
        },
        pages: (start..=end)
            .map(|page| PageLink {
                page,
                active: page == current,
            })
            .collect(),
        next: NavLink {
            target: (current + 1).min(page_count),
            enabled: current < page_count,
        },
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
