// Client-side pagination over the filtered result

use std::fmt;

pub const MAX_VISIBLE_PAGES: usize = 5;

/// One of the selectable page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(usize);

impl PageSize {
    pub const CHOICES: [PageSize; 4] = [PageSize(16), PageSize(32), PageSize(48), PageSize(64)];
    pub const DEFAULT: PageSize = PageSize(32);

    pub fn new(n: usize) -> Option<Self> {
        Self::CHOICES.into_iter().find(|p| p.0 == n)
    }

    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<usize>().ok().and_then(Self::new)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    current_page: usize,
    page_size: PageSize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(PageSize::DEFAULT)
    }
}

impl Cursor {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            current_page: 1,
            page_size,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.reset();
    }

    /// Move to `page`; returns false (and changes nothing) when `page` is out
    /// of `1..=total_pages` or already current.
    pub fn change_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page < 1 || page > total_pages || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }
}

pub fn total_pages(len: usize, page_size: PageSize) -> usize {
    len.div_ceil(page_size.get())
}

/// The items on the cursor's page; empty past the end.
pub fn visible_slice<'a, T>(items: &'a [T], cursor: &Cursor) -> &'a [T] {
    let size = cursor.page_size.get();
    let start = (cursor.current_page - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + size).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Page links around `current`: a window of up to `max_visible` numbers,
/// shifted to stay full near either end, plus the first and last page (with
/// an ellipsis for any gap) when they fall outside it.
pub fn page_window(total_pages: usize, current: usize, max_visible: usize) -> Vec<PageLink> {
    if total_pages == 0 || max_visible == 0 {
        return Vec::new();
    }
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total_pages);
    if end - start < max_visible - 1 {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    let page = |number| PageLink::Page {
        number,
        current: number == current,
    };
    let mut links = Vec::with_capacity(max_visible + 4);
    if start > 1 {
        links.push(page(1));
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
    }
    links.extend((start..=end).map(page));
    if end < total_pages {
        if end < total_pages - 1 {
            links.push(PageLink::Ellipsis);
        }
        links.push(page(total_pages));
    }
    links
}
