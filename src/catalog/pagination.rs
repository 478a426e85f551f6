//! Page link sequence with ellipsis markers, e.g. `1 … 8 9 [10] 11 12 … 20`

use std::fmt;

/// Pages shown on each side of the current page
const DELTA: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(n) => write!(f, "{}", n),
            PageToken::Ellipsis => f.write_str("..."),
        }
    }
}

/// Page links to render for `current` out of `total` pages.
///
/// Page 1 is always present and the last page is present when `total > 1`.
/// Near either end the window widens so five interior pages stay visible.
pub fn pagination(current: u32, total: u32) -> Vec<PageToken> {
    let current = i64::from(current);
    let total = i64::from(total);

    let mut start = 2_i64.max(current - DELTA);
    let mut end = (total - 1).min(current + DELTA);

    if current - DELTA <= 1 {
        end = 5_i64.min(total - 1);
    }
    if current + DELTA >= total {
        start = (total - 4).max(2);
    }

    let mut tokens = vec![PageToken::Page(1)];
    if start > 2 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.extend((start..=end).map(|page| PageToken::Page(page as u32)));
    if end < total - 1 {
        tokens.push(PageToken::Ellipsis);
    }
    if total > 1 {
        tokens.push(PageToken::Page(total as u32));
    }
    tokens
}

pub fn total_pages(item_count: usize, page_size: usize) -> u32 {
    item_count.div_ceil(page_size.max(1)) as u32
}

/// Items of 1-based `page`; empty when the page is past the end
pub fn page_slice<T>(items: &[T], page: u32, page_size: usize) -> &[T] {
    let start = (page.max(1) as usize - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// Parses the `page` query value; anything but a positive integer is page 1
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}
