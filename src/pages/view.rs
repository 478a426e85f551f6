//! View-model pieces shared by the page templates

use crate::catalog::navigator::NavLink;
use crate::catalog::pagination::{pagination, PageToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub label: String,
    pub href: String,
    pub active: bool,
    pub disabled: bool,
}

/// Links for the pagination bar. Ellipsis entries are disabled and point at
/// the current page.
pub fn page_links(current: u32, total: u32, search: &str) -> Vec<PageLink> {
    let search = urlencoding::encode(search);
    pagination(current, total)
        .into_iter()
        .map(|token| {
            let target = match token {
                PageToken::Page(page) => page,
                PageToken::Ellipsis => current,
            };
            PageLink {
                label: token.to_string(),
                href: format!("/?page={}&search={}", target, search),
                active: token == PageToken::Page(current),
                disabled: token == PageToken::Ellipsis,
            }
        })
        .collect()
}

/// Previous/next button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavButton {
    pub href: String,
    pub enabled: bool,
}

impl NavButton {
    pub fn new(link: NavLink, href: impl FnOnce(i64) -> String) -> Self {
        Self {
            href: href(link.number),
            enabled: link.enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLink {
    pub title: String,
    pub href: String,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_links_mark_current_and_ellipsis() {
        let links = page_links(10, 20, "one piece");

        let labels: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "...", "8", "9", "10", "11", "12", "...", "20"]);

        let current = links.iter().find(|l| l.active).unwrap();
        assert_eq!(current.label, "10");
        assert_eq!(current.href, "/?page=10&search=one%20piece");

        assert!(links[1].disabled);
        assert_eq!(links[1].href, "/?page=10&search=one%20piece");
        assert!(!links[0].disabled);
    }

    #[test]
    fn test_nav_button() {
        let button = NavButton::new(NavLink { number: 0, enabled: false }, |n| format!("/e/{}", n));
        assert_eq!(button.href, "/e/0");
        assert!(!button.enabled);
    }
}
