// Per-user repository pagination.
// Separates pages fetched from the network from pages revealed in the UI.

use tracing::debug;

use crate::error::Result;
use crate::github::Repository;

/// Request for one page of a user's repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub login: String,
    pub page: u32,
}

/// Reveal and fetch bookkeeping for one user's repositories.
///
/// Revealed repositories are always the first `revealed_pages` fetched
/// pages. While a page is in flight `revealed_pages` may be one past the
/// fetched count; it never goes further.
#[derive(Debug, Clone)]
pub struct RepoPager {
    login: String,
    per_page: u32,
    expanded: bool,
    revealed_pages: usize,
    pages: Vec<Vec<Repository>>,
    has_more_on_server: bool,
    /// Page number currently being fetched.
    fetching: Option<u32>,
    /// Last fetch error, shown inline in this user's section.
    error: Option<String>,
}

impl RepoPager {
    pub fn new(login: impl Into<String>, per_page: u32) -> Self {
        Self {
            login: login.into(),
            per_page,
            expanded: false,
            revealed_pages: 1,
            pages: Vec::new(),
            has_more_on_server: true,
            fetching: None,
            error: None,
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn revealed_pages(&self) -> usize {
        self.revealed_pages
    }

    pub fn fetched_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn has_more_on_server(&self) -> bool {
        self.has_more_on_server
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// First page requested and not yet arrived.
    pub fn is_loading_first_page(&self) -> bool {
        self.pages.is_empty() && self.fetching.is_some()
    }

    /// A page after the first is in flight.
    pub fn is_loading_more(&self) -> bool {
        !self.pages.is_empty() && self.fetching.is_some()
    }

    /// Show this user's repositories, fetching page 1 if nothing is cached.
    pub fn expand(&mut self) -> Option<PageRequest> {
        self.expanded = true;
        if self.pages.is_empty() && self.fetching.is_none() {
            self.revealed_pages = 1;
            self.error = None;
            return self.request(1);
        }
        None
    }

    /// Hide the section. Pages and the reveal count are kept.
    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    pub fn toggle(&mut self) -> Option<PageRequest> {
        if self.expanded {
            self.collapse();
            None
        } else {
            self.expand()
        }
    }

    /// Reveal one more page, fetching it first when every fetched page is shown.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.fetching.is_some() {
            return None;
        }
        let fetched = self.pages.len();
        if self.revealed_pages < fetched {
            self.revealed_pages += 1;
            None
        } else if fetched > 0 && self.has_more_on_server {
            self.revealed_pages = fetched + 1;
            self.request(fetched as u32 + 1)
        } else {
            None
        }
    }

    /// Collapse the reveal count back to the first page.
    pub fn show_less(&mut self) {
        self.revealed_pages = 1;
    }

    /// More repositories can be shown, cached or on the server.
    pub fn has_more(&self) -> bool {
        self.has_more_on_server || self.revealed_pages < self.pages.len()
    }

    /// Forget fetched pages and request page 1 again.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        self.pages.clear();
        self.revealed_pages = 1;
        self.has_more_on_server = true;
        self.fetching = None;
        self.error = None;
        self.expanded = true;
        self.request(1)
    }

    /// Apply the outcome of a page request.
    pub fn page_loaded(&mut self, page: u32, result: Result<Vec<Repository>>) {
        if self.fetching != Some(page) {
            debug!(login = %self.login, page, "ignoring unexpected page result");
            return;
        }
        self.fetching = None;

        match result {
            Ok(repos) => {
                if page as usize != self.pages.len() + 1 {
                    return;
                }
                if repos.len() < self.per_page as usize {
                    self.has_more_on_server = false;
                }
                if repos.is_empty() && page > 1 {
                    // The previous page ended exactly on a page boundary.
                    self.revealed_pages = self.pages.len();
                } else {
                    self.pages.push(repos);
                }
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.revealed_pages = self.revealed_pages.min(self.pages.len()).max(1);
            }
        }
    }

    /// Repositories currently shown: the first `revealed_pages` pages.
    pub fn visible_repos(&self) -> Vec<&Repository> {
        self.pages
            .iter()
            .take(self.revealed_pages)
            .flatten()
            .collect()
    }

    fn request(&mut self, page: u32) -> Option<PageRequest> {
        self.fetching = Some(page);
        Some(PageRequest {
            login: self.login.clone(),
            page,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ExplorerError;

    use super::*;

    fn page_of(start: u64, count: u64) -> Vec<Repository> {
        (start..start + count)
            .map(|id| Repository {
                id,
                name: format!("repo-{}", id),
                description: None,
                stargazers_count: 0,
                html_url: format!("https://github.com/user1/repo-{}", id),
            })
            .collect()
    }

    /// Expand and deliver a first page of `count` repositories.
    fn loaded_pager(count: u64) -> RepoPager {
        let mut pager = RepoPager::new("user1", 8);
        let req = pager.expand().unwrap();
        pager.page_loaded(req.page, Ok(page_of(1, count)));
        pager
    }

    #[test]
    fn test_expand_requests_first_page() {
        let mut pager = RepoPager::new("user1", 8);
        let req = pager.expand();

        assert_eq!(
            req,
            Some(PageRequest {
                login: "user1".to_string(),
                page: 1
            })
        );
        assert!(pager.is_expanded());
        assert!(pager.is_loading_first_page());
        assert_eq!(pager.revealed_pages(), 1);
    }

    #[test]
    fn test_full_first_page_has_more() {
        let pager = loaded_pager(8);

        assert!(pager.has_more_on_server());
        assert!(pager.has_more());
        assert_eq!(pager.visible_repos().len(), 8);
    }

    #[test]
    fn test_short_first_page_has_no_more() {
        let mut pager = loaded_pager(3);

        assert!(!pager.has_more_on_server());
        assert!(!pager.has_more());
        assert_eq!(pager.load_more(), None);
        assert_eq!(pager.revealed_pages(), 1);
    }

    #[test]
    fn test_load_more_until_short_page() {
        let mut pager = loaded_pager(8);

        let req = pager.load_more().unwrap();
        assert_eq!(req.page, 2);
        assert_eq!(pager.revealed_pages(), 2);
        assert!(pager.is_loading_more());
        // Visible list only grows once the page arrives.
        assert_eq!(pager.visible_repos().len(), 8);
        // No duplicate request while in flight.
        assert_eq!(pager.load_more(), None);

        pager.page_loaded(2, Ok(page_of(9, 8)));
        let req = pager.load_more().unwrap();
        assert_eq!(req.page, 3);
        pager.page_loaded(3, Ok(page_of(17, 5)));

        assert_eq!(pager.visible_repos().len(), 21);
        assert!(!pager.has_more());
        assert_eq!(pager.load_more(), None);
        assert_eq!(pager.load_more(), None);
        assert_eq!(pager.revealed_pages(), 3);
    }

    #[test]
    fn test_show_less_then_load_more_uses_cached_pages() {
        let mut pager = loaded_pager(8);
        let req = pager.load_more().unwrap();
        pager.page_loaded(req.page, Ok(page_of(9, 8)));

        pager.show_less();
        assert_eq!(pager.revealed_pages(), 1);
        assert_eq!(pager.visible_repos().len(), 8);
        assert!(pager.has_more());

        assert_eq!(pager.load_more(), None);
        assert_eq!(pager.revealed_pages(), 2);
        assert_eq!(pager.visible_repos().len(), 16);
        assert_eq!(pager.fetched_pages(), 2);
    }

    #[test]
    fn test_collapse_and_reexpand_keeps_state() {
        let mut pager = loaded_pager(8);
        let req = pager.load_more().unwrap();
        pager.page_loaded(req.page, Ok(page_of(9, 8)));

        pager.collapse();
        assert!(!pager.is_expanded());
        assert_eq!(pager.expand(), None);
        assert_eq!(pager.revealed_pages(), 2);
        assert_eq!(pager.visible_repos().len(), 16);

        assert_eq!(pager.toggle(), None);
        assert_eq!(pager.toggle(), None);
        assert!(pager.is_expanded());
    }

    #[test]
    fn test_empty_page_on_boundary_ends_pagination() {
        let mut pager = loaded_pager(8);
        let req = pager.load_more().unwrap();
        pager.page_loaded(req.page, Ok(Vec::new()));

        assert_eq!(pager.fetched_pages(), 1);
        assert_eq!(pager.revealed_pages(), 1);
        assert!(!pager.has_more());
    }

    #[test]
    fn test_error_is_scoped_and_recoverable() {
        let mut pager = RepoPager::new("ghost", 8);
        let req = pager.expand().unwrap();
        pager.page_loaded(
            req.page,
            Err(ExplorerError::Http {
                context: "Error fetching repos for user ghost".to_string(),
                status: 404,
            }),
        );

        assert_eq!(pager.error(), Some("Error fetching repos for user ghost: 404"));
        assert!(!pager.is_loading_first_page());
        assert_eq!(pager.load_more(), None);

        pager.collapse();
        assert!(pager.expand().is_some());
        assert_eq!(pager.error(), None);
    }

    #[test]
    fn test_failed_load_more_rolls_back_reveal() {
        let mut pager = loaded_pager(8);
        let req = pager.load_more().unwrap();
        pager.page_loaded(req.page, Err(ExplorerError::Network("reset".to_string())));

        assert_eq!(pager.revealed_pages(), 1);
        assert!(pager.error().is_some());
        assert_eq!(pager.load_more().map(|r| r.page), Some(2));
    }

    #[test]
    fn test_unexpected_page_ignored() {
        let mut pager = loaded_pager(8);
        pager.page_loaded(5, Ok(page_of(100, 8)));

        assert_eq!(pager.fetched_pages(), 1);
    }

    #[test]
    fn test_refresh_requests_first_page() {
        let mut pager = loaded_pager(3);
        let req = pager.refresh().unwrap();

        assert_eq!(req.page, 1);
        assert_eq!(pager.fetched_pages(), 0);
        assert!(pager.has_more_on_server());
        assert!(pager.is_loading_first_page());
    }
}
