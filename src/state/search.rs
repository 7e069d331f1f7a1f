// Search screen state.
// Holds the draft query, the user result list and one pager per expanded user.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::github::{Repository, User};

use super::list::SelectableList;
use super::pager::{PageRequest, RepoPager};

/// Complete state of the search screen.
#[derive(Debug)]
pub struct SearchState {
    /// Text being edited in the search input.
    pub draft: String,
    /// Last submitted (trimmed) query.
    pub submitted: Option<String>,
    /// Users matching the submitted query.
    pub users: SelectableList<User>,
    /// When the displayed result was fetched.
    pub fetched_at: Option<DateTime<Utc>>,
    /// First visible line of the selected user's repository panel.
    pub repo_scroll: u16,
    /// Pagers keyed by login, created on first expansion.
    pagers: HashMap<String, RepoPager>,
    per_page: u32,
}

impl SearchState {
    pub fn new(per_page: u32) -> Self {
        Self {
            draft: String::new(),
            submitted: None,
            users: SelectableList::new(),
            fetched_at: None,
            repo_scroll: 0,
            pagers: HashMap::new(),
            per_page,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn pop_char(&mut self) {
        self.draft.pop();
    }

    /// Submit the draft. Returns the query to fetch, or `None` for a blank draft.
    pub fn submit(&mut self) -> Option<String> {
        let query = self.draft.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.submitted = Some(query.clone());
        self.users.set_loading();
        Some(query)
    }

    /// Apply a finished search. Results for a superseded query are dropped.
    pub fn search_finished(
        &mut self,
        query: &str,
        result: Result<Vec<User>>,
        fetched_at: Option<DateTime<Utc>>,
    ) {
        if self.submitted.as_deref() != Some(query) {
            debug!(query, "dropping result of superseded search");
            return;
        }
        self.fetched_at = fetched_at;
        match result {
            Ok(users) => {
                // Users no longer listed lose their pagers; listed ones keep theirs.
                self.pagers
                    .retain(|login, _| users.iter().any(|u| &u.login == login));
                self.users.set_loaded(users);
            }
            Err(err) => {
                self.pagers.clear();
                self.users.set_error(err.to_string());
            }
        }
    }

    pub fn select_next(&mut self) {
        self.users.select_next();
        self.repo_scroll = 0;
    }

    pub fn select_prev(&mut self) {
        self.users.select_prev();
        self.repo_scroll = 0;
    }

    /// Scroll the repository panel. Rendering clamps to the content height.
    pub fn scroll_repos_down(&mut self, lines: u16) {
        self.repo_scroll = self.repo_scroll.saturating_add(lines);
    }

    pub fn scroll_repos_up(&mut self, lines: u16) {
        self.repo_scroll = self.repo_scroll.saturating_sub(lines);
    }

    /// Pager for `login`, if the user has been expanded.
    pub fn pager(&self, login: &str) -> Option<&RepoPager> {
        self.pagers.get(login)
    }

    fn selected_login(&self) -> Option<String> {
        self.users.selected_item().map(|user| user.login.clone())
    }

    fn selected_pager_mut(&mut self) -> Option<&mut RepoPager> {
        let login = self.selected_login()?;
        self.pagers.get_mut(&login)
    }

    /// Expand or collapse the selected user, creating its pager on first use.
    pub fn toggle_selected(&mut self) -> Option<PageRequest> {
        let login = self.selected_login()?;
        let per_page = self.per_page;
        self.repo_scroll = 0;
        self.pagers
            .entry(login.clone())
            .or_insert_with(|| RepoPager::new(login, per_page))
            .toggle()
    }

    pub fn load_more_selected(&mut self) -> Option<PageRequest> {
        self.selected_pager_mut()
            .filter(|pager| pager.is_expanded())?
            .load_more()
    }

    pub fn show_less_selected(&mut self) {
        if let Some(pager) = self.selected_pager_mut() {
            pager.show_less();
            self.repo_scroll = 0;
        }
    }

    /// Login of the selected user when its section is expanded.
    pub fn selected_expanded_login(&self) -> Option<String> {
        let login = self.selected_login()?;
        self.pagers
            .get(&login)
            .filter(|pager| pager.is_expanded())
            .map(|_| login)
    }

    pub fn refresh_selected(&mut self) -> Option<PageRequest> {
        self.selected_pager_mut()?.refresh()
    }

    /// Route a page result to its pager. Results for unmounted users are discarded.
    pub fn page_loaded(&mut self, login: &str, page: u32, result: Result<Vec<Repository>>) {
        match self.pagers.get_mut(login) {
            Some(pager) => pager.page_loaded(page, result),
            None => debug!(login, page, "discarding page for unmounted user"),
        }
    }
}
