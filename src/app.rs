// App state and main event loop.
// Maps keys to search and pagination actions and runs fetches on the tokio runtime.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::cache::{RepoPagesCache, SearchCache};
use crate::config::Config;
use crate::error::Result;
use crate::github::{GitHubClient, Repository, User};
use crate::state::{PageRequest, SearchState};
use crate::ui;

/// Which widget receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    List,
}

/// Results posted by background fetch tasks.
#[derive(Debug)]
pub enum AppEvent {
    SearchFinished {
        query: String,
        result: Result<Vec<User>>,
        fetched_at: Option<DateTime<Utc>>,
    },
    PageLoaded {
        login: String,
        page: u32,
        result: Result<Vec<Repository>>,
    },
}

/// Main application state.
pub struct App {
    /// Search screen state.
    pub search: SearchState,
    /// Widget receiving key presses.
    pub focus: Focus,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    /// Whether requests carry a token.
    pub authenticated: bool,
    client: GitHubClient,
    search_cache: SearchCache,
    repo_cache: RepoPagesCache,
    runtime: Handle,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: &Config, client: GitHubClient, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            search: SearchState::new(config.repo_per_page),
            focus: Focus::default(),
            show_help: false,
            should_quit: false,
            authenticated: config.is_authenticated(),
            client,
            search_cache: SearchCache::new(config.stale_after),
            repo_cache: RepoPagesCache::new(config.repo_per_page, config.stale_after),
            runtime,
            events_tx,
            events_rx,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.drain_events();
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard and other terminal events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Apply every result posted since the last frame.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
    }

    /// Apply one background result to the state.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished {
                query,
                result,
                fetched_at,
            } => self.search.search_finished(&query, result, fetched_at),
            AppEvent::PageLoaded {
                login,
                page,
                result,
            } => self.search.page_loaded(&login, page, result),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }
        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::List => self.handle_list_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Some(query) = self.search.submit() {
                    self.spawn_search(query);
                    self.focus = Focus::List;
                }
            }
            KeyCode::Esc => self.focus = Focus::List,
            KeyCode::Backspace => self.search.pop_char(),
            KeyCode::Char(c) => self.search.push_char(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') | KeyCode::Char('i') => self.focus = Focus::Input,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => self.search.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.search.select_next(),
            KeyCode::Char('J') => self.search.scroll_repos_down(3),
            KeyCode::Char('K') => self.search.scroll_repos_up(3),
            KeyCode::PageDown => self.search.scroll_repos_down(12),
            KeyCode::PageUp => self.search.scroll_repos_up(12),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let request = self.search.toggle_selected();
                self.spawn_page(request);
            }
            KeyCode::Char('m') => {
                let request = self.search.load_more_selected();
                self.spawn_page(request);
            }
            KeyCode::Char('l') => self.search.show_less_selected(),
            KeyCode::Char('r') => self.refresh_selected(),
            _ => {}
        }
    }

    /// Refetch the selected user's repositories when its cache is stale.
    fn refresh_selected(&mut self) {
        let Some(login) = self.search.selected_expanded_login() else {
            return;
        };
        if !self.repo_cache.is_stale(&login) {
            debug!(login, "repositories still fresh, refresh skipped");
            return;
        }
        self.repo_cache.invalidate(&login);
        let request = self.search.refresh_selected();
        self.spawn_page(request);
    }

    /// Fetch users for `query` in the background.
    fn spawn_search(&self, query: String) {
        info!(query, "searching users");
        let cache = self.search_cache.clone();
        let client = self.client.clone();
        let tx = self.events_tx.clone();

        self.runtime.spawn(async move {
            let fetch_query = query.clone();
            let result = cache
                .submit(&query, move || async move {
                    client.search_users(&fetch_query).await
                })
                .await;
            if let Err(err) = &result {
                warn!(query, error = %err, "user search failed");
            }
            let fetched_at = cache.peek(&query).map(|entry| entry.fetched_at);
            let _ = tx.send(AppEvent::SearchFinished {
                query,
                result,
                fetched_at,
            });
        });
    }

    /// Fetch one repository page in the background.
    fn spawn_page(&self, request: Option<PageRequest>) {
        let Some(PageRequest { login, page }) = request else {
            return;
        };
        debug!(login, page, "loading repository page");
        let cache = self.repo_cache.clone();
        let client = self.client.clone();
        let per_page = cache.per_page();
        let tx = self.events_tx.clone();

        self.runtime.spawn(async move {
            let fetch_login = login.clone();
            let result = cache
                .load_page(&login, page, move || async move {
                    client.list_user_repos(&fetch_login, page, per_page).await
                })
                .await;
            if let Err(err) = &result {
                warn!(
                    login,
                    page,
                    status = ?err.status(),
                    error = %err,
                    "repository page failed"
                );
            }
            let _ = tx.send(AppEvent::PageLoaded {
                login,
                page,
                result,
            });
        });
    }

    /// Wait for the next background result and apply it.
    #[cfg(test)]
    pub async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
    }
}
