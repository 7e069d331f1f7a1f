// Loading and selection state for lists.
// Tracks async load status and keyboard selection for the user list.

use ratatui::widgets::ListState;

/// Loading state for async data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadingState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// State for a selectable list with keyboard navigation.
#[derive(Debug, Clone)]
pub struct SelectableList<T> {
    pub data: LoadingState<Vec<T>>,
    pub list_state: ListState,
}

impl<T> Default for SelectableList<T> {
    fn default() -> Self {
        Self {
            data: LoadingState::Idle,
            list_state: ListState::default(),
        }
    }
}

impl<T> SelectableList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded items, empty while idle, loading or failed.
    pub fn items(&self) -> &[T] {
        self.data.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get the currently selected index.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Select the next item in the list.
    pub fn select_next(&mut self) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= len - 1 => i, // Stay at end
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item in the list.
    pub fn select_prev(&mut self) {
        if self.items().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Get the selected item.
    pub fn selected_item(&self) -> Option<&T> {
        let index = self.list_state.selected()?;
        self.items().get(index)
    }

    /// Reset selection to first item.
    pub fn reset_selection(&mut self) {
        if self.items().is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    /// Set loaded data.
    pub fn set_loaded(&mut self, items: Vec<T>) {
        self.data = LoadingState::Loaded(items);
        self.reset_selection();
    }

    /// Set loading state.
    pub fn set_loading(&mut self) {
        self.data = LoadingState::Loading;
    }

    /// Set error state.
    pub fn set_error(&mut self, error: String) {
        self.data = LoadingState::Error(error);
        self.list_state.select(None);
    }
}
