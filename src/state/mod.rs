// State management module.
// Search input, user list selection and per-user repository pagination.

#![allow(dead_code)]

pub mod list;
pub mod pager;
pub mod search;

#[allow(unused_imports)]
pub use list::{LoadingState, SelectableList};
pub use pager::{PageRequest, RepoPager};
pub use search::SearchState;
