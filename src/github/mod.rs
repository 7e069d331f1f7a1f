// GitHub API module.
// Provides the client and types for the two REST endpoints ghx uses.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::GitHubClient;
pub use types::{Repository, User};
