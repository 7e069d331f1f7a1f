// GitHub API response types.
// Defines structs for deserializing GitHub REST API responses.

use serde::{Deserialize, Serialize};

/// GitHub user as returned by the user search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
}

/// GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    pub html_url: String,
}

/// Response wrapper for the user search endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchUsersResponse {
    #[serde(default)]
    pub items: Vec<User>,
}
