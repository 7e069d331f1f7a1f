// Runtime configuration.
// Built once from the environment at startup and passed to the client and caches.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Number of users requested per search.
pub const SEARCH_PER_PAGE: u32 = 5;

/// Default number of repositories per page.
pub const DEFAULT_REPO_PER_PAGE: u32 = 8;

/// Age after which a cached result may be refetched: 5 minutes.
pub const STALE_AFTER: Duration = Duration::from_secs(5 * 60);

const TOKEN_VAR: &str = "GITHUB_TOKEN";
const API_URL_VAR: &str = "GHX_API_URL";
const PER_PAGE_VAR: &str = "GHX_PER_PAGE";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Optional personal access token. `None` means unauthenticated calls.
    pub token: Option<String>,
    /// Base URL of the GitHub REST API, without trailing slash.
    pub api_base: String,
    /// Users per search request.
    pub search_per_page: u32,
    /// Repositories per page request.
    pub repo_per_page: u32,
    /// Staleness window for cached results.
    pub stale_after: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            search_per_page: SEARCH_PER_PAGE,
            repo_per_page: DEFAULT_REPO_PER_PAGE,
            stale_after: STALE_AFTER,
        }
    }
}

impl Config {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let api_base = lookup(API_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let repo_per_page = match lookup(PER_PAGE_VAR) {
            None => DEFAULT_REPO_PER_PAGE,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if (1..=100).contains(&n) => n,
                _ => {
                    warn!(value = %raw, "ignoring invalid {}", PER_PAGE_VAR);
                    DEFAULT_REPO_PER_PAGE
                }
            },
        };

        Self {
            token,
            api_base,
            repo_per_page,
            ..Self::default()
        }
    }

    /// Whether requests carry an Authorization header.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert!(!config.is_authenticated());
        assert_eq!(config.search_per_page, 5);
        assert_eq!(config.repo_per_page, 8);
        assert_eq!(config.stale_after, Duration::from_secs(300));
    }

    #[test]
    fn test_blank_token_is_absent() {
        let config = Config::from_lookup(lookup_from(&[("GITHUB_TOKEN", "   ")]));
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_token_and_api_url() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", " abc123 "),
            ("GHX_API_URL", "http://localhost:8080/"),
        ]));
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.api_base, "http://localhost:8080");
        assert!(config.is_authenticated());
    }

    #[test]
    fn test_per_page_override() {
        let config = Config::from_lookup(lookup_from(&[("GHX_PER_PAGE", "4")]));
        assert_eq!(config.repo_per_page, 4);

        let config = Config::from_lookup(lookup_from(&[("GHX_PER_PAGE", "0")]));
        assert_eq!(config.repo_per_page, DEFAULT_REPO_PER_PAGE);

        let config = Config::from_lookup(lookup_from(&[("GHX_PER_PAGE", "lots")]));
        assert_eq!(config.repo_per_page, DEFAULT_REPO_PER_PAGE);
    }
}
