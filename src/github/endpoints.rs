// GitHub API endpoint functions.
// Typed methods for the user search and user repositories endpoints.

use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{Repository, SearchUsersResponse, User};

impl GitHubClient {
    /// Search users by login fragment.
    ///
    /// An empty query returns no users without touching the network.
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let per_page = self.search_per_page();
        let per_page_param = per_page.to_string();
        let params = [("q", query), ("per_page", per_page_param.as_str())];
        let response = self
            .get_with_params("/search/users", &params, "Error searching users")
            .await?;
        let body = response.text().await?;
        let wrapper: SearchUsersResponse = serde_json::from_str(&body)?;

        let mut seen = HashSet::new();
        let mut users = wrapper.items;
        users.retain(|user| seen.insert(user.login.clone()));
        users.truncate(per_page as usize);

        debug!(query, count = users.len(), "user search completed");
        Ok(users)
    }

    /// List a user's public repositories. `page` is 1-indexed.
    pub async fn list_user_repos(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>> {
        let params = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let context = format!("Error fetching repos for user {}", username);
        let response = self
            .get_with_params(&format!("/users/{}/repos", username), &params, &context)
            .await?;
        let body = response.text().await?;
        let repos: Vec<Repository> = serde_json::from_str(&body)?;

        debug!(username, page, count = repos.len(), "repository page fetched");
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::config::Config;
    use crate::error::ExplorerError;

    use super::*;

    fn client_for(server: &MockServer, token: Option<&str>) -> GitHubClient {
        let config = Config {
            token: token.map(str::to_string),
            api_base: server.base_url(),
            ..Config::default()
        };
        GitHubClient::new(&config).unwrap()
    }

    fn repo_json(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("repo-{}", id),
            "description": null,
            "stargazers_count": id * 10,
            "html_url": format!("https://github.com/user1/repo-{}", id)
        })
    }

    #[tokio::test]
    async fn test_search_users_sends_query_and_page_size() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/users")
                    .query_param("q", "octocat")
                    .query_param("per_page", "5");
                then.status(200).json_body(json!({
                    "total_count": 2,
                    "items": [
                        {"login": "user1", "id": 1, "avatar_url": "https://example.com/avatar1.png"},
                        {"login": "user2", "id": 2, "avatar_url": "https://example.com/avatar2.png"}
                    ]
                }));
            })
            .await;

        let users = client_for(&server, None).search_users("octocat").await.unwrap();

        mock.assert_async().await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].login, "user1");
        assert_eq!(users[0].id, 1);
        assert_eq!(users[1].login, "user2");
    }

    #[tokio::test]
    async fn test_search_users_bounds_and_dedups_result() {
        let server = MockServer::start_async().await;
        let items: Vec<_> = ["a", "b", "a", "c", "d", "e", "f"]
            .iter()
            .enumerate()
            .map(|(i, login)| json!({"login": login, "id": i, "avatar_url": ""}))
            .collect();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/users");
                then.status(200).json_body(json!({ "items": items }));
            })
            .await;

        let users = client_for(&server, None).search_users("x").await.unwrap();

        let logins: Vec<&str> = users.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(500);
            })
            .await;

        let users = client_for(&server, None).search_users("").await.unwrap();

        assert!(users.is_empty());
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/users");
                then.status(403).body("rate limited");
            })
            .await;

        let err = client_for(&server, None)
            .search_users("octocat")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error searching users: 403");
    }

    #[tokio::test]
    async fn test_token_sent_as_authorization_header() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/users")
                    .header("Authorization", "token secret");
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        client_for(&server, Some("secret"))
            .search_users("octocat")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    fn without_authorization(req: &HttpMockRequest) -> bool {
        req.headers.as_ref().is_none_or(|headers| {
            !headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        })
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/users")
                    .matches(without_authorization);
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        client_for(&server, None).search_users("octocat").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_user_repos_pagination_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/users/user1/repos")
                    .query_param("page", "2")
                    .query_param("per_page", "8");
                then.status(200)
                    .json_body(json!([repo_json(9), repo_json(10), repo_json(11)]));
            })
            .await;

        let repos = client_for(&server, None)
            .list_user_repos("user1", 2, 8)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(repos.len(), 3);
        assert_eq!(repos[0].name, "repo-9");
        assert_eq!(repos[0].description, None);
        assert_eq!(repos[2].stargazers_count, 110);
    }

    #[tokio::test]
    async fn test_list_user_repos_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/ghost/repos");
                then.status(404).json_body(json!({"message": "Not Found"}));
            })
            .await;

        let err = client_for(&server, None)
            .list_user_repos("ghost", 1, 8)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Error fetching repos for user ghost: 404");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/user1/repos");
                then.status(200).body("not json");
            })
            .await;

        let err = client_for(&server, None)
            .list_user_repos("user1", 1, 8)
            .await
            .unwrap_err();

        assert!(matches!(err, ExplorerError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let config = Config {
            api_base: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let client = GitHubClient::new(&config).unwrap();

        let err = client.search_users("octocat").await.unwrap_err();

        assert!(matches!(err, ExplorerError::Network(_)));
    }
}
