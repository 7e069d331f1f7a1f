// GitHub API HTTP client.
// Handles the optional token, default headers and status checking.

use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ExplorerError, Result};

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    search_per_page: u32,
}

impl GitHubClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token {}", token))
                    .map_err(|e| ExplorerError::InvalidToken(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("ghx-tui"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            search_per_page: config.search_per_page,
        })
    }

    /// Users requested per search.
    pub fn search_per_page(&self) -> u32 {
        self.search_per_page
    }

    /// Make a GET request with query parameters.
    ///
    /// `context` prefixes the error message of a non-success response.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
        context: &str,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "request failed");
                ExplorerError::Network(e.to_string())
            })?;

        check_response(response, context)
    }
}

/// Map a non-success status to an `Http` error carrying the context message.
fn check_response(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(url = %response.url(), status = status.as_u16(), "{}", context);
        Err(ExplorerError::Http {
            context: context.to_string(),
            status: status.as_u16(),
        })
    }
}
