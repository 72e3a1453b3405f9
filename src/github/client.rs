// file: src/github/client.rs
// description: GitHub REST client that lists the repositories of an organization or user
// reference: https://docs.github.com/en/rest/repos/repos

use crate::config::ApiConfig;
use crate::error::{CloneError, Result};
use crate::github::pagination::next_page_url;
use crate::models::{Category, Credentials, RepositoryDescriptor};
use crate::utils::Validator;
use reqwest::header::{ACCEPT, LINK};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    config: ApiConfig,
}

impl GithubClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn repos_url(&self, category: Category, owner: &str) -> String {
        format!(
            "{}/{}/{}/repos?per_page={}",
            self.config.base_url.trim_end_matches('/'),
            category.api_segment(),
            owner,
            self.config.per_page
        )
    }

    /// Credentials are only ever sent to the configured API origin, so a
    /// `Link` pointing elsewhere ends the listing with an error.
    fn ensure_same_origin(&self, url: &str) -> Result<()> {
        let foreign = || CloneError::ForeignPageLink {
            url: url.to_string(),
        };
        let base = Url::parse(&self.config.base_url).map_err(|_| foreign())?;
        let next = Url::parse(url).map_err(|_| foreign())?;

        if base.origin() != next.origin() {
            return Err(foreign());
        }
        Ok(())
    }

    /// Lists every repository of `owner`, following `Link` headers up to
    /// `max_pages`. Any failing page fails the whole listing.
    pub async fn list_repositories(
        &self,
        category: Category,
        owner: &str,
        credentials: Option<&Credentials>,
    ) -> Result<Vec<RepositoryDescriptor>> {
        Validator::validate_owner_name(owner)?;

        let mut repos = Vec::new();
        let mut next = Some(self.repos_url(category, owner));
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages >= self.config.max_pages {
                warn!(
                    "Stopped after {} page(s); {} has more repositories than were listed",
                    pages, owner
                );
                break;
            }
            if pages > 0 {
                self.ensure_same_origin(&url)?;
            }

            let (page, next_url) = self.fetch_page(&url, credentials).await?;
            pages += 1;
            debug!("Page {} of {} returned {} repositories", pages, owner, page.len());

            repos.extend(page);
            next = next_url;
        }

        info!("Found {} repositories for {} {}", repos.len(), category, owner);
        Ok(repos)
    }

    async fn fetch_page(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
    ) -> Result<(Vec<RepositoryDescriptor>, Option<String>)> {
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");

        if let Some(credentials) = credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.secret));
        }

        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let status = status.to_string();
            return Err(match response.status() {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CloneError::Auth { status },
                _ => CloneError::HttpStatus { status },
            });
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_url);

        let body = response.bytes().await?;
        let repos: Vec<RepositoryDescriptor> =
            serde_json::from_slice(&body).map_err(CloneError::Decode)?;

        Ok((repos, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        Json, Router,
        extract::{Query, State},
        http::{HeaderMap, StatusCode as AxumStatus, header},
        response::IntoResponse,
        routing::get,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    fn repo_json(id: u64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "full_name": format!("heppu/{}", name),
            "private": false,
            "owner": { "login": "heppu", "id": 1 },
            "clone_url": format!("https://github.com/heppu/{}.git", name),
            "ssh_url": format!("git@github.com:heppu/{}.git", name),
        })
    }

    async fn serve<F>(build: F) -> String
    where
        F: FnOnce(String) -> Router,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let app = build(base.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        base
    }

    fn client_for(base: &str, per_page: u32, max_pages: u32) -> GithubClient {
        let mut config = Config::default_config().api;
        config.base_url = base.to_string();
        config.per_page = per_page;
        config.max_pages = max_pages;
        config.timeout_secs = 5;
        GithubClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_lists_single_page_verbatim() {
        let base = serve(|_| {
            Router::new().route(
                "/users/heppu/repos",
                get(|| async {
                    Json(json!([repo_json(1, "gh"), repo_json(2, "dotfiles"), repo_json(3, "blog")]))
                }),
            )
        })
        .await;

        let repos = client_for(&base, 100, 10)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap();

        assert_eq!(repos.len(), 3);
        assert_eq!(repos[0].name, "gh");
        assert_eq!(repos[0].clone_url, "https://github.com/heppu/gh.git");
        assert_eq!(repos[2].full_name, "heppu/blog");
    }

    #[tokio::test]
    async fn test_org_category_uses_orgs_segment() {
        let base = serve(|_| {
            Router::new().route(
                "/orgs/rust-lang/repos",
                get(|| async { Json(json!([repo_json(7, "rust")])) }),
            )
        })
        .await;

        let repos = client_for(&base, 100, 10)
            .list_repositories(Category::Organization, "rust-lang", None)
            .await
            .unwrap();

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].id, 7);
    }

    #[tokio::test]
    async fn test_non_ok_status_is_http_status_error() {
        let base = serve(|_| {
            Router::new().route(
                "/users/heppu/repos",
                get(|| async { (AxumStatus::NOT_FOUND, "Not Found") }),
            )
        })
        .await;

        let err = client_for(&base, 100, 10)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap_err();

        match err {
            CloneError::HttpStatus { status } => assert_eq!(status, "404 Not Found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_forbidden_status_is_auth_error() {
        let base = serve(|_| {
            Router::new().route(
                "/users/heppu/repos",
                get(|| async { (AxumStatus::FORBIDDEN, "rate limit exceeded") }),
            )
        })
        .await;

        let err = client_for(&base, 100, 10)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CloneError::Auth { ref status } if status == "403 Forbidden"));
    }

    #[tokio::test]
    async fn test_server_error_stays_http_status() {
        let base = serve(|_| {
            Router::new().route(
                "/users/heppu/repos",
                get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
            )
        })
        .await;

        let err = client_for(&base, 100, 10)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap_err();
        assert!(
            matches!(err, CloneError::HttpStatus { ref status } if status == "500 Internal Server Error")
        );
    }

    #[tokio::test]
    async fn test_credentials_sent_as_basic_auth() {
        let base = serve(|_| {
            Router::new().route(
                "/users/heppu/repos",
                get(|headers: HeaderMap| async move {
                    let authorized = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        == Some("Basic aGVwcHU6dG9rZW4=");
                    if authorized {
                        Json(json!([repo_json(1, "private-repo")])).into_response()
                    } else {
                        AxumStatus::UNAUTHORIZED.into_response()
                    }
                }),
            )
        })
        .await;

        let client = client_for(&base, 100, 10);

        let err = client
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CloneError::Auth { ref status } if status == "401 Unauthorized"));

        let creds = Credentials::new("heppu", "token");
        let repos = client
            .list_repositories(Category::User, "heppu", Some(&creds))
            .await
            .unwrap();
        assert_eq!(repos[0].name, "private-repo");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let base = serve(|_| {
            Router::new().route(
                "/users/heppu/repos",
                get(|| async { Json(json!({ "message": "not a list" })) }),
            )
        })
        .await;

        let err = client_for(&base, 100, 10)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CloneError::Decode(_)));
    }

    fn paged_router(base: String, fail_second_page: bool) -> Router {
        Router::new()
            .route(
                "/users/heppu/repos",
                get(
                    move |State(base): State<String>,
                          Query(params): Query<HashMap<String, String>>| async move {
                        let page = params.get("page").map(String::as_str).unwrap_or("1");
                        match page {
                            "1" => {
                                let link = format!(
                                    "<{}/users/heppu/repos?per_page=2&page=2>; rel=\"next\"",
                                    base
                                );
                                (
                                    [(header::LINK, link)],
                                    Json(json!([repo_json(1, "a"), repo_json(2, "b")])),
                                )
                                    .into_response()
                            }
                            _ if fail_second_page => {
                                AxumStatus::INTERNAL_SERVER_ERROR.into_response()
                            }
                            _ => Json(json!([repo_json(3, "c")])).into_response(),
                        }
                    },
                ),
            )
            .with_state(base)
    }

    #[tokio::test]
    async fn test_follows_next_links_until_exhausted() {
        let base = serve(|base| paged_router(base, false)).await;

        let repos = client_for(&base, 2, 10)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap();

        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_max_pages_limits_listing() {
        let base = serve(|base| paged_router(base, false)).await;

        let repos = client_for(&base, 2, 1)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap();

        assert_eq!(repos.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_later_page_returns_no_partial_listing() {
        let base = serve(|base| paged_router(base, true)).await;

        let err = client_for(&base, 2, 10)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap_err();

        assert!(matches!(err, CloneError::HttpStatus { .. }));
    }

    #[tokio::test]
    async fn test_next_link_to_other_host_not_followed() {
        let base = serve(|_| {
            Router::new().route(
                "/users/heppu/repos",
                get(|| async {
                    (
                        [(
                            header::LINK,
                            "<https://collector.example.com/users/heppu/repos?page=2>; rel=\"next\"",
                        )],
                        Json(json!([repo_json(1, "a")])),
                    )
                }),
            )
        })
        .await;

        let creds = Credentials::new("heppu", "token");
        let err = client_for(&base, 1, 10)
            .list_repositories(Category::User, "heppu", Some(&creds))
            .await
            .unwrap_err();

        match err {
            CloneError::ForeignPageLink { url } => {
                assert_eq!(url, "https://collector.example.com/users/heppu/repos?page=2")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_same_origin_accepts_api_pages() {
        let client = client_for("https://api.github.com", 100, 10);
        assert!(client
            .ensure_same_origin("https://api.github.com/user/repos?page=2")
            .is_ok());
        assert!(client
            .ensure_same_origin("http://api.github.com/user/repos?page=2")
            .is_err());
        assert!(client
            .ensure_same_origin("https://api.github.com:8443/user/repos?page=2")
            .is_err());
    }

    #[tokio::test]
    async fn test_invalid_owner_rejected_before_request() {
        // Nothing listens here; a request would surface as a network error.
        let client = client_for("http://127.0.0.1:9", 100, 10);
        let err = client
            .list_repositories(Category::User, "../etc", None)
            .await
            .unwrap_err();
        assert!(err.is_usage());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = client_for(&base, 100, 10)
            .list_repositories(Category::User, "heppu", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CloneError::Network(_)));
    }
}
