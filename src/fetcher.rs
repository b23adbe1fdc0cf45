//! Article fetching from the NewsAPI `top-headlines` endpoint.
//!
//! [`NewsApiClient`] reports every failure as a typed [`BoundaryError`];
//! [`fetch_top_articles`] is the pipeline-facing wrapper that logs the failure
//! and turns it into an empty result.

use crate::error::BoundaryError;
use crate::models::{Article, NewsApiResponse, TopicQuery};
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use tracing::{error, info, instrument, warn};
use url::Url;

/// A source of articles for a topic.
pub trait ArticleSource {
    /// Issue one search and return the articles in service order.
    async fn search(&self, query: &TopicQuery) -> Result<Vec<Article>, BoundaryError>;
}

/// HTTP client for NewsAPI.
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, query: &TopicQuery) -> Result<Url, BoundaryError> {
        let base = format!("{}/v2/top-headlines", self.base_url.trim_end_matches('/'));
        let page_size = query.desired_count.to_string();
        Url::parse_with_params(
            &base,
            [("q", query.topic.as_str()), ("pageSize", page_size.as_str())],
        )
        .map_err(|e| BoundaryError::Unavailable(format!("invalid news API URL: {e}")))
    }
}

impl std::fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Pull the `message` field out of an error body, falling back to the raw text.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| truncate_for_log(body, 300))
}

impl ArticleSource for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(topic = %query.topic, count = query.desired_count))]
    async fn search(&self, query: &TopicQuery) -> Result<Vec<Article>, BoundaryError> {
        let url = self.endpoint(query)?;
        let resp = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status != StatusCode::OK {
            let message = server_message(&body);
            return Err(match status {
                StatusCode::UNAUTHORIZED => BoundaryError::Auth(message),
                _ => BoundaryError::upstream(Some(status.as_u16()), message),
            });
        }

        let payload: NewsApiResponse = serde_json::from_str(&body)
            .map_err(|e| BoundaryError::upstream(Some(status.as_u16()), e.to_string()))?;

        if payload.status != "ok" {
            return Err(BoundaryError::upstream(
                None,
                payload
                    .message
                    .unwrap_or_else(|| format!("status '{}'", payload.status)),
            ));
        }

        Ok(payload.articles)
    }
}

/// Fetch articles for `query`, treating any failure as "no results".
#[instrument(level = "info", skip_all, fields(topic = %query.topic))]
pub async fn fetch_top_articles<S: ArticleSource>(source: &S, query: &TopicQuery) -> Vec<Article> {
    info!(count = query.desired_count, "Fetching articles");
    match source.search(query).await {
        Ok(articles) => {
            if articles.is_empty() {
                warn!("No articles found for this topic");
            } else {
                info!(count = articles.len(), "Fetched articles");
            }
            articles
        }
        Err(e @ BoundaryError::Auth(_)) => {
            error!(error = %e, "News API rejected the key; check NEWS_API_KEY");
            Vec::new()
        }
        Err(e) => {
            error!(error = %e, "Article fetch failed; continuing with no articles");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query() -> TopicQuery {
        TopicQuery::new("artificial intelligence", 3).unwrap()
    }

    async fn client_for(server: &MockServer) -> NewsApiClient {
        NewsApiClient::new(Client::new(), server.uri(), "test-key")
    }

    #[tokio::test]
    async fn test_search_returns_articles_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .and(query_param("q", "artificial intelligence"))
            .and(query_param("pageSize", "3"))
            .and(header("X-Api-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "totalResults": 2,
                "articles": [
                    {"title": "X", "url": "u1", "description": "d1"},
                    {"title": "Y", "url": "u2", "description": null}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let articles = client_for(&server).await.search(&query()).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("X"));
        assert_eq!(articles[1].url.as_deref(), Some("u2"));
        assert_eq!(articles[1].description, None);
    }

    #[tokio::test]
    async fn test_search_fewer_than_requested_is_fine() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "articles": []
            })))
            .mount(&server)
            .await;

        let articles = client_for(&server).await.search(&query()).await.unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_search_non_ok_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "code": "rateLimited",
                "message": "You have made too many requests."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.search(&query()).await.unwrap_err();
        assert_eq!(
            err,
            BoundaryError::upstream(None, "You have made too many requests.")
        );
    }

    #[tokio::test]
    async fn test_search_unauthorized_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": "error",
                "code": "apiKeyInvalid",
                "message": "Your API key is invalid."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.search(&query()).await.unwrap_err();
        assert_eq!(err, BoundaryError::Auth("Your API key is invalid.".into()));
    }

    #[tokio::test]
    async fn test_search_http_error_with_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.search(&query()).await.unwrap_err();
        assert_eq!(err, BoundaryError::upstream(Some(500), "gateway exploded"));
    }

    #[tokio::test]
    async fn test_fetch_top_articles_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let articles = fetch_top_articles(&client_for(&server).await, &query()).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_top_articles_transport_failure() {
        // Nothing listens on port 9 locally.
        let client = NewsApiClient::new(Client::new(), "http://127.0.0.1:9", "k");
        let err = client.search(&query()).await.unwrap_err();
        assert!(matches!(err, BoundaryError::Transport(_)));
        assert!(fetch_top_articles(&client, &query()).await.is_empty());
    }

    #[test]
    fn test_server_message() {
        assert_eq!(server_message(r#"{"message":"nope"}"#), "nope");
        assert_eq!(server_message("plain"), "plain");
    }
}
