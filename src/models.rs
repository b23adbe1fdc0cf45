//! Data models for fetched articles, queries, and the composed digest.
//!
//! - [`Article`]: one item returned by the news search service
//! - [`TopicQuery`]: what to search for and how many results to ask for
//! - [`SummaryStyle`]: the shape of summary requested from the model
//! - [`Digest`]: the subject and body handed to the mail boundary
//!
//! The NewsAPI wire payload ([`NewsApiResponse`]) also lives here; every article
//! field is optional because the service omits or nulls them freely.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest page size the news search service accepts.
pub const MAX_ARTICLE_COUNT: u32 = 100;

/// A news article as returned by the search service.
///
/// Any field may be missing. Articles have no identity beyond their position
/// in the fetched sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Article {
    /// The text worth summarizing: description first, then content.
    ///
    /// Empty strings count as missing. Returns `""` when neither field has text.
    pub fn text_to_summarize(&self) -> &str {
        [self.description.as_deref(), self.content.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

/// Search term plus the number of articles to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicQuery {
    pub topic: String,
    pub desired_count: u32,
}

impl TopicQuery {
    /// Build a query, rejecting a blank topic or a count outside `1..=100`.
    pub fn new(topic: impl Into<String>, desired_count: u32) -> Result<Self, ConfigError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if desired_count == 0 || desired_count > MAX_ARTICLE_COUNT {
            return Err(ConfigError::ArticleCount {
                got: desired_count,
                max: MAX_ARTICLE_COUNT,
            });
        }
        Ok(Self {
            topic,
            desired_count,
        })
    }
}

/// How the model is asked to summarize each article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStyle {
    /// A single concise sentence (keeps the email compact).
    #[default]
    OneSentence,
    /// Three concise bullet points.
    Bullets,
}

/// The fully composed message, ready for the mail boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

/// Top-level payload of the NewsAPI `top-headlines` endpoint.
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(description: Option<&str>, content: Option<&str>) -> Article {
        Article {
            description: description.map(str::to_string),
            content: content.map(str::to_string),
            ..Article::default()
        }
    }

    #[test]
    fn test_description_takes_precedence() {
        let a = article(Some("desc"), Some("body"));
        assert_eq!(a.text_to_summarize(), "desc");
    }

    #[test]
    fn test_empty_description_falls_back_to_content() {
        assert_eq!(article(Some(""), Some("body")).text_to_summarize(), "body");
        assert_eq!(article(None, Some("body")).text_to_summarize(), "body");
    }

    #[test]
    fn test_nothing_to_summarize() {
        assert_eq!(article(None, None).text_to_summarize(), "");
        assert_eq!(article(Some(""), Some("")).text_to_summarize(), "");
    }

    #[test]
    fn test_topic_query_validation() {
        assert!(TopicQuery::new("rust", 3).is_ok());
        assert!(matches!(
            TopicQuery::new("   ", 3),
            Err(ConfigError::EmptyTopic)
        ));
        assert!(matches!(
            TopicQuery::new("rust", 0),
            Err(ConfigError::ArticleCount { got: 0, .. })
        ));
        assert!(matches!(
            TopicQuery::new("rust", 101),
            Err(ConfigError::ArticleCount { got: 101, max: 100 })
        ));
    }

    #[test]
    fn test_newsapi_payload_with_nulls_and_extra_fields() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"source": {"id": null, "name": "Wire"}, "title": "X", "url": "u1",
                 "description": "d1", "content": null, "urlToImage": null},
                {"title": null}
            ]
        }"#;

        let resp: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.articles.len(), 2);
        assert_eq!(resp.articles[0].title.as_deref(), Some("X"));
        assert_eq!(resp.articles[0].content, None);
        assert_eq!(resp.articles[1], Article::default());
    }

    #[test]
    fn test_newsapi_error_payload() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        let resp: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "error");
        assert!(resp.articles.is_empty());
        assert_eq!(resp.message.as_deref(), Some("Your API key is invalid."));
    }

    #[test]
    fn test_summary_style_yaml_names() {
        let style: SummaryStyle = serde_yaml::from_str("bullets").unwrap();
        assert_eq!(style, SummaryStyle::Bullets);
        let style: SummaryStyle = serde_yaml::from_str("one-sentence").unwrap();
        assert_eq!(style, SummaryStyle::OneSentence);
    }
}
