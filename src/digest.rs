//! Digest composition and delivery.
//!
//! For each fetched article, in order:
//! 1. pick the text to summarize (description, else content, else nothing)
//! 2. summarize it, or use [`NO_CONTENT`] without calling the model
//! 3. append an `ARTICLE / SUMMARY / LINK` block and a separator
//!
//! The finished [`Digest`] is handed to the mail boundary exactly once. An empty
//! article list ends the run without sending anything.

use crate::api::AskAsync;
use crate::error::BoundaryError;
use crate::mailer::MailTransport;
use crate::models::{Article, Digest};
use crate::summarizer::Summarizer;
use std::fmt::Write;
use tracing::{error, info, instrument, warn};

/// Used when an article has neither a description nor content.
pub const NO_CONTENT: &str = "No content available to summarize.";

const HEADER_RULE: &str = "=========================================";
const SEPARATOR: &str = "-----------------------------------------";
pub const MISSING_TITLE: &str = "(untitled)";
pub const MISSING_URL: &str = "(no link)";

pub fn subject_for(topic: &str) -> String {
    format!("Your Daily AI News Report - {topic}")
}

fn header_for(topic: &str) -> String {
    format!("Here is your AI News update for {topic}:\n{HEADER_RULE}\n\n")
}

/// Append one article block to `body`. `ordinal` is 1-based.
fn push_block(body: &mut String, ordinal: usize, article: &Article, summary: &str) {
    let title = article.title.as_deref().unwrap_or(MISSING_TITLE);
    let url = article.url.as_deref().unwrap_or(MISSING_URL);
    let _ = write!(
        body,
        "ARTICLE {ordinal}: {title}\nSUMMARY: {summary}\nLINK: {url}\n\n{SEPARATOR}\n\n"
    );
}

/// Plain listing of fetched articles (ordinal, title, URL) for the `fetch` command.
pub fn article_listing(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "Failed to fetch articles.\n".to_string();
    }
    let mut out = format!("Successfully fetched {} articles:\n", articles.len());
    for (i, article) in articles.iter().enumerate() {
        let _ = write!(
            out,
            "\nArticle {}:\n  Title: {}\n  URL: {}\n",
            i + 1,
            article.title.as_deref().unwrap_or(MISSING_TITLE),
            article.url.as_deref().unwrap_or(MISSING_URL),
        );
    }
    out
}

/// Build the digest for `articles`, summarizing each one in order.
#[instrument(level = "info", skip_all, fields(topic = %topic, articles = articles.len()))]
pub async fn compose<C: AskAsync>(
    topic: &str,
    articles: &[Article],
    summarizer: &Summarizer<C>,
) -> Digest {
    let mut body = header_for(topic);

    for (i, article) in articles.iter().enumerate() {
        let ordinal = i + 1;
        info!(ordinal, "Summarizing article");

        let text = article.text_to_summarize();
        let summary = if text.is_empty() {
            warn!(ordinal, "Article has no description or content");
            NO_CONTENT.to_string()
        } else {
            summarizer.summarize(text).await
        };

        push_block(&mut body, ordinal, article, &summary);
    }

    Digest {
        subject: subject_for(topic),
        body,
    }
}

/// What happened to the single send attempt of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// No articles, so nothing was composed or sent.
    Skipped,
    Sent,
    /// The relay refused the login.
    AuthFailed(String),
    Failed(BoundaryError),
}

/// Log the result of a send attempt, with a credentials hint for auth failures.
pub fn report_send(result: Result<(), BoundaryError>) -> SendOutcome {
    match result {
        Ok(()) => {
            info!("Email sent successfully");
            SendOutcome::Sent
        }
        Err(BoundaryError::Auth(reason)) => {
            error!(
                %reason,
                "Authentication error: invalid email or app password; check SENDER_EMAIL and SENDER_APP_PASSWORD"
            );
            SendOutcome::AuthFailed(reason)
        }
        Err(e) => {
            error!(error = %e, "Error sending email");
            SendOutcome::Failed(e)
        }
    }
}

/// Compose the digest for `articles` and send it once.
///
/// Never returns an error: an empty list skips sending, and a failed send is
/// logged and reported through [`SendOutcome`].
#[instrument(level = "info", skip_all, fields(topic = %topic))]
pub async fn compose_and_send<C: AskAsync, M: MailTransport>(
    topic: &str,
    articles: &[Article],
    summarizer: &Summarizer<C>,
    mailer: &M,
) -> SendOutcome {
    if articles.is_empty() {
        info!("No articles found. Exiting.");
        return SendOutcome::Skipped;
    }

    let digest = compose(topic, articles, summarizer).await;
    info!(subject = %digest.subject, body = %digest.body, "Final email content");

    report_send(mailer.send(&digest.subject, &digest.body).await)
}
