//! Per-article summarization.
//!
//! [`Summarizer::summarize`] never fails: if the model is not configured or the
//! request goes wrong, it logs the reason and returns [`SUMMARY_FAILED`] so one
//! bad article cannot sink the digest.

use crate::api::AskAsync;
use crate::models::SummaryStyle;
use crate::utils::truncate_for_log;
use tracing::{debug, error, instrument, warn};

/// Returned when the completion boundary is missing, the request fails, or the
/// reply is empty.
pub const SUMMARY_FAILED: &str = "Could not summarize article.";

/// Build the single user prompt sent for one article.
pub fn build_prompt(text: &str, style: SummaryStyle) -> String {
    match style {
        SummaryStyle::OneSentence => format!(
            "Please summarize the following news article snippet in one concise sentence:\n---\n{text}\n---"
        ),
        SummaryStyle::Bullets => format!(
            "Please summarize the following article for a newsletter in 3 concise bullet points:\n---\n{text}\n---"
        ),
    }
}

/// Wraps an optional completion client with the placeholder policy.
#[derive(Debug)]
pub struct Summarizer<C> {
    client: Option<C>,
    style: SummaryStyle,
}

impl<C: AskAsync> Summarizer<C> {
    pub fn new(client: Option<C>, style: SummaryStyle) -> Self {
        if client.is_none() {
            warn!("No completion client configured; summaries will use a placeholder");
        }
        Self { client, style }
    }

    /// Summarize `text`, returning the model's first reply verbatim or [`SUMMARY_FAILED`].
    #[instrument(level = "info", skip_all, fields(style = ?self.style, bytes = text.len()))]
    pub async fn summarize(&self, text: &str) -> String {
        let Some(client) = &self.client else {
            warn!("Completion client unavailable; skipping summary");
            return SUMMARY_FAILED.to_string();
        };

        let prompt = build_prompt(text, self.style);
        match client.ask(&prompt).await {
            Ok(summary) if summary.is_empty() => {
                warn!("Model returned an empty summary; using placeholder");
                SUMMARY_FAILED.to_string()
            }
            Ok(summary) => {
                debug!(summary = %truncate_for_log(&summary, 200), "Summary received");
                summary
            }
            Err(e) => {
                error!(error = %e, "Summarization failed; using placeholder");
                SUMMARY_FAILED.to_string()
            }
        }
    }
}
