//! # Topic Digest
//!
//! Fetches the top news articles for a topic, summarizes each one through an
//! OpenAI-compatible chat completions API, and emails the compiled digest.
//!
//! ## Usage
//!
//! ```sh
//! topic_digest --topic "artificial intelligence" --article-count 3
//! ```
//!
//! ## Architecture
//!
//! A single sequential pass, run once per invocation:
//! 1. **Fetching**: one NewsAPI `top-headlines` request
//! 2. **Summarizing**: one completion request per article, in order
//! 3. **Composing**: header plus one block per article
//! 4. **Sending**: one SMTP submission
//!
//! Every boundary failure degrades (no articles, placeholder summary, logged
//! send failure); only configuration errors end the process with an error.

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod digest;
mod error;
mod fetcher;
mod mailer;
mod models;
mod summarizer;
mod utils;

use api::OpenAiClient;
use cli::{Cli, Command};
use config::{Secrets, Settings};
use digest::{SendOutcome, article_listing, compose, compose_and_send, report_send};
use fetcher::{NewsApiClient, fetch_top_articles};
use mailer::{SmtpMailer, send_test_email};
use summarizer::Summarizer;

fn build_summarizer(http: &Client, settings: &Settings, secrets: &Secrets) -> Summarizer<OpenAiClient> {
    let client = secrets.openai_api_key.as_ref().map(|key| {
        OpenAiClient::new(
            http.clone(),
            settings.completions_url.clone(),
            key.clone(),
            settings.model.clone(),
        )
    });
    Summarizer::new(client, settings.summary_style)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    // Secrets may live in a .env file next to the binary's working directory.
    if let Err(e) = dotenvy::dotenv() {
        debug!(error = %e, "No .env file loaded");
    }

    let args = Cli::parse();
    let command = args.command();
    let settings = Settings::resolve(&args)?;
    let secrets = Secrets::from_args(&args.secrets);
    debug!(?command, ?secrets, "Parsed CLI arguments");
    info!(
        topic = %settings.query.topic,
        article_count = settings.query.desired_count,
        style = ?settings.summary_style,
        "topic_digest starting up"
    );

    let http = Client::new();

    match command {
        Command::Run => {
            let news = NewsApiClient::new(http.clone(), &settings.news_api_url, secrets.news_api_key()?);
            let mailer = SmtpMailer::new(
                &settings.smtp_host,
                settings.smtp_port,
                secrets.mail_credentials()?,
            );
            let summarizer = build_summarizer(&http, &settings, &secrets);

            let articles = fetch_top_articles(&news, &settings.query).await;
            let outcome =
                compose_and_send(&settings.query.topic, &articles, &summarizer, &mailer).await;
            if !matches!(outcome, SendOutcome::Sent | SendOutcome::Skipped) {
                warn!("Digest was not delivered");
            }
        }
        Command::Preview => {
            let news = NewsApiClient::new(http.clone(), &settings.news_api_url, secrets.news_api_key()?);
            let summarizer = build_summarizer(&http, &settings, &secrets);

            let articles = fetch_top_articles(&news, &settings.query).await;
            if articles.is_empty() {
                info!("No articles found. Exiting.");
            } else {
                let digest = compose(&settings.query.topic, &articles, &summarizer).await;
                println!("Subject: {}\n\n{}", digest.subject, digest.body);
            }
        }
        Command::Fetch => {
            let news = NewsApiClient::new(http.clone(), &settings.news_api_url, secrets.news_api_key()?);
            let articles = fetch_top_articles(&news, &settings.query).await;
            print!("{}", article_listing(&articles));
        }
        Command::Summarize { text } => {
            let summarizer = build_summarizer(&http, &settings, &secrets);
            println!("{}", summarizer.summarize(&text).await);
        }
        Command::TestEmail => {
            let mailer = SmtpMailer::new(
                &settings.smtp_host,
                settings.smtp_port,
                secrets.mail_credentials()?,
            );
            report_send(send_test_email(&mailer).await);
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}
