//! Command-line interface definitions for Topic Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Secrets can be provided via flags but are normally read from the environment
//! (or a `.env` file loaded at start-up).

use crate::models::SummaryStyle;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Topic Digest application.
///
/// Options left unset fall back to the YAML config file (if given) and then
/// to built-in defaults.
///
/// # Examples
///
/// ```sh
/// # Full run with defaults from the environment
/// topic_digest
///
/// # Five bullet-point summaries about robotics, printed instead of mailed
/// topic_digest --topic robotics --article-count 5 --summary-style bullets preview
///
/// # Check mail credentials
/// topic_digest test-email
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Search term for the news query
    #[arg(short, long, global = true, env = "DIGEST_TOPIC")]
    pub topic: Option<String>,

    /// How many articles to request (1-100)
    #[arg(short = 'n', long, global = true, env = "DIGEST_ARTICLE_COUNT")]
    pub article_count: Option<u32>,

    /// Shape of each summary
    #[arg(long, global = true, value_enum)]
    pub summary_style: Option<SummaryStyle>,

    /// Chat completion model identifier
    #[arg(long, global = true, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the news search service
    #[arg(long, global = true)]
    pub news_api_url: Option<String>,

    /// Full URL of the chat completions endpoint
    #[arg(long, global = true)]
    pub completions_url: Option<String>,

    /// SMTP relay host (implicit TLS)
    #[arg(long, global = true)]
    pub smtp_host: Option<String>,

    /// SMTP relay port
    #[arg(long, global = true)]
    pub smtp_port: Option<u16>,

    #[command(flatten)]
    pub secrets: SecretArgs,
}

/// Credentials, normally supplied through the environment.
#[derive(Args, Debug, Default)]
pub struct SecretArgs {
    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true, global = true)]
    pub news_api_key: Option<String>,

    /// OpenAI API key (summaries fall back to a placeholder without it)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,

    /// Address the digest is sent from (also the SMTP login)
    #[arg(long, env = "SENDER_EMAIL", hide_env_values = true, global = true)]
    pub sender_email: Option<String>,

    /// Address the digest is sent to
    #[arg(long, env = "RECEIVER_EMAIL", hide_env_values = true, global = true)]
    pub receiver_email: Option<String>,

    /// App password for the sender's mailbox
    #[arg(long, env = "SENDER_APP_PASSWORD", hide_env_values = true, global = true)]
    pub sender_app_password: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch, summarize, and email the digest (default)
    Run,
    /// Fetch, summarize, and print the digest without sending it
    Preview,
    /// Fetch and list articles without summarizing
    Fetch,
    /// Summarize a single piece of text
    Summarize {
        /// Text to summarize
        #[arg(long)]
        text: String,
    },
    /// Send a short test message to check mail credentials
    TestEmail,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
