//! Configuration resolution.
//!
//! Settings come from three layers, highest priority first:
//! 1. CLI flags (and their environment variables)
//! 2. An optional YAML file passed with `--config`
//! 3. Built-in defaults
//!
//! Credentials never come from the YAML file; they are held in [`Secrets`],
//! whose `Debug` output is redacted.

use crate::cli::{Cli, SecretArgs};
use crate::error::ConfigError;
use crate::models::{SummaryStyle, TopicQuery};
use crate::utils::redact;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};

pub const DEFAULT_TOPIC: &str = "artificial intelligence";
pub const DEFAULT_ARTICLE_COUNT: u32 = 3;
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org";
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Implicit-TLS submission port.
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Contents of the optional YAML config file.
///
/// ```yaml
/// topic: artificial intelligence
/// article_count: 5
/// summary_style: bullets
/// model: gpt-4o-mini
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub topic: Option<String>,
    pub article_count: Option<u32>,
    pub summary_style: Option<SummaryStyle>,
    pub model: Option<String>,
    pub news_api_url: Option<String>,
    pub completions_url: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
}

impl FileConfig {
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let conf = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration file");
        Ok(conf)
    }
}

/// Fully resolved, non-secret settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub query: TopicQuery,
    pub summary_style: SummaryStyle,
    pub model: String,
    pub news_api_url: String,
    pub completions_url: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl Settings {
    /// Merge CLI values over the config file (if any) over defaults.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let settings = Self::merge(cli, file)?;
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let topic = cli
            .topic
            .clone()
            .or(file.topic)
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());
        let count = cli
            .article_count
            .or(file.article_count)
            .unwrap_or(DEFAULT_ARTICLE_COUNT);

        Ok(Self {
            query: TopicQuery::new(topic, count)?,
            summary_style: cli.summary_style.or(file.summary_style).unwrap_or_default(),
            model: cli
                .model
                .clone()
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            news_api_url: cli
                .news_api_url
                .clone()
                .or(file.news_api_url)
                .unwrap_or_else(|| DEFAULT_NEWS_API_URL.to_string()),
            completions_url: cli
                .completions_url
                .clone()
                .or(file.completions_url)
                .unwrap_or_else(|| DEFAULT_COMPLETIONS_URL.to_string()),
            smtp_host: cli
                .smtp_host
                .clone()
                .or(file.smtp_host)
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: cli.smtp_port.or(file.smtp_port).unwrap_or(DEFAULT_SMTP_PORT),
        })
    }
}

/// Credentials loaded once at start-up.
#[derive(Clone, Default)]
pub struct Secrets {
    pub news_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub sender_email: Option<String>,
    pub receiver_email: Option<String>,
    pub sender_app_password: Option<String>,
}

/// Sender, recipient and password, all present.
#[derive(Clone)]
pub struct MailCredentials {
    pub sender: String,
    pub recipient: String,
    pub password: String,
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("sender", &"<redacted>")
            .field("recipient", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Blank values count as unset; anything else is kept byte for byte.
fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

impl Secrets {
    pub fn from_args(args: &SecretArgs) -> Self {
        Self {
            news_api_key: non_empty(&args.news_api_key),
            openai_api_key: non_empty(&args.openai_api_key),
            sender_email: non_empty(&args.sender_email),
            receiver_email: non_empty(&args.receiver_email),
            sender_app_password: non_empty(&args.sender_app_password),
        }
    }

    pub fn news_api_key(&self) -> Result<String, ConfigError> {
        self.news_api_key
            .clone()
            .ok_or(ConfigError::MissingSecret("NEWS_API_KEY"))
    }

    pub fn mail_credentials(&self) -> Result<MailCredentials, ConfigError> {
        Ok(MailCredentials {
            sender: self
                .sender_email
                .clone()
                .ok_or(ConfigError::MissingSecret("SENDER_EMAIL"))?,
            recipient: self
                .receiver_email
                .clone()
                .ok_or(ConfigError::MissingSecret("RECEIVER_EMAIL"))?,
            password: self
                .sender_app_password
                .clone()
                .ok_or(ConfigError::MissingSecret("SENDER_APP_PASSWORD"))?,
        })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("news_api_key", &redact(&self.news_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("sender_email", &redact(&self.sender_email))
            .field("receiver_email", &redact(&self.receiver_email))
            .field("sender_app_password", &redact(&self.sender_app_password))
            .finish()
    }
}
