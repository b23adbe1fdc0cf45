//! Email delivery over SMTP.
//!
//! [`SmtpMailer`] opens an implicit-TLS session to the relay, logs in with the
//! sender's app password, submits one plain-text message and drops the
//! connection. Rejected logins are reported as [`BoundaryError::Auth`] so the
//! caller can tell the operator to check their credentials.

use crate::config::MailCredentials;
use crate::error::BoundaryError;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

/// Something that can deliver a subject and body to the configured recipient.
pub trait MailTransport {
    async fn send(&self, subject: &str, body: &str) -> Result<(), BoundaryError>;
}

/// SMTP reply codes that mean the login itself was refused.
pub fn is_auth_rejection(code: u16) -> bool {
    // 530 auth required, 534 mechanism too weak (app password needed), 535 bad credentials
    matches!(code, 530 | 534 | 535)
}

fn classify(e: &lettre::transport::smtp::Error) -> BoundaryError {
    let code = e.status().and_then(|c| c.to_string().parse::<u16>().ok());
    match code {
        Some(c) if is_auth_rejection(c) => BoundaryError::Auth(e.to_string()),
        Some(c) => BoundaryError::upstream(Some(c), e.to_string()),
        None => BoundaryError::Transport(e.to_string()),
    }
}

#[derive(Debug)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: MailCredentials,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, port: u16, credentials: MailCredentials) -> Self {
        Self {
            host: host.into(),
            port,
            credentials,
        }
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message, BoundaryError> {
        let from: Mailbox = self
            .credentials
            .sender
            .parse()
            .map_err(|e| BoundaryError::Unavailable(format!("invalid sender address: {e}")))?;
        let to: Mailbox = self
            .credentials
            .recipient
            .parse()
            .map_err(|e| BoundaryError::Unavailable(format!("invalid recipient address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| BoundaryError::upstream(None, format!("failed to build message: {e}")))
    }
}

impl MailTransport for SmtpMailer {
    #[instrument(level = "info", skip_all, fields(host = %self.host, port = self.port))]
    async fn send(&self, subject: &str, body: &str) -> Result<(), BoundaryError> {
        let message = self.build_message(subject, body)?;

        let creds = Credentials::new(
            self.credentials.sender.clone(),
            self.credentials.password.clone(),
        );
        let transport: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .map_err(|e| BoundaryError::Transport(e.to_string()))?
                .port(self.port)
                .credentials(creds)
                .build();

        info!("Connecting to mail server");
        transport.send(message).await.map_err(|e| classify(&e))?;
        Ok(())
    }
}

pub const TEST_SUBJECT: &str = "Test Email from topic_digest";
pub const TEST_BODY: &str = "Hello! This is a test email from the topic digest pipeline.";

/// Send a fixed test message to check that the mail credentials work.
pub async fn send_test_email<M: MailTransport>(mailer: &M) -> Result<(), BoundaryError> {
    mailer.send(TEST_SUBJECT, TEST_BODY).await
}
