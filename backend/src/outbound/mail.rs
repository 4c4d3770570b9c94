//! SMTP mail adapter over `lettre`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::ports::{MailError, Mailer};

/// Connection settings for the outgoing SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Optional username/password pair.
    pub credentials: Option<(String, String)>,
    /// `From:` mailbox, e.g. `Campfinder <noreply@campfinder.dev>`.
    pub from: String,
}

/// Plain-text transactional mail over SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: lettre::message::Mailbox,
}

impl SmtpMailer {
    /// Build the mailer.
    ///
    /// The connection is plaintext SMTP, which suits the local relays and
    /// capture services used in development; production relays should sit
    /// behind a TLS-terminating host.
    ///
    /// # Errors
    ///
    /// [`MailError`] when the `From:` mailbox does not parse.
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let from = config.from.parse().map_err(|err| MailError {
            message: format!("invalid From mailbox '{}': {err}", config.from),
        })?;
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port);
        if let Some((username, password)) = config.credentials {
            builder = builder.credentials(Credentials::new(username, password));
        }
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let to = to.parse().map_err(|err| MailError {
            message: format!("invalid recipient '{to}': {err}"),
        })?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())
            .map_err(|err| MailError {
                message: err.to_string(),
            })?;
        self.transport
            .send(message)
            .await
            .map_err(|err| MailError {
                message: err.to_string(),
            })?;
        Ok(())
    }
}
