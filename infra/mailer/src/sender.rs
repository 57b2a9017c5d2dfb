use crate::error::MailerError;
use crate::markup::strip_tags;
use crate::plan::TransportPlan;
use crate::transport::{LettreTransport, MailTransport};
use kissj_domain::settings::MailerSettings;
use lettre::Message;
use lettre::message::{Mailbox, MultiPart};
use tracing::{error, info, instrument};

/// Sends HTML mail with the identities and recipient policy from the mailer settings.
///
/// * From is the configured sender.
/// * The bcc-labelled identity is added as **CC**, on every message.
/// * The caller's recipient is only added when `send_mail_to_main_recipient` is set, so
///   staging deployments deliver everything to the CC address alone.
#[derive(Debug)]
pub struct MailSender<T = LettreTransport> {
    settings: MailerSettings,
    transport: T,
}

impl MailSender<LettreTransport> {
    /// # Errors
    /// Returns [`MailerError::Transport`] if the transport cannot be configured.
    pub fn from_settings(settings: MailerSettings) -> Result<Self, MailerError> {
        let transport = LettreTransport::from_plan(&TransportPlan::from_settings(&settings))?;
        Ok(Self::with_transport(settings, transport))
    }
}

impl<T: MailTransport> MailSender<T> {
    pub const fn with_transport(settings: MailerSettings, transport: T) -> Self {
        Self { settings, transport }
    }

    pub const fn settings(&self) -> &MailerSettings {
        &self.settings
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn plan(&self) -> TransportPlan {
        TransportPlan::from_settings(&self.settings)
    }

    /// Builds the message [`MailSender::send`] would deliver.
    ///
    /// # Errors
    /// Returns [`MailerError::Address`] for unparsable addresses and [`MailerError::Build`]
    /// if the message ends up without any recipient.
    pub fn compose(&self, recipient: &str, subject: &str, html_body: &str) -> Result<Message, MailerError> {
        let settings = &self.settings;
        let from = Mailbox::new(Some(settings.from_name.clone()), settings.from_mail.parse()?);

        let mut builder = Message::builder().from(from).subject(subject);
        if !settings.bcc_mail.is_empty() {
            builder = builder.cc(Mailbox::new(Some(settings.bcc_name.clone()), settings.bcc_mail.parse()?));
        }
        if settings.send_mail_to_main_recipient {
            builder = builder.to(Mailbox::new(None, recipient.parse()?));
        }

        let message = builder
            .multipart(MultiPart::alternative_plain_html(strip_tags(html_body), html_body.to_owned()))?;
        Ok(message)
    }

    /// Composes and delivers one message. No retries.
    ///
    /// # Errors
    /// Every failure becomes [`MailerError::Send`] (`Error sending email`), including a
    /// rejected address or a message left without recipients. The cause is only logged.
    #[instrument(skip(self, html_body), fields(smtp = self.settings.smtp))]
    pub async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), MailerError> {
        let message = self.compose(recipient, subject, html_body).map_err(|cause| {
            error!(error = %cause, "Failed to compose email");
            MailerError::send_failure()
        })?;
        self.debug_output(&message);

        if let Err(cause) = self.transport.deliver(&message).await {
            error!(error = %cause, "Failed to send email");
            return Err(MailerError::send_failure());
        }

        info!(cc = %self.settings.bcc_mail, main_recipient = self.settings.send_mail_to_main_recipient, "Email sent");
        Ok(())
    }

    /// Verbosity follows the configured debug level (zero unless insecure dev mode allowed it).
    fn debug_output(&self, message: &Message) {
        let level = self.settings.debug_output_level();
        if level == 0 {
            return;
        }

        let envelope = message.envelope();
        let recipients: Vec<String> = envelope.to().iter().map(ToString::to_string).collect();
        info!(from = ?envelope.from().map(ToString::to_string), ?recipients, "Mail envelope");
        if level >= 2 {
            info!(headers = %message.headers(), "Mail headers");
        }
        if level >= 4 {
            info!(raw = %String::from_utf8_lossy(&message.formatted()), "Mail message");
        }
    }
}
