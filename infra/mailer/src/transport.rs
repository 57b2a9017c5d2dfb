use crate::error::MailerError;
use crate::plan::{DeliveryMode, TlsPolicy, TransportPlan};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{
    AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use std::fmt;
use std::future::Future;
use tracing::{info, warn};

/// Whatever went wrong inside a transport. Only ever logged.
pub type TransportFailure = Box<dyn std::error::Error + Send + Sync>;

/// The seam between composing a message and putting it on the wire.
pub trait MailTransport: Send + Sync {
    fn deliver(&self, message: &Message) -> impl Future<Output = Result<(), TransportFailure>> + Send;
}

/// Production transport backed by `lettre`.
pub enum LettreTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Sendmail(AsyncSendmailTransport<Tokio1Executor>),
}

impl fmt::Debug for LettreTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smtp(_) => f.write_str("LettreTransport::Smtp"),
            Self::Sendmail(_) => f.write_str("LettreTransport::Sendmail"),
        }
    }
}

impl LettreTransport {
    /// Builds the transport a plan describes. Nothing connects until the first delivery.
    ///
    /// # Errors
    /// Returns [`MailerError::Transport`] if the TLS parameters cannot be built.
    pub fn from_plan(plan: &TransportPlan) -> Result<Self, MailerError> {
        if plan.mode == DeliveryMode::LocalSubmission {
            info!("Mail transport: local submission via sendmail");
            return Ok(Self::Sendmail(AsyncSendmailTransport::<Tokio1Executor>::new()));
        }

        let mut tls = TlsParameters::builder(plan.host.clone());
        if plan.tls == TlsPolicy::AcceptInvalid {
            warn!(host = %plan.host, "TLS certificate verification is DISABLED for mail delivery");
            // With rustls this also skips hostname verification.
            tls = tls.dangerous_accept_invalid_certs(true);
        }
        let tls = tls.build_rustls().map_err(|e| MailerError::Transport {
            message: e.to_string().into(),
            context: Some("Building TLS parameters".into()),
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&plan.host)
            .port(plan.port)
            .tls(Tls::Required(tls));
        if plan.auth {
            builder = builder.credentials(Credentials::new(
                plan.username.clone(),
                plan.password.expose_secret().to_owned(),
            ));
        }

        info!(host = %plan.host, port = plan.port, auth = plan.auth, "Mail transport: SMTP with STARTTLS");
        Ok(Self::Smtp(builder.build()))
    }
}

impl MailTransport for LettreTransport {
    async fn deliver(&self, message: &Message) -> Result<(), TransportFailure> {
        let envelope = message.envelope();
        let raw = message.formatted();
        match self {
            Self::Smtp(smtp) => {
                smtp.send_raw(envelope, &raw).await?;
            },
            Self::Sendmail(sendmail) => {
                sendmail.send_raw(envelope, &raw).await?;
            },
        }
        Ok(())
    }
}
